use std::fmt;

use thiserror::Error;

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Receipt,
    Employee,
    Description,
    Amount,
    Date,
    Category,
    PaidBy,
    Remark,
    Name,
    Email,
    Password,
    ConfirmPassword,
    Manager,
    Country,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(Field, String)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn remove(&mut self, field: Field) {
        self.0.retain(|(f, _)| *f != field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Field, String)> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was reported, otherwise a validation error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self
            .0
            .iter()
            .map(|(_, message)| message.as_str())
            .collect::<Vec<_>>();
        f.write_str(&messages.join("; "))
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("session expired, please log in again")]
    Unauthenticated,
    #[error("{detail}")]
    Api { status: u16, detail: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    Decode(String),
}

impl Error {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Error::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Text shown to the user in a notification.
    pub fn user_message(&self) -> String {
        match self {
            Error::Network(_) => {
                "Unable to reach the server. Please check your connection and try again."
                    .to_string()
            }
            Error::Decode(_) => "The server sent an unexpected response.".to_string(),
            e => e.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_field_errors_into_result() {
        assert_eq!(FieldErrors::new().into_result(), Ok(()));

        let mut errors = FieldErrors::new();
        errors.push(Field::Description, "Description is required");
        errors.push(Field::Amount, "Amount must be greater than 0");
        errors.remove(Field::Amount);

        let err = errors.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Description is required");
        assert_eq!(
            err.field_errors().and_then(|e| e.get(Field::Description)),
            Some("Description is required")
        );
    }

    #[test]
    fn test_network_error_message_is_generic() {
        let err = Error::Network("dns error: failed to lookup address".to_string());
        assert!(!err.user_message().contains("dns"));
    }
}
