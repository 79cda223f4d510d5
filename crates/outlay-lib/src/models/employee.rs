use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Field, FieldErrors, Result};
use crate::validate;

/// Roles an admin may hand out when creating an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    #[default]
    Employee,
    Manager,
}

impl EmployeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeRole::Employee => "employee",
            EmployeeRole::Manager => "manager",
        }
    }
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub role: EmployeeRole,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    pub company_id: String,
}

impl NewEmployee {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, Field::Name, &self.name, "Name is required");
        validate::email(&mut errors, &self.email);
        validate::new_password(&mut errors, &self.password, &self.confirm_password);
        if self.role == EmployeeRole::Employee
            && self.manager_id.as_deref().is_none_or(|id| id.trim().is_empty())
        {
            errors.push(Field::Manager, "Please select a manager for this employee");
        }
        errors.into_result()
    }

    /// Managers report to nobody, so their manager id is never sent.
    pub fn payload(&self) -> NewEmployee {
        let mut payload = self.clone();
        payload.name = payload.name.trim().to_string();
        payload.email = payload.email.trim().to_string();
        if payload.role == EmployeeRole::Manager {
            payload.manager_id = None;
        }
        payload
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Manager {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmployeeCreated {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}
