use serde::{Deserialize, Serialize};

use crate::error::{Error, Field, FieldErrors, Result};
use crate::models::{Role, Session};
use crate::validate;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserInfo {
    #[serde(default, alias = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, alias = "companyId")]
    pub company_id: Option<String>,
}

impl UserInfo {
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// The identity can arrive nested under `user` or flat at the top level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserInfo>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "companyId")]
    pub company_id: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

impl LoginResponse {
    pub fn into_session(self) -> Result<Session> {
        let token = self
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::Decode("login response did not include a token".to_string()))?;

        let (role, user_id, user_name, company_id) = match self.user {
            Some(user) => (
                Some(user.role),
                Some(user.user_id),
                Some(user.name),
                user.company_id,
            ),
            None => (self.role, self.user_id, self.name, self.company_id),
        };

        Ok(Session {
            token: Some(token),
            role: role.and_then(|role| role.parse().ok()),
            user_id: user_id.filter(|id| !id.is_empty()),
            user_name: user_name.filter(|name| !name.is_empty()),
            company_id: company_id.filter(|id| !id.is_empty()),
        })
    }
}

/// Admin self-signup, which also creates the company.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub country: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        validate::required(&mut errors, Field::Name, &self.name, "Name is required");
        validate::email(&mut errors, &self.email);
        validate::new_password(&mut errors, &self.password, &self.confirm_password);
        validate::required(&mut errors, Field::Country, &self.country, "Please select a country");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
