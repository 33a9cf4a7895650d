use std::fmt;

use serde::Deserialize;

const MAX_USERNAME: usize = 64;
const MIN_PASSWORD: usize = 6;

/// Why a submitted registration was turned away. The message is shown
/// to the user as-is.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidationError(pub &'static str);

impl fmt::Display for ValidationError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.0)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// The username as it will be stored, surrounding whitespace dropped.
    pub fn username(&self) -> &str {
        self.username.trim()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let username = self.username();

        if username.is_empty() {
            return Err(ValidationError("Username is required"));
        }
        if username.chars().count() > MAX_USERNAME {
            return Err(ValidationError("Username must be 64 characters or fewer"));
        }
        if !self.email.contains('@') {
            return Err(ValidationError("A valid email address is required"));
        }
        if self.password.chars().count() < MIN_PASSWORD {
            return Err(ValidationError("Password must be at least 6 characters"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError("Passwords do not match"));
        }

        Ok(())
    }
}
