use std::env;
use std::fmt;

use crate::auth::SecretKey;

/// Settings that come from the environment (or a `.env` file, loaded
/// before this runs). The listener itself is configured on the command
/// line, see `Args`.
#[derive(Debug)]
pub struct Config {
    pub secret_key: SecretKey,
    pub database_url: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    SecretKeyMissing,
    SecretKeyEmpty,
    DatabaseUrlMissing,
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = match self {
            Error::SecretKeyMissing => "SECRET_KEY not set",
            Error::SecretKeyEmpty => "SECRET_KEY is empty",
            Error::DatabaseUrlMissing => "DATABASE_URL not set",
        };

        write!(fmt, "{desc}")
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_vars(env::var("SECRET_KEY").ok(), env::var("DATABASE_URL").ok())
    }

    fn from_vars(
        secret_key: Option<String>,
        database_url: Option<String>,
    ) -> Result<Self, Error> {
        let secret_key = secret_key.ok_or(Error::SecretKeyMissing)?;
        if secret_key.is_empty() {
            return Err(Error::SecretKeyEmpty);
        }

        let database_url = database_url.ok_or(Error::DatabaseUrlMissing)?;

        Ok(Self {
            secret_key: SecretKey::new(secret_key.into_bytes()),
            database_url,
        })
    }
}
