use std::fmt;
use std::sync::Arc;

use log::{debug, error, info};
use warp::http;

use crate::auth::{SecretKey, SessionId, Signer};
use crate::forms::{LoginForm, RegisterForm, ValidationError};
use crate::password;
use crate::store::{FindError, InsertError, Store};

/// The application core: credential checks, session lifecycle and the
/// store behind them. Built once in `main` and shared via `Arc`.
pub struct Vestibule {
    store: Store,
    signer: Signer,
}

/// Proof of an authenticated request. Only `Vestibule::login` and
/// `Vestibule::authenticate` construct one, so a handler holding an
/// `Authed` never needs to re-check.
pub struct Authed {
    app: Arc<Vestibule>,
    user_id: i64,
    username: String,
    session_id: SessionId,
}

// the session id is cookie material, keep it out of Debug output
impl fmt::Debug for Authed {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "Authed({})", self.username)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RegisterError {
    Validation(ValidationError),
    DuplicateUsername,
    Internal,
}

#[derive(Debug, PartialEq, Eq)]
pub enum LoginError {
    InvalidCredentials,
    Internal,
}

/// Why a guarded request was turned away.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Deny {
    Unauthenticated,
    Internal,
}

impl Into<http::StatusCode> for Deny {
    fn into(self) -> http::StatusCode {
        match self {
            Self::Unauthenticated => http::StatusCode::FOUND,
            Self::Internal => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl warp::reject::Reject for Deny {}

impl Vestibule {
    pub fn new(store: Store, secret_key: &SecretKey) -> Self {
        Self {
            store,
            signer: Signer::new(secret_key),
        }
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<(), RegisterError> {
        form.validate().map_err(RegisterError::Validation)?;

        let username = form.username();

        let pwhash = password::hash(&form.password).map_err(|()| RegisterError::Internal)?;

        let user = self
            .store
            .insert_user(username, &form.email, &pwhash)
            .await
            .map_err(|e| match e {
                InsertError::DuplicateUsername => {
                    error!("rejecting duplicate registration for {username}");
                    RegisterError::DuplicateUsername
                }
                InsertError::Internal => RegisterError::Internal,
            })?;

        info!("{username} registered (user {})", user.id);
        Ok(())
    }

    pub async fn login(self: &Arc<Self>, form: &LoginForm) -> Result<Authed, LoginError> {
        let username = &form.username;

        let user = match self.store.find_user(username).await {
            Ok(user) => user,
            Err(FindError::NotFound) => {
                // burn a verification anyway, so an unknown username costs
                // the same as a wrong password
                password::verify(&form.password, password::DUMMY_PWHASH);

                error!("rejecting login for unknown user {username}");
                return Err(LoginError::InvalidCredentials);
            }
            Err(FindError::Internal) => return Err(LoginError::Internal),
        };

        if !password::verify(&form.password, &user.pwhash) {
            error!("wrong password for user {username}");
            return Err(LoginError::InvalidCredentials);
        }

        // a fresh session each login; any previous one is displaced
        let session_id = SessionId::new();

        if !self.store.set_session(user.id, Some(&session_id)).await {
            error!("couldn't start session for {username}");
            return Err(LoginError::Internal);
        }

        info!("{username} login: new session created");
        Ok(Authed {
            app: Arc::clone(self),
            user_id: user.id,
            username: user.username,
            session_id,
        })
    }

    /// Resolve a session cookie to the user it belongs to. Anything
    /// short of a validly signed, currently live session is a
    /// `Deny::Unauthenticated`.
    pub async fn authenticate(self: &Arc<Self>, token: Option<&str>) -> Result<Authed, Deny> {
        let Some(token) = token else {
            return Err(Deny::Unauthenticated);
        };

        let Some(session_id) = self.signer.verify(token) else {
            debug!("session cookie failed verification");
            return Err(Deny::Unauthenticated);
        };

        let user = self
            .store
            .user_by_session(&session_id)
            .await
            .map_err(|()| Deny::Internal)?;

        match user {
            Some(user) => {
                debug!("found user by session");
                Ok(Authed {
                    app: Arc::clone(self),
                    user_id: user.id,
                    username: user.username,
                    session_id,
                })
            }
            None => {
                debug!("no user for session {session_id}");
                Err(Deny::Unauthenticated)
            }
        }
    }
}

impl Authed {
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The signed cookie value for this session.
    pub fn token(&self) -> String {
        self.app.signer.sign(&self.session_id)
    }

    pub async fn logout(&self) -> Result<(), Deny> {
        let username = &self.username;
        info!("{username} logout");

        self.app
            .store
            .set_session(self.user_id, None)
            .await
            .then(|| ())
            .ok_or(Deny::Internal)
    }
}
