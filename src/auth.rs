use std::fmt;
use std::str::FromStr;

use cookie::{Cookie, SameSite};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "sessionid";

/// "remember me" style lifetime for the session cookie
const SESSION_COOKIE_DAYS: i64 = 365;

/// Key material for session-cookie signing. Loaded once at startup and
/// never logged - Debug deliberately hides the bytes.
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "SecretKey(..)")
    }
}

/// Server-side session identifier, stored against the user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(s).map(Self).map_err(|_| ())
    }
}

/// Signs session ids into cookie values ("<uuid>.<hex hmac-sha256 tag>")
/// and verifies inbound values before they touch the database.
pub struct Signer {
    mac: HmacSha256,
}

impl Signer {
    pub fn new(key: &SecretKey) -> Self {
        let mac = HmacSha256::new_from_slice(&key.0).expect("hmac accepts any key length");
        Self { mac }
    }

    pub fn sign(&self, session_id: &SessionId) -> String {
        let session = session_id.to_string();

        let mut mac = self.mac.clone();
        mac.update(session.as_bytes());
        let tag = mac.finalize().into_bytes();

        format!("{session}.{}", hex::encode(tag))
    }

    /// None for anything unsigned, mutated or otherwise not ours.
    /// The tag comparison is constant-time.
    pub fn verify(&self, token: &str) -> Option<SessionId> {
        let (session, tag_hex) = token.split_once('.')?;
        let tag = hex::decode(tag_hex).ok()?;

        let mut mac = self.mac.clone();
        mac.update(session.as_bytes());
        mac.verify_slice(&tag).ok()?;

        session.parse().ok()
    }
}

pub fn session_cookie(token: &str, secure: bool) -> String {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(SESSION_COOKIE_DAYS))
        .build()
        .to_string()
}

pub fn clear_session_cookie() -> String {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .build()
        .to_string()
}
