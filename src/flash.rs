use base64_light::{base64_decode, base64_encode};
use cookie::Cookie;
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Success,
    Danger,
}

/// One-shot status message, surviving exactly one redirect in the
/// `flash` cookie. The next page render shows it and clears the cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: Kind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: Kind::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            kind: Kind::Danger,
            message: message.into(),
        }
    }

    /// base64 of the JSON form - spaces and punctuation in the message
    /// would otherwise not survive the header.
    fn encode(&self) -> String {
        let json = serde_json::to_string(self).expect("flash serialization");
        base64_encode(&json)
    }

    pub fn from_cookie_value(value: &str) -> Option<Self> {
        let json = base64_decode(value);
        serde_json::from_slice(&json).ok()
    }
}

pub fn cookie(flash: &Flash) -> String {
    Cookie::build((FLASH_COOKIE, flash.encode()))
        .path("/")
        .http_only(true)
        .build()
        .to_string()
}

pub fn clear_cookie() -> String {
    Cookie::build((FLASH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .build()
        .to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn survives_the_cookie() {
        let flash = Flash::success("Logged in successfully!");

        let cookie = cookie(&flash);
        let value = cookie
            .strip_prefix("flash=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();

        assert_eq!(Flash::from_cookie_value(value), Some(flash));
    }

    #[test]
    fn garbage_ignored() {
        assert_eq!(Flash::from_cookie_value(""), None);
        assert_eq!(Flash::from_cookie_value("not base64 json"), None);
        assert_eq!(Flash::from_cookie_value("aGVsbG8"), None); // valid base64, not json
    }

    #[test]
    fn kinds_serialize_lowercase() {
        let json = serde_json::to_string(&Flash::danger("no")).unwrap();

        assert!(json.contains(r#""kind":"danger""#));
    }
}
