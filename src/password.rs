use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use log::error;

/// Well-formed, matches nothing. Verified against when a login names an
/// unknown user, so that path does a real hash's worth of work too.
pub const DUMMY_PWHASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hash a plaintext password into a PHC string (argon2id, random salt).
/// Two calls on the same input give different strings.
pub fn hash(plain: &str) -> Result<String, ()> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("couldn't hash password: {e}");
        })
}

/// Check a plaintext password against a stored PHC string.
/// A malformed stored string means corrupted storage - the login is
/// rejected rather than the request crashed.
pub fn verify(plain: &str, pwhash: &str) -> bool {
    let parsed = match PasswordHash::new(pwhash) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!("stored password hash unparseable: {e}");
            return false;
        }
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip() {
        let pwhash = hash("secret1").unwrap();

        assert!(verify("secret1", &pwhash));
        assert!(!verify("secret2", &pwhash));
        assert!(!verify("", &pwhash));
    }

    #[test]
    fn salted_per_call() {
        let a = hash("secret1").unwrap();
        let b = hash("secret1").unwrap();

        assert_ne!(a, b);
        assert!(verify("secret1", &a));
        assert!(verify("secret1", &b));
    }

    #[test]
    fn malformed_hash_rejects() {
        assert!(!verify("secret1", "not-a-phc-string"));
        assert!(!verify("secret1", ""));
    }

    #[test]
    fn dummy_hash_parses_but_never_matches() {
        assert!(PasswordHash::new(DUMMY_PWHASH).is_ok());

        assert!(!verify("secret1", DUMMY_PWHASH));
        assert!(!verify("", DUMMY_PWHASH));
    }
}
