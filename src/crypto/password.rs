//! Account password hashing: salted PBKDF2-SHA256.
//!
//! Encoded form: `pbkdf2-sha256$<iterations>$<salt>$<hash>`, salt and
//! hash in unpadded standard base64. The iteration count travels with
//! the hash so it can be raised later without invalidating old ones.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::CryptoError;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;

const SCHEME: &str = "pbkdf2-sha256";

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str, iterations: u32) -> String {
    let salt = generate_salt();
    let mut hash = derive(password, &salt, iterations);
    let encoded = format!(
        "{SCHEME}${iterations}${}${}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash)
    );
    hash.zeroize();
    encoded
}

/// Check a password against an encoded hash in constant time.
pub fn verify_password(password: &str, encoded: &str) -> Result<bool, CryptoError> {
    let mut parts = encoded.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(CryptoError::MalformedHash);
    };

    if scheme != SCHEME {
        return Err(CryptoError::UnsupportedScheme(scheme.to_string()));
    }

    let iterations: u32 = iterations.parse().map_err(|_| CryptoError::MalformedHash)?;
    if iterations == 0 {
        return Err(CryptoError::MalformedHash);
    }
    let salt = STANDARD_NO_PAD
        .decode(salt)
        .map_err(|_| CryptoError::MalformedHash)?;
    let expected = STANDARD_NO_PAD
        .decode(expected)
        .map_err(|_| CryptoError::MalformedHash)?;
    if expected.len() != HASH_LENGTH {
        return Err(CryptoError::MalformedHash);
    }

    let mut actual = derive(password, &salt, iterations);
    let matches: bool = actual[..].ct_eq(&expected[..]).into();
    actual.zeroize();
    Ok(matches)
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Generate a cryptographically random salt
fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: u32 = 1_000;

    #[test]
    fn correct_password_verifies() {
        let encoded = hash_password("correct horse", FAST);
        assert!(verify_password("correct horse", &encoded).unwrap());
    }

    #[test]
    fn wrong_password_fails() {
        let encoded = hash_password("correct horse", FAST);
        assert!(!verify_password("battery staple", &encoded).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = hash_password("pw", FAST);
        let b = hash_password("pw", FAST);
        assert_ne!(a, b);
    }

    #[test]
    fn encoded_form_carries_scheme_and_iterations() {
        let encoded = hash_password("pw", FAST);
        assert!(encoded.starts_with("pbkdf2-sha256$1000$"));
        assert_eq!(encoded.split('$').count(), 4);
    }

    #[test]
    fn malformed_hashes_are_rejected() {
        assert!(matches!(
            verify_password("pw", "plaintext"),
            Err(CryptoError::MalformedHash)
        ));
        assert!(matches!(
            verify_password("pw", "pbkdf2-sha256$abc$c2FsdA$aGFzaA"),
            Err(CryptoError::MalformedHash)
        ));
        assert!(matches!(
            verify_password("pw", "bcrypt$10$c2FsdA$aGFzaA"),
            Err(CryptoError::UnsupportedScheme(_))
        ));
    }
}
