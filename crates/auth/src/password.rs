use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{error::AuthError, ports::CredentialVerifier};

/// Verifies argon2 PHC strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2CredentialVerifier;

impl CredentialVerifier for Argon2CredentialVerifier {
    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        // A malformed stored hash must look like a wrong password to the caller.
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("stored password hash is not a valid PHC string");
            return false;
        };

        Argon2::default().verify_password(plaintext.as_bytes(), &parsed).is_ok()
    }
}

pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| AuthError::internal(anyhow::anyhow!(error.to_string())))
}

#[cfg(test)]
mod tests {
    use super::{hash_password, Argon2CredentialVerifier};
    use crate::ports::CredentialVerifier;

    #[test]
    fn hashes_are_argon2id_and_salted() {
        let first = hash_password("correct horse").expect("hash should succeed");
        let second = hash_password("correct horse").expect("hash should succeed");

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[test]
    fn verifies_matching_password() {
        let hash = hash_password("correct horse").expect("hash should succeed");
        assert!(Argon2CredentialVerifier.verify("correct horse", &hash));
    }

    #[test]
    fn rejects_wrong_password() {
        let hash = hash_password("correct horse").expect("hash should succeed");
        assert!(!Argon2CredentialVerifier.verify("battery staple", &hash));
    }

    #[test]
    fn malformed_hash_verifies_as_false() {
        assert!(!Argon2CredentialVerifier.verify("anything", "not-a-phc-string"));
        assert!(!Argon2CredentialVerifier.verify("anything", ""));
    }
}
