use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::errors::InternalError;

/// Argon2id password hashing with a per-password random salt.
///
/// Verification mismatch is `Ok(false)`, not an error: hashing failures are
/// infrastructure problems, wrong passwords are a domain outcome.
#[derive(Default)]
pub struct PasswordService;

impl PasswordService {
    pub fn new() -> Self {
        Self
    }

    pub fn hash(&self, senha: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(senha.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| InternalError::Hash(format!("hash_password: {e}")))
    }

    pub fn verify(&self, senha: &str, stored_hash: &str) -> Result<bool, InternalError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| InternalError::Hash(format!("parse stored hash: {e}")))?;
        match Argon2::default().verify_password(senha.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(InternalError::Hash(format!("verify_password: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_produces_argon2_phc_string() {
        let svc = PasswordService::new();
        let hash = svc.hash("minha-senha").expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, "minha-senha");
    }

    #[test]
    fn test_verify_accepts_correct_password() {
        let svc = PasswordService::new();
        let hash = svc.hash("senha-correta").expect("hash");
        assert!(svc.verify("senha-correta", &hash).expect("verify"));
    }

    #[test]
    fn test_verify_rejects_wrong_password_without_error() {
        let svc = PasswordService::new();
        let hash = svc.hash("senha-correta").expect("hash");
        assert!(!svc.verify("senha-errada", &hash).expect("verify"));
    }

    #[test]
    fn test_verify_fails_on_garbage_hash() {
        let svc = PasswordService::new();
        assert!(svc.verify("qualquer", "nao-e-um-hash").is_err());
    }

    #[test]
    fn test_same_password_different_salts() {
        let svc = PasswordService::new();
        let h1 = svc.hash("mesma-senha").expect("hash");
        let h2 = svc.hash("mesma-senha").expect("hash");
        assert_ne!(h1, h2);
    }
}
