use crate::error::AppError;
use crate::store::UserStore;
use core_types::User;
use std::sync::Arc;

/// Hashes and checks passwords. Implementations are synchronous and may be slow;
/// callers run them on the blocking pool.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AppError>;
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError>;
}

#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost).map_err(|e| AppError::Credentials(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        match bcrypt::verify(password, hash) {
            Ok(valid) => Ok(valid),
            // A stored value that is not a bcrypt hash can never match.
            Err(bcrypt::BcryptError::InvalidHash(_) | bcrypt::BcryptError::InvalidPrefix(_)) => {
                Ok(false)
            }
            Err(e) => Err(AppError::Credentials(e.to_string())),
        }
    }
}

/// Which account a login request refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentity {
    Email(String),
    Name(String),
}

impl LoginIdentity {
    /// Email takes precedence over name when both are sent.
    pub fn from_parts(email: Option<String>, name: Option<String>) -> Option<Self> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        present(email)
            .map(LoginIdentity::Email)
            .or_else(|| present(name).map(LoginIdentity::Name))
    }
}

pub async fn hash_password(
    hasher: &Arc<dyn CredentialHasher>,
    password: String,
) -> Result<String, AppError> {
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::Credentials(format!("Password hashing task failed: {e}")))?
}

/// Returns the user when the identity exists and the password matches.
///
/// `Ok(None)` covers both an unknown identity and a wrong password.
pub async fn authenticate(
    users: &dyn UserStore,
    hasher: &Arc<dyn CredentialHasher>,
    identity: &LoginIdentity,
    password: String,
) -> Result<Option<User>, AppError> {
    let user = match identity {
        LoginIdentity::Email(email) => users.find_by_email(email).await?,
        LoginIdentity::Name(name) => users.find_by_name(name).await?,
    };
    let Some(user) = user else {
        return Ok(None);
    };

    let hasher = Arc::clone(hasher);
    let stored = user.password.clone();
    let is_valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
        .await
        .map_err(|e| AppError::Credentials(format!("Password verification task failed: {e}")))??;

    Ok(is_valid.then_some(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bcrypt_hash_verifies_only_the_original_password() {
        let hasher = BcryptHasher::new(4);
        let hash = hasher.hash("password").unwrap();

        assert_ne!(hash, "password");
        assert!(hasher.verify("password", &hash).unwrap());
        assert!(!hasher.verify("Password", &hash).unwrap());
    }

    #[test]
    fn malformed_stored_hash_never_matches() {
        let hasher = BcryptHasher::new(4);
        assert!(!hasher.verify("password", "plaintext").unwrap());
    }

    #[test]
    fn identity_prefers_email_and_skips_blanks() {
        assert_eq!(
            LoginIdentity::from_parts(Some("a@b.c".into()), Some("Alice".into())),
            Some(LoginIdentity::Email("a@b.c".into()))
        );
        assert_eq!(
            LoginIdentity::from_parts(Some(" ".into()), Some("Alice".into())),
            Some(LoginIdentity::Name("Alice".into()))
        );
        assert_eq!(LoginIdentity::from_parts(None, None), None);
    }
}
