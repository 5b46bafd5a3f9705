//! Account store and sessions
//!
//! Two identity flows: email + password (sign in or sign up) and anonymous
//! guest. Both yield an opaque [`Session`]. Passwords are kept only as
//! salted SHA-256 digests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ScoreError;

/// Opaque user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Email + password pair
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Emails compare case-insensitively, ignoring surrounding whitespace
    fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// How to authenticate
#[derive(Debug, Clone)]
pub enum AuthFlow {
    SignIn(Credentials),
    SignUp(Credentials),
    Anonymous,
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: UserId,
    /// Opaque bearer token
    pub token: String,
    pub anonymous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    user_id: UserId,
    /// None for guests
    email: Option<String>,
    password_digest: Option<String>,
}

/// Registered users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStore {
    accounts: Vec<Account>,
    next_user_id: u64,
}

impl Default for AccountStore {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            next_user_id: 1,
        }
    }
}

fn password_digest(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"crabby-bird-account:");
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn session_token(user_id: UserId, issued_at: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"crabby-bird-session:");
    hasher.update(user_id.0.to_le_bytes());
    hasher.update(issued_at.to_le_bytes());
    hex::encode(&hasher.finalize()[..16])
}

impl AccountStore {
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Run an identity flow; `now` seeds the session token
    pub fn authenticate(&mut self, flow: AuthFlow, now: f64) -> Result<Session, ScoreError> {
        let (user_id, anonymous) = match flow {
            AuthFlow::SignIn(creds) => (self.sign_in(&creds)?, false),
            AuthFlow::SignUp(creds) => (self.sign_up(&creds)?, false),
            AuthFlow::Anonymous => (self.create_user(None, None), true),
        };
        Ok(Session {
            user_id,
            token: session_token(user_id, now),
            anonymous,
        })
    }

    fn validate(creds: &Credentials) -> Result<String, ScoreError> {
        let email = creds.normalized_email();
        if email.is_empty() || !email.contains('@') {
            return Err(ScoreError::Validation("email address required".into()));
        }
        if creds.password.is_empty() {
            return Err(ScoreError::Validation("password required".into()));
        }
        Ok(email)
    }

    fn sign_in(&self, creds: &Credentials) -> Result<UserId, ScoreError> {
        let email = Self::validate(creds)?;
        let digest = password_digest(&email, &creds.password);
        self.accounts
            .iter()
            .find(|a| a.email.as_deref() == Some(email.as_str()))
            .filter(|a| a.password_digest.as_deref() == Some(digest.as_str()))
            .map(|a| a.user_id)
            .ok_or(ScoreError::InvalidCredentials)
    }

    fn sign_up(&mut self, creds: &Credentials) -> Result<UserId, ScoreError> {
        let email = Self::validate(creds)?;
        if self.accounts.iter().any(|a| a.email.as_deref() == Some(email.as_str())) {
            return Err(ScoreError::AccountExists(email));
        }
        let digest = password_digest(&email, &creds.password);
        Ok(self.create_user(Some(email), Some(digest)))
    }

    fn create_user(&mut self, email: Option<String>, password_digest: Option<String>) -> UserId {
        let user_id = UserId(self.next_user_id);
        self.next_user_id += 1;
        self.accounts.push(Account {
            user_id,
            email,
            password_digest,
        });
        user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_then_sign_in() {
        let mut store = AccountStore::default();
        let creds = Credentials::new("Crab@Reef.io", "hunter2");
        let signed_up = store.authenticate(AuthFlow::SignUp(creds), 1.0).unwrap();
        assert!(!signed_up.anonymous);

        let again = Credentials::new("  crab@reef.io ", "hunter2");
        let signed_in = store.authenticate(AuthFlow::SignIn(again), 2.0).unwrap();
        assert_eq!(signed_in.user_id, signed_up.user_id);
        assert_ne!(signed_in.token, signed_up.token);
    }

    #[test]
    fn test_wrong_password_rejected() {
        let mut store = AccountStore::default();
        store
            .authenticate(AuthFlow::SignUp(Credentials::new("a@b.c", "right")), 0.0)
            .unwrap();
        let result = store.authenticate(AuthFlow::SignIn(Credentials::new("a@b.c", "wrong")), 0.0);
        assert_eq!(result, Err(ScoreError::InvalidCredentials));

        let unknown = store.authenticate(AuthFlow::SignIn(Credentials::new("x@y.z", "right")), 0.0);
        assert_eq!(unknown, Err(ScoreError::InvalidCredentials));
    }

    #[test]
    fn test_duplicate_sign_up_rejected() {
        let mut store = AccountStore::default();
        let creds = Credentials::new("a@b.c", "pw");
        store.authenticate(AuthFlow::SignUp(creds.clone()), 0.0).unwrap();
        let result = store.authenticate(AuthFlow::SignUp(creds), 0.0);
        assert_eq!(result, Err(ScoreError::AccountExists("a@b.c".into())));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_guests_get_distinct_ids() {
        let mut store = AccountStore::default();
        let a = store.authenticate(AuthFlow::Anonymous, 0.0).unwrap();
        let b = store.authenticate(AuthFlow::Anonymous, 0.0).unwrap();
        assert!(a.anonymous && b.anonymous);
        assert_ne!(a.user_id, b.user_id);
    }

    #[test]
    fn test_blank_credentials_rejected() {
        let mut store = AccountStore::default();
        let result = store.authenticate(AuthFlow::SignUp(Credentials::new("", "pw")), 0.0);
        assert!(matches!(result, Err(ScoreError::Validation(_))));
        let result = store.authenticate(AuthFlow::SignUp(Credentials::new("a@b.c", "")), 0.0);
        assert!(matches!(result, Err(ScoreError::Validation(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_digest_never_stores_plaintext() {
        let digest = password_digest("a@b.c", "secret");
        assert_eq!(digest.len(), 64);
        assert!(!digest.contains("secret"));
    }
}
