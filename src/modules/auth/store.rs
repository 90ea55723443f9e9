use log::{debug, error};
use serde::{Deserialize, Serialize};

use super::errors::{LoginError, RegisterError, ResetError, SignupError};
use super::tokens::{generate_reset_token, is_expired, ResetTicket};
use super::validation::validate_signup_fields;
use crate::modules::storage::{StorageBackend, StorageError};
use crate::modules::utils::logging::{log_auth_event, log_data_operation};
use crate::modules::utils::time::current_timestamp_millis;
use crate::{RESET_TOKEN_DURATION_MS, USERS_STORAGE_KEY};

/// Represents a single registered user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token_expiry: Option<u64>,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            reset_token: None,
            reset_token_expiry: None,
        }
    }

    /// Token and expiry are always written together
    fn set_reset_token(&mut self, ticket: &ResetTicket) {
        self.reset_token = Some(ticket.token.clone());
        self.reset_token_expiry = Some(ticket.expires_at);
    }

    fn clear_reset_token(&mut self) {
        self.reset_token = None;
        self.reset_token_expiry = None;
    }
}

/// Owns the persisted user collection stored under `USERS_STORAGE_KEY`.
///
/// Every mutating call is a full read-modify-write of the collection.
pub struct CredentialStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> CredentialStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All registered users. Unparseable stored text reads as no users.
    pub fn users(&self) -> Result<Vec<User>, StorageError> {
        let raw = match self.backend.get(USERS_STORAGE_KEY)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_str(&raw) {
            Ok(users) => Ok(users),
            Err(e) => {
                error!("Error getting users: {}", e);
                Ok(Vec::new())
            }
        }
    }

    fn save_users(&self, users: &[User]) -> Result<(), StorageError> {
        let data = serde_json::to_string(users)?;
        self.backend.set(USERS_STORAGE_KEY, &data)
    }

    pub fn is_registered(&self, email: &str) -> Result<bool, StorageError> {
        Ok(self.users()?.iter().any(|user| user.email == email))
    }

    /// Register a new user. Password strength is not checked here, see `validate_signup`.
    pub fn register(&self, email: &str, password: &str) -> Result<(), RegisterError> {
        let result = self.try_register(email, password);

        match &result {
            Ok(()) => log_auth_event("register", email, true, None),
            Err(RegisterError::DuplicateEmail) => {
                log_auth_event("register", email, false, Some("duplicate email"))
            }
            Err(RegisterError::Storage(e)) => {
                error!("Error registering user: {}", e);
                log_auth_event("register", email, false, Some("storage failure"));
            }
        }
        result
    }

    fn try_register(&self, email: &str, password: &str) -> Result<(), RegisterError> {
        let mut users = self.users()?;

        if users.iter().any(|user| user.email == email) {
            return Err(RegisterError::DuplicateEmail);
        }

        users.push(User::new(email, password));
        self.save_users(&users)?;
        Ok(())
    }

    /// Check signup input without touching storage: format, length, match, then uniqueness
    pub fn validate_signup(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), SignupError> {
        validate_signup_fields(email, password, confirm_password)?;

        let registered = self.is_registered(email).unwrap_or_else(|e| {
            error!("Error getting users: {}", e);
            false
        });
        if registered {
            return Err(SignupError::DuplicateEmail);
        }
        Ok(())
    }

    /// Check an email/password pair, distinguishing unknown email from wrong password
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<(), LoginError> {
        let users = match self.users() {
            Ok(users) => users,
            Err(e) => {
                error!("Error verifying credentials: {}", e);
                return Err(LoginError::Unknown);
            }
        };

        let result = match users.iter().find(|user| user.email == email) {
            None => Err(LoginError::Email),
            Some(user) if user.password != password => Err(LoginError::Password),
            Some(_) => Ok(()),
        };

        match &result {
            Ok(()) => log_auth_event("login", email, true, None),
            Err(reason) => log_auth_event("login", email, false, Some(reason.reason())),
        }
        result
    }

    pub fn request_password_reset(&self, email: &str) -> Result<ResetTicket, ResetError> {
        self.request_password_reset_at(email, current_timestamp_millis())
    }

    /// Start a reset: stamp a fresh token valid for one hour from `now_ms` on the user
    pub fn request_password_reset_at(
        &self,
        email: &str,
        now_ms: u64,
    ) -> Result<ResetTicket, ResetError> {
        let result = self.try_request_reset(email, now_ms);

        match &result {
            Ok(ticket) => {
                debug!("Reset token issued, expires at {}", ticket.expires_at);
                log_auth_event("reset_request", email, true, None);
            }
            Err(e) => {
                if let ResetError::Storage(inner) = e {
                    error!("Error requesting password reset: {}", inner);
                }
                log_auth_event("reset_request", email, false, Some(&e.to_string()));
            }
        }
        result
    }

    fn try_request_reset(&self, email: &str, now_ms: u64) -> Result<ResetTicket, ResetError> {
        let mut users = self.users()?;
        let user = users
            .iter_mut()
            .find(|user| user.email == email)
            .ok_or(ResetError::UserNotFound)?;

        let ticket = ResetTicket {
            token: generate_reset_token(),
            expires_at: now_ms + RESET_TOKEN_DURATION_MS,
        };
        user.set_reset_token(&ticket);

        self.save_users(&users)?;
        Ok(ticket)
    }

    pub fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), ResetError> {
        self.reset_password_at(email, token, new_password, current_timestamp_millis())
    }

    /// Complete a reset: the token must match exactly and `now_ms` must be before its expiry
    pub fn reset_password_at(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
        now_ms: u64,
    ) -> Result<(), ResetError> {
        let result = self.try_reset_password(email, token, new_password, now_ms);

        match &result {
            Ok(()) => {
                log_auth_event("reset_password", email, true, None);
                log_data_operation("reset_password", USERS_STORAGE_KEY, true, None);
            }
            Err(e) => {
                if let ResetError::Storage(inner) = e {
                    error!("Error resetting password: {}", inner);
                }
                log_auth_event("reset_password", email, false, Some(&e.to_string()));
            }
        }
        result
    }

    fn try_reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
        now_ms: u64,
    ) -> Result<(), ResetError> {
        let mut users = self.users()?;
        let user = users
            .iter_mut()
            .find(|user| user.email == email)
            .ok_or(ResetError::UserNotFound)?;

        match &user.reset_token {
            Some(stored) if stored == token => {}
            _ => return Err(ResetError::InvalidToken),
        }

        match user.reset_token_expiry {
            Some(expires_at) if !is_expired(expires_at, now_ms) => {}
            _ => return Err(ResetError::TokenExpired),
        }

        user.password = new_password.to_string();
        user.clear_reset_token();

        self.save_users(&users)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::MemoryBackend;

    fn setup_test_store() -> CredentialStore<MemoryBackend> {
        CredentialStore::new(MemoryBackend::new())
    }

    #[test]
    fn test_user_creation() {
        let store = setup_test_store();

        assert!(store.register("test@example.com", "Password123!").is_ok());

        let users = store.users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "test@example.com");
        assert_eq!(users[0].password, "Password123!");
        assert!(users[0].reset_token.is_none());
    }

    #[test]
    fn test_duplicate_registration() {
        let store = setup_test_store();

        store.register("a@b.com", "secret1").unwrap();
        let second = store.register("a@b.com", "another");
        assert!(matches!(second, Err(RegisterError::DuplicateEmail)));
        assert_eq!(store.users().unwrap().len(), 1);

        // Email matching is case-sensitive
        assert!(store.register("A@b.com", "secret1").is_ok());
        assert_eq!(store.users().unwrap().len(), 2);
    }

    #[test]
    fn test_register_on_unavailable_backend() {
        let store = setup_test_store();
        store.backend().set_unavailable(true);

        let result = store.register("a@b.com", "secret1");
        assert!(matches!(result, Err(RegisterError::Storage(_))));
        assert_eq!(
            result.unwrap_err().to_string(),
            "An error occurred during registration. Please try again."
        );
    }

    #[test]
    fn test_serialized_shape() {
        let store = setup_test_store();
        store.register("a@b.com", "secret1").unwrap();

        let raw = store.backend().get(USERS_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"[{"email":"a@b.com","password":"secret1"}]"#);

        store.request_password_reset_at("a@b.com", 1_000).unwrap();
        let raw = store.backend().get(USERS_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""resetToken":""#));
        assert!(raw.contains(r#""resetTokenExpiry":3601000"#));
    }

    #[test]
    fn test_corrupt_user_data_reads_as_empty() {
        let store = setup_test_store();
        store.backend().set(USERS_STORAGE_KEY, "not-json").unwrap();

        assert!(store.users().unwrap().is_empty());
        assert_eq!(
            store.verify_credentials("a@b.com", "secret1"),
            Err(LoginError::Email)
        );
    }

    #[test]
    fn test_verify_credentials() {
        let store = setup_test_store();
        store.register("a@b.com", "secret1").unwrap();

        assert_eq!(store.verify_credentials("a@b.com", "secret1"), Ok(()));
        assert_eq!(
            store.verify_credentials("a@b.com", "wrong"),
            Err(LoginError::Password)
        );
        assert_eq!(
            store.verify_credentials("nobody@b.com", "secret1"),
            Err(LoginError::Email)
        );

        store.backend().set_unavailable(true);
        let failure = store.verify_credentials("a@b.com", "secret1").unwrap_err();
        assert_eq!(failure.reason(), "unknown");
    }

    #[test]
    fn test_validate_signup() {
        let store = setup_test_store();
        store.register("taken@b.com", "secret1").unwrap();

        assert_eq!(
            store.validate_signup("not-an-email", "secret1", "secret1"),
            Err(SignupError::InvalidEmail)
        );
        assert_eq!(
            store.validate_signup("new@b.com", "short", "short"),
            Err(SignupError::PasswordTooShort)
        );
        assert_eq!(
            store.validate_signup("new@b.com", "secret1", "secret2"),
            Err(SignupError::PasswordMismatch)
        );
        assert_eq!(
            store.validate_signup("taken@b.com", "secret1", "secret1"),
            Err(SignupError::DuplicateEmail)
        );
        assert_eq!(store.validate_signup("new@b.com", "secret1", "secret1"), Ok(()));

        // Validation never writes
        assert_eq!(store.users().unwrap().len(), 1);
    }

    #[test]
    fn test_password_reset_flow() {
        let store = setup_test_store();
        store.register("a@b.com", "secret1").unwrap();

        let now = 1_700_000_000_000;
        let ticket = store.request_password_reset_at("a@b.com", now).unwrap();
        assert_eq!(ticket.expires_at, now + RESET_TOKEN_DURATION_MS);
        assert!(!ticket.token.is_empty());

        let user = &store.users().unwrap()[0];
        assert_eq!(user.reset_token.as_deref(), Some(ticket.token.as_str()));
        assert_eq!(user.reset_token_expiry, Some(ticket.expires_at));

        store
            .reset_password_at("a@b.com", &ticket.token, "newsecret", now + 1_000)
            .unwrap();

        let user = &store.users().unwrap()[0];
        assert_eq!(user.password, "newsecret");
        assert_eq!(user.reset_token, None);
        assert_eq!(user.reset_token_expiry, None);

        assert_eq!(store.verify_credentials("a@b.com", "newsecret"), Ok(()));
        assert_eq!(
            store.verify_credentials("a@b.com", "secret1"),
            Err(LoginError::Password)
        );

        // A consumed token cannot be used again
        let reuse = store.reset_password_at("a@b.com", &ticket.token, "again", now + 2_000);
        assert!(matches!(reuse, Err(ResetError::InvalidToken)));
    }

    #[test]
    fn test_reset_with_real_clock() {
        let store = setup_test_store();
        store.register("a@b.com", "secret1").unwrap();

        let ticket = store.request_password_reset("a@b.com").unwrap();
        assert!(store
            .reset_password("a@b.com", &ticket.token, "newsecret")
            .is_ok());
    }

    #[test]
    fn test_reset_unknown_user() {
        let store = setup_test_store();

        let request = store.request_password_reset("ghost@b.com");
        assert!(matches!(request, Err(ResetError::UserNotFound)));
        assert_eq!(request.unwrap_err().to_string(), "User not found");

        let reset = store.reset_password("ghost@b.com", "token", "newsecret");
        assert!(matches!(reset, Err(ResetError::UserNotFound)));
    }

    #[test]
    fn test_reset_with_wrong_or_missing_token() {
        let store = setup_test_store();
        store.register("a@b.com", "secret1").unwrap();

        // No reset was ever requested
        let result = store.reset_password("a@b.com", "", "newsecret");
        assert!(matches!(result, Err(ResetError::InvalidToken)));

        let now = 1_700_000_000_000;
        store.request_password_reset_at("a@b.com", now).unwrap();
        let result = store.reset_password_at("a@b.com", "guess", "newsecret", now);
        assert!(matches!(result, Err(ResetError::InvalidToken)));
        assert_eq!(result.unwrap_err().to_string(), "Invalid reset token");

        assert_eq!(store.verify_credentials("a@b.com", "secret1"), Ok(()));
    }

    #[test]
    fn test_reset_token_expiration() {
        let store = setup_test_store();
        store.register("a@b.com", "secret1").unwrap();

        let now = 1_700_000_000_000;
        let ticket = store.request_password_reset_at("a@b.com", now).unwrap();

        // Exactly at the expiry instant the token is already dead
        let result =
            store.reset_password_at("a@b.com", &ticket.token, "newsecret", ticket.expires_at);
        assert!(matches!(result, Err(ResetError::TokenExpired)));
        assert_eq!(result.unwrap_err().to_string(), "Reset token has expired");

        // The stored token is kept so the failure is repeatable
        let user = &store.users().unwrap()[0];
        assert!(user.reset_token.is_some());
        assert_eq!(user.password, "secret1");
    }

    #[test]
    fn test_new_request_replaces_old_token() {
        let store = setup_test_store();
        store.register("a@b.com", "secret1").unwrap();

        let now = 1_700_000_000_000;
        let first = store.request_password_reset_at("a@b.com", now).unwrap();
        let second = store.request_password_reset_at("a@b.com", now + 10).unwrap();
        assert_ne!(first.token, second.token);

        let stale = store.reset_password_at("a@b.com", &first.token, "newsecret", now + 20);
        assert!(matches!(stale, Err(ResetError::InvalidToken)));
        assert!(store
            .reset_password_at("a@b.com", &second.token, "newsecret", now + 20)
            .is_ok());
    }

    #[test]
    fn test_reset_on_unavailable_backend() {
        let store = setup_test_store();
        store.register("a@b.com", "secret1").unwrap();
        store.backend().set_unavailable(true);

        let result = store.request_password_reset("a@b.com");
        assert!(matches!(result, Err(ResetError::Storage(_))));
        assert_eq!(result.unwrap_err().to_string(), "Error processing request");
    }
}
