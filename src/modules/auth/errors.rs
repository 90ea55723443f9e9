use crate::modules::storage::StorageError;

/// Failure of `CredentialStore::register`
#[derive(Debug)]
pub enum RegisterError {
    DuplicateEmail,
    Storage(StorageError),
}

impl From<StorageError> for RegisterError {
    fn from(error: StorageError) -> Self {
        RegisterError::Storage(error)
    }
}

impl std::fmt::Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterError::DuplicateEmail => {
                write!(f, "Email already exists. Please use a different email")
            }
            RegisterError::Storage(_) => write!(
                f,
                "An error occurred during registration. Please try again."
            ),
        }
    }
}

impl std::error::Error for RegisterError {}

/// First failing rule of signup validation, checked in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupError {
    InvalidEmail,
    PasswordTooShort,
    PasswordMismatch,
    DuplicateEmail,
}

impl std::fmt::Display for SignupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignupError::InvalidEmail => write!(f, "Please enter a valid email address"),
            SignupError::PasswordTooShort => write!(
                f,
                "Password must be at least {} characters long",
                crate::MIN_PASSWORD_LENGTH
            ),
            SignupError::PasswordMismatch => write!(f, "Passwords do not match"),
            SignupError::DuplicateEmail => {
                write!(f, "Email already exists. Please use a different email")
            }
        }
    }
}

impl std::error::Error for SignupError {}

/// Why a login attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    Email,
    Password,
    Unknown,
}

impl LoginError {
    /// Short discriminator consumed by the front-end
    pub fn reason(&self) -> &'static str {
        match self {
            LoginError::Email => "email",
            LoginError::Password => "password",
            LoginError::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginError::Email => write!(f, "Email not found. Please check and try again"),
            LoginError::Password => write!(f, "Password is incorrect. Please try again"),
            LoginError::Unknown => write!(f, "An error occurred. Please try again"),
        }
    }
}

impl std::error::Error for LoginError {}

/// Failure of either phase of the password-reset protocol
#[derive(Debug)]
pub enum ResetError {
    UserNotFound,
    InvalidToken,
    TokenExpired,
    Storage(StorageError),
}

impl From<StorageError> for ResetError {
    fn from(error: StorageError) -> Self {
        ResetError::Storage(error)
    }
}

impl std::fmt::Display for ResetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResetError::UserNotFound => write!(f, "User not found"),
            ResetError::InvalidToken => write!(f, "Invalid reset token"),
            ResetError::TokenExpired => write!(f, "Reset token has expired"),
            ResetError::Storage(_) => write!(f, "Error processing request"),
        }
    }
}

impl std::error::Error for ResetError {}
