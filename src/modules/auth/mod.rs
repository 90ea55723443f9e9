pub mod errors;
pub mod store;
pub mod tokens;
pub mod user_interface;
pub mod validation;

// Re-export the main types and functions
pub use errors::{LoginError, RegisterError, ResetError, SignupError};
pub use store::{CredentialStore, User};
pub use tokens::{generate_reset_token, ResetTicket};
pub use validation::{is_valid_email, validate_signup_fields};
