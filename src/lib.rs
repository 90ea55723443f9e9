// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{auth, config, links, storage, utils};

// Re-export commonly used types
pub use modules::auth::store::{CredentialStore, User};
pub use modules::config::AppConfig;
pub use modules::links::model::{Link, NewLink};
pub use modules::links::storage::LinkStore;
pub use modules::storage::{FileBackend, MemoryBackend, StorageBackend, StorageError};

// Storage keys
pub const USERS_STORAGE_KEY: &str = "links-in-users";
pub const LINKS_STORAGE_KEY: &str = "links-in-saved-links";

// Credential rules
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const RESET_TOKEN_DURATION_MS: u64 = 3_600_000;

// Configuration
pub const DEFAULT_DATA_DIR: &str = ".links-in";
pub const DATA_DIR_ENV: &str = "LINKS_IN_DATA_DIR";
pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "links-in.log";
