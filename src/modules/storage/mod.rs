pub mod backend;
pub mod file;
pub mod memory;

// Re-export the main types
pub use backend::{StorageBackend, StorageError, AVAILABILITY_KEY};
pub use file::FileBackend;
pub use memory::MemoryBackend;
