pub mod model;
pub mod storage;
pub mod user_interface;

pub use model::{validate_link_input, Link, LinkError, NewLink};
pub use storage::LinkStore;
