pub mod errors;
pub mod id;

pub use errors::{ConfigError, InkError, RelayError};
pub use id::{new_id, Token};

pub type Result<T> = std::result::Result<T, InkError>;
