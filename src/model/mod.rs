//! Domain model types (pure).

pub mod error;
pub mod key_action;
pub mod record;
pub mod row;

// Re-export for convenience
pub use error::{ResolutionError, SearchError, TransferError};
pub use key_action::KeyAction;
pub use record::Record;
pub use row::{Row, TransferStatus};
