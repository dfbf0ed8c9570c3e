//! Controller state (pure).
//!
//! All state transitions are plain functions on owned data, testable without
//! a terminal or a runtime.

pub mod app_state;
pub mod event;
pub mod query_input;
pub mod query_input_handler;
pub mod result_table;

// Re-export for convenience
pub use app_state::{AppState, ControllerMode, SearchRefusal, StatusKind, StatusMessage};
pub use event::{AppEvent, SearchTicket};
pub use query_input::{QueryInput, SubmittedQuery};
pub use query_input_handler::handle_query_key;
pub use result_table::{set_row_status, Generation, ResultTable, TransferTag};
