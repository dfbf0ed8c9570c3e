//! Events delivered from background tasks to the controller.
//!
//! Background tasks never touch session state. They send one of these into
//! the controller's queue and the controller applies it on the UI thread.

use crate::model::{Row, SearchError, TransferError};
use crate::state::TransferTag;
use std::path::PathBuf;

/// Identifies one issued search. Strictly increasing per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value, for logging.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Completion of a background task.
#[derive(Debug)]
pub enum AppEvent {
    /// A search finished. Only the latest ticket is applied.
    SearchCompleted {
        /// Ticket issued when the search started.
        ticket: SearchTicket,
        /// Rows for the table, or why there are none.
        outcome: Result<Vec<Row>, SearchError>,
    },
    /// A transfer finished. Applied only if `tag` belongs to the current
    /// result set.
    TransferCompleted {
        /// Row the transfer was started for.
        tag: TransferTag,
        /// Written file, or why the transfer failed.
        outcome: Result<PathBuf, TransferError>,
    },
}
