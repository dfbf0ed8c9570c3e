//! Session state and its transitions.
//!
//! AppState is owned by the controller and only mutated on the UI thread.
//! Background work reports back through [`AppEvent`](crate::state::AppEvent)s
//! which are applied here.

use crate::model::{KeyAction, Row, SearchError, TransferError, TransferStatus};
use crate::state::{QueryInput, ResultTable, SearchTicket, SubmittedQuery, TransferTag};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

// ===== ControllerMode =====

/// What the controller is doing.
///
/// - `Idle` → `Searching` on submit
/// - `Searching` → `Browsing` when rows arrive
/// - `Searching` → `Idle`/`Browsing` when the search fails (depending on
///   whether rows from an earlier search are still shown)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControllerMode {
    /// No rows and no search running.
    #[default]
    Idle,
    /// A search is running.
    Searching,
    /// Rows are shown and can be navigated.
    Browsing,
}

// ===== StatusMessage =====

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Progress or confirmation.
    Info,
    /// A refused action or a failure.
    Error,
}

/// One-line message shown in the status bar until replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Severity, selects the style.
    pub kind: StatusKind,
    /// Message text.
    pub text: String,
}

// ===== SearchRefusal =====

/// Why a submit did not start a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchRefusal {
    /// Another search has not completed yet.
    #[error("A search is already running")]
    InProgress,
    /// The query is blank.
    #[error("Type a query before searching")]
    EmptyQuery,
}

// ===== AppState =====

/// Everything the controller renders.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Query being edited. Survives searches so it can be refined.
    pub query: QueryInput,

    /// Rows of the latest successful search.
    pub table: ResultTable,

    /// What the controller is doing.
    pub mode: ControllerMode,

    /// Last message for the status bar, if any.
    pub status: Option<StatusMessage>,

    /// Rows moved by PageUp/PageDown. Updated from the viewport height.
    pub page_size: usize,

    /// Latest issued search. Completions with any other ticket are stale.
    latest_ticket: SearchTicket,

    /// Transfers started and not yet completed.
    in_flight: usize,
}

impl AppState {
    /// Idle state with an empty query limited to `query_char_limit` chars.
    pub fn new(query_char_limit: usize) -> Self {
        Self {
            query: QueryInput::new(query_char_limit),
            table: ResultTable::new(),
            mode: ControllerMode::Idle,
            status: None,
            page_size: 10,
            latest_ticket: SearchTicket::default(),
            in_flight: 0,
        }
    }

    /// Transfers started and not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Ticket of the most recently issued search.
    pub fn latest_ticket(&self) -> SearchTicket {
        self.latest_ticket
    }

    /// Show an informational status message.
    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    /// Show an error status message.
    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind: StatusKind::Error,
            text: text.into(),
        });
    }

    fn settle_mode(&mut self) {
        self.mode = if self.table.is_empty() {
            ControllerMode::Idle
        } else {
            ControllerMode::Browsing
        };
    }

    // ===== Search =====

    /// Validate the query and issue a new search ticket.
    ///
    /// On success the controller is `Searching` and must run the returned
    /// query under the returned ticket.
    ///
    /// # Errors
    ///
    /// Refused while another search is running or when the query is blank.
    /// The refusal is also written to the status bar.
    pub fn begin_search(&mut self) -> Result<(SearchTicket, SubmittedQuery), SearchRefusal> {
        let result = if self.mode == ControllerMode::Searching {
            Err(SearchRefusal::InProgress)
        } else {
            SubmittedQuery::new(self.query.text()).ok_or(SearchRefusal::EmptyQuery)
        };

        match result {
            Ok(query) => {
                self.latest_ticket = self.latest_ticket.next();
                self.mode = ControllerMode::Searching;
                self.set_info(format!("Searching for \"{}\"...", query.as_str()));
                info!(ticket = self.latest_ticket.value(), query = query.as_str(), "search issued");
                Ok((self.latest_ticket, query))
            }
            Err(refusal) => {
                debug!(%refusal, "search refused");
                self.set_error(refusal.to_string());
                Err(refusal)
            }
        }
    }

    /// Apply a search completion.
    ///
    /// Returns false if the ticket is stale, in which case nothing changes.
    pub fn apply_search_completed(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<Row>, SearchError>,
    ) -> bool {
        if ticket != self.latest_ticket {
            info!(
                ticket = ticket.value(),
                latest = self.latest_ticket.value(),
                "discarding stale search completion"
            );
            return false;
        }

        match outcome {
            Ok(rows) => {
                let count = rows.len();
                let generation = self.table.replace_rows(rows);
                self.mode = ControllerMode::Browsing;
                self.set_info(format!("{count} results"));
                info!(
                    ticket = ticket.value(),
                    generation = generation.value(),
                    rows = count,
                    "search completed"
                );
            }
            Err(err) => {
                warn!(ticket = ticket.value(), error = %err, "search failed");
                self.settle_mode();
                self.set_error(format!("Search failed: {err}"));
            }
        }
        true
    }

    // ===== Navigation =====

    /// Move the table cursor. Non-navigation actions are ignored.
    pub fn apply_navigation(&mut self, action: KeyAction) {
        match action {
            KeyAction::NextRow => self.table.select_next(),
            KeyAction::PrevRow => self.table.select_prev(),
            KeyAction::PageDown => self.table.page_down(self.page_size),
            KeyAction::PageUp => self.table.page_up(self.page_size),
            KeyAction::FirstRow => self.table.select_first(),
            KeyAction::LastRow => self.table.select_last(),
            KeyAction::SubmitSearch | KeyAction::Download | KeyAction::Quit => {}
        }
    }

    // ===== Transfers =====

    /// Record that a transfer for `tag` has been launched.
    pub fn transfer_started(&mut self, tag: TransferTag, destination: &Path) {
        self.in_flight += 1;
        self.set_info(format!("Downloading to {}", destination.display()));
        info!(
            generation = tag.generation.value(),
            row = tag.row,
            destination = %destination.display(),
            in_flight = self.in_flight,
            "transfer started"
        );
    }

    /// Apply a transfer completion.
    ///
    /// The in-flight count always drops; the row is updated only when the
    /// tag belongs to the current result set. Returns whether a row changed.
    pub fn apply_transfer_completed(
        &mut self,
        tag: TransferTag,
        outcome: Result<std::path::PathBuf, TransferError>,
    ) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        let status = match &outcome {
            Ok(_) => TransferStatus::Downloaded,
            Err(_) => TransferStatus::Failed,
        };

        if !self.table.set_status_tagged(tag, status) {
            info!(
                generation = tag.generation.value(),
                current = self.table.generation().value(),
                row = tag.row,
                "discarding stale transfer completion"
            );
            return false;
        }

        match outcome {
            Ok(path) => {
                info!(row = tag.row, path = %path.display(), "transfer finished");
                self.set_info(format!("Saved {}", path.display()));
            }
            Err(err) => {
                warn!(row = tag.row, error = %err, "transfer failed");
                self.set_error(format!("Download failed: {err}"));
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod tests;
