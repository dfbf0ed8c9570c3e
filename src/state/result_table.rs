//! Result table view-state.
//!
//! Ordered rows plus the cursor. Row indices are stable for the lifetime of a
//! result set; every replacement bumps the [`Generation`] so that background
//! work tagged with an old index can be recognized as stale.

use crate::model::{Row, TransferStatus};

/// Identifies one result set. Strictly increasing per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value, for logging.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Correlation key carried by a background transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferTag {
    /// Result set the row belonged to when the transfer started.
    pub generation: Generation,
    /// Row index within that result set.
    pub row: usize,
}

/// Rows of the current result set and the selected row.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    rows: Vec<Row>,
    cursor: usize,
    generation: Generation,
}

impl ResultTable {
    /// Empty table at the initial generation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the current rows and install a new result set.
    ///
    /// The cursor returns to the first row and the generation advances.
    pub fn replace_rows(&mut self, rows: Vec<Row>) -> Generation {
        self.rows = rows;
        self.cursor = 0;
        self.generation = self.generation.next();
        self.generation
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at `index`, if any.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Generation of the current result set.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Tag for a transfer on `index` in the current result set.
    pub fn tag(&self, index: usize) -> TransferTag {
        TransferTag {
            generation: self.generation,
            row: index,
        }
    }

    /// Index of the selected row, `None` when the table is empty.
    pub fn selected(&self) -> Option<usize> {
        (!self.rows.is_empty()).then_some(self.cursor)
    }

    /// Set the status of row `index`. Out-of-range indices are ignored.
    ///
    /// Returns whether a row was updated.
    pub fn set_status(&mut self, index: usize, status: TransferStatus) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.set_status(status);
                true
            }
            None => false,
        }
    }

    /// Set the status addressed by `tag`, unless the tag belongs to an older
    /// result set or names a row that does not exist.
    ///
    /// Returns whether a row was updated.
    pub fn set_status_tagged(&mut self, tag: TransferTag, status: TransferStatus) -> bool {
        if tag.generation != self.generation {
            return false;
        }
        self.set_status(tag.row, status)
    }

    // ===== Cursor movement =====

    fn last_index(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Move down one row, stopping at the last.
    pub fn select_next(&mut self) {
        self.cursor = (self.cursor + 1).min(self.last_index());
    }

    /// Move up one row, stopping at the first.
    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move down `page` rows (at least one).
    pub fn page_down(&mut self, page: usize) {
        self.cursor = self.cursor.saturating_add(page.max(1)).min(self.last_index());
    }

    /// Move up `page` rows (at least one).
    pub fn page_up(&mut self, page: usize) {
        self.cursor = self.cursor.saturating_sub(page.max(1));
    }

    /// Select the first row.
    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    /// Select the last row.
    pub fn select_last(&mut self) {
        self.cursor = self.last_index();
    }
}

/// Copy of `rows` with row `index` set to `status`.
///
/// Out-of-range indices return the rows unchanged.
pub fn set_row_status(mut rows: Vec<Row>, index: usize, status: TransferStatus) -> Vec<Row> {
    if let Some(row) = rows.get_mut(index) {
        row.set_status(status);
    }
    rows
}

#[cfg(test)]
#[path = "result_table_tests.rs"]
mod tests;
