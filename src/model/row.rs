//! Displayable projection of a record plus its transfer status.

use crate::model::{Record, ResolutionError};

/// Transfer status of one row.
///
/// A transfer moves a row `Empty`/`Failed`/`Downloaded` → `Downloading`
/// synchronously, then `Downloading` → `Downloaded`/`Failed` when its
/// completion event is processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransferStatus {
    /// Never downloaded.
    #[default]
    Empty,
    /// A transfer is in flight.
    Downloading,
    /// The last transfer completed.
    Downloaded,
    /// The last transfer failed, or the link could not be resolved.
    Failed,
}

impl TransferStatus {
    /// Text shown in the status column.
    pub fn label(self) -> &'static str {
        match self {
            TransferStatus::Empty => "",
            TransferStatus::Downloading => "Downloading...",
            TransferStatus::Downloaded => "Downloaded",
            TransferStatus::Failed => "Failed",
        }
    }
}

/// One table row.
///
/// The download link is resolved when the row is built, so it can be
/// inspected before any transfer starts. Rows whose link could not be
/// resolved start out `Failed` and never transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    author: String,
    title: String,
    file_type: String,
    download_url: Result<String, ResolutionError>,
    status: TransferStatus,
}

impl Row {
    /// Create a row. Unresolved links start out `Failed`.
    pub fn new(
        author: impl Into<String>,
        title: impl Into<String>,
        file_type: impl Into<String>,
        download_url: Result<String, ResolutionError>,
    ) -> Self {
        let status = if download_url.is_ok() {
            TransferStatus::Empty
        } else {
            TransferStatus::Failed
        };
        Self {
            author: author.into(),
            title: title.into(),
            file_type: file_type.into(),
            download_url,
            status,
        }
    }

    /// Build the row for `record` with an already-resolved link.
    pub fn from_record(record: &Record, download_url: Result<String, ResolutionError>) -> Self {
        Self::new(
            record.author(),
            record.title(),
            record.file_type(),
            download_url,
        )
    }

    /// Author column text.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Title column text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// File extension without the dot.
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// The resolved URL or why resolution failed.
    pub fn link(&self) -> Result<&str, &ResolutionError> {
        self.download_url.as_deref()
    }

    /// Text shown in the link column.
    pub fn link_label(&self) -> String {
        match &self.download_url {
            Ok(url) => url.clone(),
            Err(err) => format!("({err})"),
        }
    }

    /// Current transfer status.
    pub fn status(&self) -> TransferStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: TransferStatus) {
        self.status = status;
    }
}
