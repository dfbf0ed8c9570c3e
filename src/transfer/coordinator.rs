//! Launches background transfers for table rows.

use super::filename::destination_for;
use super::ByteTransfer;
use crate::model::{ResolutionError, TransferStatus};
use crate::state::{AppEvent, ResultTable, TransferTag};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Why a download trigger did not start a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartRefusal {
    /// The table is empty.
    #[error("No results yet. Search first.")]
    NoResults,
    /// The index is past the last row.
    #[error("No row at index {0}")]
    NoSuchRow(usize),
    /// The row already has a transfer in flight.
    #[error("Already downloading")]
    AlreadyDownloading,
    /// The row has no download link.
    #[error("No download link: {0}")]
    Unresolvable(ResolutionError),
}

/// A transfer that has been launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedTransfer {
    /// Tag the completion will carry.
    pub tag: TransferTag,
    /// File the transfer writes.
    pub destination: PathBuf,
}

/// Starts transfers on the runtime and routes completions to the controller.
///
/// The row is marked `Downloading` before the task is spawned, so a second
/// trigger on the same row is refused until its completion is applied.
#[derive(Clone)]
pub struct TransferCoordinator {
    transfer: Arc<dyn ByteTransfer>,
    runtime: Handle,
    events: UnboundedSender<AppEvent>,
    download_dir: PathBuf,
}

impl TransferCoordinator {
    /// Coordinator spawning on `runtime` and reporting to `events`.
    pub fn new(
        transfer: Arc<dyn ByteTransfer>,
        runtime: Handle,
        events: UnboundedSender<AppEvent>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            transfer,
            runtime,
            events,
            download_dir: download_dir.into(),
        }
    }

    /// Start downloading row `index` of `table`.
    ///
    /// # Errors
    ///
    /// Refused, with no task spawned and no state change, when the table is
    /// empty, the row does not exist, the row is already downloading or its
    /// link could not be resolved.
    pub fn start(
        &self,
        table: &mut ResultTable,
        index: usize,
    ) -> Result<StartedTransfer, StartRefusal> {
        if table.is_empty() {
            return Err(StartRefusal::NoResults);
        }
        let row = table.row(index).ok_or(StartRefusal::NoSuchRow(index))?;
        if row.status() == TransferStatus::Downloading {
            return Err(StartRefusal::AlreadyDownloading);
        }
        let url = row
            .link()
            .map_err(|err| StartRefusal::Unresolvable(err.clone()))?
            .to_string();
        let destination = destination_for(&self.download_dir, row);
        let tag = table.tag(index);

        table.set_status(index, TransferStatus::Downloading);

        let transfer = Arc::clone(&self.transfer);
        let events = self.events.clone();
        let task_destination = destination.clone();
        self.runtime.spawn(async move {
            let outcome = transfer
                .fetch(&url, &task_destination)
                .await
                .map(|bytes| {
                    debug!(bytes, row = tag.row, "transfer task finished");
                    task_destination
                });
            if events
                .send(AppEvent::TransferCompleted { tag, outcome })
                .is_err()
            {
                warn!(row = tag.row, "controller gone, dropping transfer completion");
            }
        });

        Ok(StartedTransfer { tag, destination })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;
    use crate::transfer::test_support::FakeTransfer;
    use tokio::sync::mpsc::unbounded_channel;

    fn table_with(rows: Vec<Row>) -> ResultTable {
        let mut table = ResultTable::new();
        table.replace_rows(rows);
        table
    }

    fn resolved(title: &str) -> Row {
        Row::new("Author", title, "epub", Ok(format!("http://mirror.test/{title}.epub")))
    }

    #[tokio::test]
    async fn start_marks_downloading_and_reports_completion() {
        let (tx, mut rx) = unbounded_channel();
        let transfer = Arc::new(FakeTransfer::succeeding());
        let coordinator =
            TransferCoordinator::new(transfer.clone(), Handle::current(), tx, "/downloads");
        let mut table = table_with(vec![resolved("Dune"), resolved("Emma")]);

        let started = coordinator.start(&mut table, 1).unwrap();

        assert_eq!(table.rows()[1].status(), TransferStatus::Downloading);
        assert_eq!(started.destination, PathBuf::from("/downloads/Emma.epub"));
        assert_eq!(started.tag, table.tag(1));

        match rx.recv().await {
            Some(AppEvent::TransferCompleted { tag, outcome }) => {
                assert_eq!(tag, started.tag);
                assert_eq!(outcome.unwrap(), PathBuf::from("/downloads/Emma.epub"));
            }
            other => panic!("expected TransferCompleted, got {other:?}"),
        }
        assert_eq!(transfer.urls(), vec!["http://mirror.test/Emma.epub".to_string()]);
    }

    #[tokio::test]
    async fn second_trigger_while_downloading_spawns_nothing() {
        let (tx, mut rx) = unbounded_channel();
        let transfer = Arc::new(FakeTransfer::succeeding());
        let coordinator = TransferCoordinator::new(transfer.clone(), Handle::current(), tx, ".");
        let mut table = table_with(vec![resolved("Dune")]);

        coordinator.start(&mut table, 0).unwrap();
        assert_eq!(
            coordinator.start(&mut table, 0),
            Err(StartRefusal::AlreadyDownloading)
        );

        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err(), "only one completion expected");
        assert_eq!(transfer.calls(), 1);
    }

    #[tokio::test]
    async fn failed_transfer_reports_error_outcome() {
        let (tx, mut rx) = unbounded_channel();
        let transfer = Arc::new(FakeTransfer::failing(500));
        let coordinator = TransferCoordinator::new(transfer, Handle::current(), tx, ".");
        let mut table = table_with(vec![resolved("Dune")]);

        coordinator.start(&mut table, 0).unwrap();

        match rx.recv().await {
            Some(AppEvent::TransferCompleted { outcome, .. }) => assert!(outcome.is_err()),
            other => panic!("expected TransferCompleted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refuses_empty_table_and_missing_row() {
        let (tx, _rx) = unbounded_channel();
        let transfer = Arc::new(FakeTransfer::succeeding());
        let coordinator = TransferCoordinator::new(transfer.clone(), Handle::current(), tx, ".");

        let mut empty = ResultTable::new();
        assert_eq!(coordinator.start(&mut empty, 0), Err(StartRefusal::NoResults));

        let mut table = table_with(vec![resolved("Dune")]);
        assert_eq!(coordinator.start(&mut table, 3), Err(StartRefusal::NoSuchRow(3)));
        assert_eq!(table.rows()[0].status(), TransferStatus::Empty);
        assert_eq!(transfer.calls(), 0);
    }

    #[tokio::test]
    async fn refuses_unresolvable_row() {
        let (tx, _rx) = unbounded_channel();
        let transfer = Arc::new(FakeTransfer::succeeding());
        let coordinator = TransferCoordinator::new(transfer.clone(), Handle::current(), tx, ".");
        let mut table = table_with(vec![Row::new(
            "A",
            "T",
            "pdf",
            Err(ResolutionError::UnsupportedIdentifier("123".to_string())),
        )]);

        let refusal = coordinator.start(&mut table, 0).unwrap_err();

        assert!(matches!(refusal, StartRefusal::Unresolvable(_)));
        assert_eq!(table.rows()[0].status(), TransferStatus::Failed);
        assert_eq!(transfer.calls(), 0);
    }

    #[tokio::test]
    async fn finished_row_can_be_downloaded_again() {
        let (tx, mut rx) = unbounded_channel();
        let transfer = Arc::new(FakeTransfer::succeeding());
        let coordinator = TransferCoordinator::new(transfer.clone(), Handle::current(), tx, ".");
        let mut table = table_with(vec![resolved("Dune")]);

        let first = coordinator.start(&mut table, 0).unwrap();
        rx.recv().await;
        table.set_status_tagged(first.tag, TransferStatus::Downloaded);

        coordinator.start(&mut table, 0).unwrap();
        rx.recv().await;
        assert_eq!(transfer.calls(), 2);
    }
}
