//! Background downloads.
//!
//! - [`ByteTransfer`] - moves the bytes of one URL into one file
//! - [`TransferCoordinator`] - starts at most one transfer per row and reports
//!   completions back to the controller as events

use crate::model::TransferError;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

mod coordinator;
pub mod filename;

pub use coordinator::{StartRefusal, StartedTransfer, TransferCoordinator};
pub use filename::{destination_for, partial_path, sanitize_filename};

// ===== ByteTransfer =====

/// Copies the content at a URL to a local file.
#[async_trait]
pub trait ByteTransfer: Send + Sync {
    /// Download `url` into `destination`, replacing any existing file.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// On any error `destination` is left untouched and no partial file
    /// remains.
    async fn fetch(&self, url: &str, destination: &Path) -> Result<u64, TransferError>;
}

// ===== HttpTransfer =====

/// [`ByteTransfer`] over HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpTransfer {
    client: reqwest::Client,
}

impl HttpTransfer {
    /// Transfer using `client` for every request.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ByteTransfer for HttpTransfer {
    #[instrument(level = "debug", skip(self), fields(destination = %destination.display()))]
    async fn fetch(&self, url: &str, destination: &Path) -> Result<u64, TransferError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransferError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let partial = partial_path(destination);
        let file = File::create(&partial)
            .await
            .map_err(|e| TransferError::io(partial.clone(), e))?;

        let written = match stream_to_file(file, response, url, &partial).await {
            Ok(written) => written,
            Err(err) => {
                debug!(path = %partial.display(), "removing partial file after error");
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(err);
            }
        };

        if let Err(e) = tokio::fs::rename(&partial, destination).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(TransferError::io(destination.to_path_buf(), e));
        }

        info!(bytes = written, "transfer written");
        Ok(written)
    }
}

async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, TransferError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| TransferError::network(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| TransferError::io(path.to_path_buf(), e))?;
        written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| TransferError::io(path.to_path_buf(), e))?;

    Ok(written)
}
