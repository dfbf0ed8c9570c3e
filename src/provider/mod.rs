//! Catalog search.
//!
//! - [`CatalogProvider`] - where records come from (HTML scraping in practice)
//! - [`SearchSession`] - encodes the query, runs the provider and turns the
//!   ranked records into table rows
//! - [`LinkResolver`] - pure download-link construction

use crate::model::{Record, Row, SearchError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub mod libgen;
pub mod link;

pub use libgen::LibgenProvider;
pub use link::LinkResolver;

// ===== EncodedQuery =====

/// A query in `application/x-www-form-urlencoded` form, ready for a URL.
///
/// Providers only accept this type, so raw user text never reaches a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedQuery(String);

impl EncodedQuery {
    /// Encode raw query text (space → `+`, reserved bytes → `%XX`).
    pub fn encode(raw: &str) -> Self {
        Self(url::form_urlencoded::byte_serialize(raw.as_bytes()).collect())
    }

    /// The encoded text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ===== CatalogProvider =====

/// Source of ranked catalog records.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Return records for a query in provider rank order.
    ///
    /// # Errors
    ///
    /// Network failures, non-success responses and pages without any result
    /// rows are all [`SearchError`]s.
    async fn search(&self, query: &EncodedQuery) -> Result<Vec<Record>, SearchError>;
}

// ===== RowPolicy =====

/// Which ranked records become rows.
///
/// The window is `records[head_skip .. min(len, max_rows)]`: the first
/// `head_skip` results are dropped and `max_rows` bounds the provider rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPolicy {
    /// Leading records dropped.
    pub head_skip: usize,
    /// Exclusive bound on provider rank.
    pub max_rows: usize,
}

impl Default for RowPolicy {
    fn default() -> Self {
        use crate::config::loader::{DEFAULT_HEAD_SKIP, DEFAULT_MAX_ROWS};
        Self {
            head_skip: DEFAULT_HEAD_SKIP,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl RowPolicy {
    /// Slice of `records` that is displayed.
    pub fn window<'a>(&self, records: &'a [Record]) -> &'a [Record] {
        let end = records.len().min(self.max_rows);
        records.get(self.head_skip..end).unwrap_or(&[])
    }
}

// ===== SearchSession =====

/// Runs one search end to end.
///
/// Shared across search tasks; holds no per-search state.
#[derive(Clone)]
pub struct SearchSession {
    provider: Arc<dyn CatalogProvider>,
    resolver: LinkResolver,
    policy: RowPolicy,
}

impl SearchSession {
    /// Session over `provider`, resolving links with `resolver`.
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        resolver: LinkResolver,
        policy: RowPolicy,
    ) -> Self {
        Self {
            provider,
            resolver,
            policy,
        }
    }

    /// Encode `query` and fetch ranked records from the provider.
    #[instrument(level = "debug", skip(self))]
    pub async fn run(&self, query: &str) -> Result<Vec<Record>, SearchError> {
        let encoded = EncodedQuery::encode(query);
        debug!(encoded = encoded.as_str(), "querying provider");
        self.provider.search(&encoded).await
    }

    /// Build rows for the display window, resolving each download link.
    ///
    /// # Errors
    ///
    /// [`SearchError::NoUsableRows`] when the window is empty.
    pub fn materialize(&self, records: &[Record]) -> Result<Vec<Row>, SearchError> {
        let rows: Vec<Row> = self
            .policy
            .window(records)
            .iter()
            .map(|record| Row::from_record(record, self.resolver.resolve_record(record)))
            .collect();

        if rows.is_empty() {
            return Err(SearchError::NoUsableRows {
                found: records.len(),
                skipped: self.policy.head_skip,
            });
        }
        Ok(rows)
    }

    /// [`run`](Self::run) followed by [`materialize`](Self::materialize).
    pub async fn search(&self, query: &str) -> Result<Vec<Row>, SearchError> {
        let records = self.run(query).await?;
        let rows = self.materialize(&records)?;
        info!(
            records = records.len(),
            rows = rows.len(),
            "search produced rows"
        );
        Ok(rows)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory provider for controller and session tests.

    use super::*;
    use std::sync::Mutex;

    /// Records numbered `0..count` with 4-digit ids and distinct titles.
    pub fn numbered_records(count: usize) -> Vec<Record> {
        (0..count)
            .map(|i| {
                Record::new(
                    format!("{}", 1000 + i),
                    format!("Book {i}"),
                    format!("Author {i}"),
                    "epub",
                    format!("ABC{i:03}"),
                )
            })
            .collect()
    }

    /// Provider answering every query from a fixed script.
    pub struct FakeProvider {
        responses: Mutex<Vec<Result<Vec<Record>, SearchError>>>,
        queries: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        /// Answers are consumed in order; once exhausted every search fails
        /// with `NoResults`.
        pub fn scripted(responses: Vec<Result<Vec<Record>, SearchError>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                queries: Mutex::new(Vec::new()),
            }
        }

        /// Answer the first search with `records`.
        pub fn returning(records: Vec<Record>) -> Self {
            Self::scripted(vec![Ok(records)])
        }

        /// Encoded queries received so far.
        pub fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogProvider for FakeProvider {
        async fn search(&self, query: &EncodedQuery) -> Result<Vec<Record>, SearchError> {
            self.queries.lock().unwrap().push(query.as_str().to_string());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(SearchError::NoResults))
        }
    }
}
