//! Catalog provider scraping the "simple" HTML result view.
//!
//! Each result is a `<tr>` whose cells are, by position: id (0), author(s) (1),
//! title link (2) and file extension (8). The title link carries the checksum
//! in its `md5=` query parameter. Rows without link text (headers, layout
//! rows) are ignored.

use super::{CatalogProvider, EncodedQuery};
use crate::model::{Record, SearchError};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?is)<tr\b[^>]*>(.*?)</tr>"));
static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?is)<td\b[^>]*>(.*?)</td>"));
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?is)<a\b([^>]*)>(.*?)</a>"));
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r#"(?is)\bhref\s*=\s*["']([^"']*)["']"#));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?s)<[^>]*>"));

#[allow(clippy::expect_used)]
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex pattern is valid")
}

const ID_CELL: usize = 0;
const AUTHOR_CELL: usize = 1;
const TITLE_CELL: usize = 2;
const FILE_TYPE_CELL: usize = 8;

/// Search provider for a Library Genesis style catalog.
#[derive(Debug, Clone)]
pub struct LibgenProvider {
    client: reqwest::Client,
    base_url: String,
    results_per_page: u32,
}

impl LibgenProvider {
    /// Provider for the catalog at `base_url`, asking for `results_per_page`
    /// results per search.
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        results_per_page: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            results_per_page,
        }
    }

    /// Search page URL for an encoded query.
    pub fn search_url(&self, query: &EncodedQuery) -> String {
        format!(
            "{}/search.php?req={}&lg_topic=libgen&open=0&view=simple&res={}&phrase=1&column=def",
            self.base_url,
            query.as_str(),
            self.results_per_page
        )
    }
}

#[async_trait]
impl CatalogProvider for LibgenProvider {
    #[instrument(level = "debug", skip(self), fields(query = query.as_str()))]
    async fn search(&self, query: &EncodedQuery) -> Result<Vec<Record>, SearchError> {
        let url = self.search_url(query);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::network(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "catalog rejected search");
            return Err(SearchError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::network(&url, e))?;

        let records = parse_results(&body);
        debug!(count = records.len(), "parsed result page");
        if records.is_empty() {
            return Err(SearchError::NoResults);
        }
        Ok(records)
    }
}

/// Extract records from a result page, in page order.
pub fn parse_results(html: &str) -> Vec<Record> {
    ROW_RE
        .captures_iter(html)
        .filter_map(|row| row.get(1).and_then(|inner| parse_row(inner.as_str())))
        .collect()
}

fn parse_row(row_html: &str) -> Option<Record> {
    let cells: Vec<&str> = CELL_RE
        .captures_iter(row_html)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    let title_cell = cells.get(TITLE_CELL)?;
    let (title, href) = anchor_text_and_first_href(title_cell);
    if title.is_empty() {
        return None;
    }

    let cell_text = |index: usize| cells.get(index).map(|c| text_content(c)).unwrap_or_default();
    let checksum = href.as_deref().map(checksum_from_href).unwrap_or_default();

    Some(Record::new(
        cell_text(ID_CELL),
        title,
        cell_text(AUTHOR_CELL),
        cell_text(FILE_TYPE_CELL),
        checksum,
    ))
}

/// Combined text of every `<a>` in a cell plus the first link target.
fn anchor_text_and_first_href(cell_html: &str) -> (String, Option<String>) {
    let mut text = String::new();
    let mut first_href = None;

    for anchor in ANCHOR_RE.captures_iter(cell_html) {
        if first_href.is_none() {
            first_href = anchor
                .get(1)
                .and_then(|attrs| HREF_RE.captures(attrs.as_str()))
                .and_then(|c| c.get(1))
                .map(|m| decode_entities(m.as_str()));
        }
        if let Some(inner) = anchor.get(2) {
            text.push_str(&strip_tags(inner.as_str()));
        }
    }

    (collapse_whitespace(&decode_entities(&text)), first_href)
}

/// Checksum after `md5=` in a link, empty when absent or ambiguous.
fn checksum_from_href(href: &str) -> String {
    let parts: Vec<&str> = href.split("md5=").collect();
    match parts.as_slice() {
        [_, checksum] => checksum
            .split(['&', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn text_content(html: &str) -> String {
    collapse_whitespace(&decode_entities(&strip_tags(html)))
}

fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
