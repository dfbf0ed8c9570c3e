//! Download link construction.
//!
//! Pure string building: no I/O, same input always gives the same URL.

use crate::config::loader::DEFAULT_MIRROR_BASE_URL;
use crate::model::{Record, ResolutionError};

/// Builds content URLs on a mirror.
///
/// Layout: `<base><shard>/<checksum>/<title>.<file_type>` where the shard
/// directory is derived from the catalog identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResolver {
    base_url: String,
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MIRROR_BASE_URL)
    }
}

impl LinkResolver {
    /// Create a resolver for a mirror prefix. A trailing `/` is added if missing.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    /// Resolve the content URL for a record.
    pub fn resolve_record(&self, record: &Record) -> Result<String, ResolutionError> {
        self.resolve(
            record.checksum(),
            record.id(),
            record.title(),
            record.file_type(),
        )
    }

    /// Resolve the content URL from its parts.
    ///
    /// # Errors
    ///
    /// - [`ResolutionError::MissingChecksum`] for an empty checksum
    /// - [`ResolutionError::UnsupportedIdentifier`] for ids that are not 4 or 5 digits
    pub fn resolve(
        &self,
        checksum: &str,
        id: &str,
        title: &str,
        file_type: &str,
    ) -> Result<String, ResolutionError> {
        let checksum = checksum.trim();
        if checksum.is_empty() {
            return Err(ResolutionError::MissingChecksum);
        }
        let shard = shard_segment(id.trim())?;

        Ok(format!(
            "{}{}/{}/{}.{}",
            self.base_url,
            shard,
            checksum.to_lowercase(),
            title_segment(title),
            file_type
        ))
    }
}

/// Shard directory for a catalog identifier.
///
/// 4-digit ids shard by their first digit, 5-digit ids by their first two,
/// both padded with `000`: `"1234"` → `"1000"`, `"12345"` → `"12000"`.
pub fn shard_segment(id: &str) -> Result<String, ResolutionError> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ResolutionError::UnsupportedIdentifier(id.to_string()));
    }
    let prefix_len = match id.len() {
        4 => 1,
        5 => 2,
        _ => return Err(ResolutionError::UnsupportedIdentifier(id.to_string())),
    };
    Ok(format!("{}000", &id[..prefix_len]))
}

/// Title as embedded in the URL.
///
/// Keeps ASCII letters, digits and spaces, then turns each space into `_`.
pub fn title_segment(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}
