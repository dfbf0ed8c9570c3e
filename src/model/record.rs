//! Catalog record as returned by a search provider.

/// One catalog entry.
///
/// Produced by a [`CatalogProvider`](crate::provider::CatalogProvider) and never
/// mutated afterwards. Lives only as long as the result set it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: String,
    title: String,
    author: String,
    file_type: String,
    checksum: String,
}

impl Record {
    /// Create a record from provider fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        file_type: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            file_type: file_type.into(),
            checksum: checksum.into(),
        }
    }

    /// Catalog identifier (numeric in practice, kept as text).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author line as published.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// File extension without the leading dot, e.g. `"epub"`.
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// Content checksum (MD5 hex as published by the catalog).
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_return_constructor_values() {
        let record = Record::new("1234", "Dune", "Frank Herbert", "epub", "ABCDEF");
        assert_eq!(record.id(), "1234");
        assert_eq!(record.title(), "Dune");
        assert_eq!(record.author(), "Frank Herbert");
        assert_eq!(record.file_type(), "epub");
        assert_eq!(record.checksum(), "ABCDEF");
    }
}
