//! Destination filenames for downloads.

use crate::model::Row;
use std::path::{Path, PathBuf};

/// Name used when a title sanitizes to nothing usable.
pub const FALLBACK_FILENAME: &str = "download";

/// Make `name` safe to use as a single path component.
///
/// Spaces and path separators become `_`, then everything outside
/// `[A-Za-z0-9_.-]` is dropped. A result that is empty or only dots
/// (`.`, `..`) is replaced by [`FALLBACK_FILENAME`]. Idempotent.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter_map(|c| match c {
            ' ' | '/' | '\\' => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') => Some(c),
            _ => None,
        })
        .collect();

    if sanitized.chars().all(|c| c == '.') {
        FALLBACK_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// `<title>.<file_type>`, sanitized.
pub fn row_filename(row: &Row) -> String {
    sanitize_filename(&format!("{}.{}", row.title(), row.file_type()))
}

/// Where a row's download is written inside `download_dir`.
pub fn destination_for(download_dir: &Path, row: &Row) -> PathBuf {
    download_dir.join(row_filename(row))
}

/// Sibling path the bytes stream into before the final rename.
pub fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_spaces_and_drops_symbols() {
        assert_eq!(sanitize_filename("Test File@123.txt"), "Test_File123.txt");
        assert_eq!(sanitize_filename("Test#File.txt"), "TestFile.txt");
    }

    #[test]
    fn path_separators_cannot_escape() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("a\\b"), "a_b");
        assert!(!sanitize_filename("/abs/path").contains('/'));
    }

    #[test]
    fn dot_only_names_fall_back() {
        assert_eq!(sanitize_filename(""), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename("."), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename(".."), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename("???"), FALLBACK_FILENAME);
        assert_eq!(sanitize_filename("ü."), FALLBACK_FILENAME);
    }

    #[test]
    fn keeps_allowed_punctuation() {
        assert_eq!(sanitize_filename("a-b_c.d"), "a-b_c.d");
    }

    #[test]
    fn sanitize_is_idempotent_on_samples() {
        for s in ["Dune: Messiah!", "  ", "a/b\\c d", "..", "über.pdf"] {
            let once = sanitize_filename(s);
            assert_eq!(sanitize_filename(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn row_filename_joins_title_and_type() {
        let row = Row::new("A", "Dune: Deluxe Edition", "epub", Ok("u".to_string()));
        assert_eq!(row_filename(&row), "Dune_Deluxe_Edition.epub");
        assert_eq!(
            destination_for(Path::new("/tmp/books"), &row),
            PathBuf::from("/tmp/books/Dune_Deluxe_Edition.epub")
        );
    }

    #[test]
    fn partial_path_appends_suffix() {
        assert_eq!(
            partial_path(Path::new("/tmp/Dune.epub")),
            PathBuf::from("/tmp/Dune.epub.part")
        );
    }
}
