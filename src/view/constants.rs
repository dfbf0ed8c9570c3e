//! Layout dimension constants for TUI rendering.

/// Height of the query box in lines (border + input line).
pub const QUERY_INPUT_HEIGHT: u16 = 3;

/// Height of the status bar in lines.
///
/// One line for the latest status message, one for key hints.
pub const STATUS_BAR_HEIGHT: u16 = 2;

/// Rows of the table occupied by borders and the header.
///
/// Top border, header line, header separator and bottom border.
pub const TABLE_CHROME_HEIGHT: u16 = 4;

/// Width of the author column.
pub const AUTHOR_COLUMN_WIDTH: u16 = 30;
/// Width of the title column.
pub const TITLE_COLUMN_WIDTH: u16 = 60;
/// Width of the file type column.
pub const FILE_TYPE_COLUMN_WIDTH: u16 = 10;
/// Width of the link column.
pub const LINK_COLUMN_WIDTH: u16 = 30;
/// Width of the status column.
pub const STATUS_COLUMN_WIDTH: u16 = 15;

/// Key hints shown under the status line.
pub const KEY_HINTS: &str = "Enter to search. ESC to quit. Ctrl+D to download.";

/// Placeholder shown in an empty query box.
pub const QUERY_PLACEHOLDER: &str = "Query";
