//! Colors for the renderer.
//!
//! A [`Theme`] is built once at startup and handed to the renderer; nothing
//! here is global.

use crate::model::TransferStatus;
use crate::state::StatusKind;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag or `no_color` config key
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Priority (first match wins):
    /// 1. `no_color` setting (disables colors)
    /// 2. `NO_COLOR` env var (any value disables colors)
    /// 3. Default: colors enabled
    pub fn from_env_and_args(no_color: bool) -> Self {
        let enabled = !no_color && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Colors on regardless of environment.
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== Theme =====

/// Styles for every element the renderer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Box borders.
    pub border: Style,
    /// Table header row.
    pub header: Style,
    /// Highlighted table row.
    pub selected_row: Style,
    /// Cell under the query cursor.
    pub cursor: Style,
    /// Placeholder in an empty query box.
    pub placeholder: Style,
    /// Informational status messages.
    pub info: Style,
    /// Error status messages.
    pub error: Style,
    /// Key hint line.
    pub hints: Style,
    /// `Downloading...` status cells and the in-flight counter.
    pub downloading: Style,
    /// `Downloaded` status cells.
    pub downloaded: Style,
    /// `Failed` status cells.
    pub failed: Style,
}

impl Theme {
    /// Build the theme. Without colors, only modifiers are used so the
    /// selection and cursor stay visible.
    pub fn new(colors: ColorConfig) -> Self {
        if colors.colors_enabled() {
            Self {
                border: Style::default().fg(Color::Indexed(240)),
                header: Style::default().add_modifier(Modifier::BOLD),
                selected_row: Style::default()
                    .fg(Color::Indexed(229))
                    .bg(Color::Indexed(57))
                    .add_modifier(Modifier::BOLD),
                cursor: Style::default().bg(Color::White).fg(Color::Black),
                placeholder: Style::default().fg(Color::DarkGray),
                info: Style::default().fg(Color::Gray),
                error: Style::default().fg(Color::Red),
                hints: Style::default().fg(Color::DarkGray),
                downloading: Style::default().fg(Color::Yellow),
                downloaded: Style::default().fg(Color::Green),
                failed: Style::default().fg(Color::Red),
            }
        } else {
            Self {
                border: Style::default(),
                header: Style::default().add_modifier(Modifier::BOLD),
                selected_row: Style::default().add_modifier(Modifier::REVERSED),
                cursor: Style::default().add_modifier(Modifier::REVERSED),
                placeholder: Style::default().add_modifier(Modifier::DIM),
                info: Style::default(),
                error: Style::default().add_modifier(Modifier::BOLD),
                hints: Style::default().add_modifier(Modifier::DIM),
                downloading: Style::default(),
                downloaded: Style::default(),
                failed: Style::default(),
            }
        }
    }

    /// Style for a status message of `kind`.
    pub fn status_message(&self, kind: StatusKind) -> Style {
        match kind {
            StatusKind::Info => self.info,
            StatusKind::Error => self.error,
        }
    }

    /// Style for a status column cell.
    pub fn transfer_status(&self, status: TransferStatus) -> Style {
        match status {
            TransferStatus::Empty => Style::default(),
            TransferStatus::Downloading => self.downloading,
            TransferStatus::Downloaded => self.downloaded,
            TransferStatus::Failed => self.failed,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ColorConfig::enabled())
    }
}

// ===== Tests =====
