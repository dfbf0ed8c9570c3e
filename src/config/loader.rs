//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Default catalog search host.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://libgen.is";

/// Default mirror serving record content.
pub const DEFAULT_MIRROR_BASE_URL: &str = "https://download.library.lol/main/";

/// Results requested per catalog page.
pub const DEFAULT_RESULTS_PER_PAGE: u32 = 100;

/// Leading provider results dropped from every result set.
pub const DEFAULT_HEAD_SKIP: usize = 3;

/// Exclusive upper bound on the provider rank of a displayed record.
pub const DEFAULT_MAX_ROWS: usize = 50;

/// Maximum query length in characters.
pub const DEFAULT_QUERY_CHAR_LIMIT: usize = 250;

/// Timeout applied to every HTTP request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/bookdl/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Catalog host searched on Enter.
    #[serde(default)]
    pub catalog_base_url: Option<String>,

    /// Mirror prefix used to build download links.
    #[serde(default)]
    pub mirror_base_url: Option<String>,

    /// Results requested per catalog page.
    #[serde(default)]
    pub results_per_page: Option<u32>,

    /// Leading results skipped.
    #[serde(default)]
    pub head_skip: Option<usize>,

    /// Rank cutoff for displayed results.
    #[serde(default)]
    pub max_rows: Option<usize>,

    /// Query length limit.
    #[serde(default)]
    pub query_char_limit: Option<usize>,

    /// Directory downloads are written into.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Disable colors.
    #[serde(default)]
    pub no_color: Option<bool>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Catalog host searched on Enter.
    pub catalog_base_url: String,
    /// Mirror prefix for download links.
    pub mirror_base_url: String,
    /// Results requested per catalog page.
    pub results_per_page: u32,
    /// Leading results dropped from every result set.
    pub head_skip: usize,
    /// Exclusive rank bound for displayed results.
    pub max_rows: usize,
    /// Maximum query length in characters.
    pub query_char_limit: usize,
    /// Directory downloads are written into.
    pub download_dir: PathBuf,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Log file location.
    pub log_file_path: PathBuf,
    /// Disable colors.
    pub no_color: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            mirror_base_url: DEFAULT_MIRROR_BASE_URL.to_string(),
            results_per_page: DEFAULT_RESULTS_PER_PAGE,
            head_skip: DEFAULT_HEAD_SKIP,
            max_rows: DEFAULT_MAX_ROWS,
            query_char_limit: DEFAULT_QUERY_CHAR_LIMIT,
            download_dir: PathBuf::from("."),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_file_path: default_log_path(),
            no_color: false,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/bookdl/bookdl.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("bookdl").join("bookdl.log")
    } else {
        PathBuf::from("bookdl.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/bookdl/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bookdl").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `BOOKDL_CONFIG` environment variable
/// 3. Default path `~/.config/bookdl/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("BOOKDL_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `BOOKDL_DOWNLOAD_DIR`: Override download directory
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(dir) = std::env::var("BOOKDL_DOWNLOAD_DIR") {
        if !dir.is_empty() {
            config.download_dir = PathBuf::from(dir);
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        catalog_base_url: config
            .catalog_base_url
            .unwrap_or(defaults.catalog_base_url),
        mirror_base_url: config.mirror_base_url.unwrap_or(defaults.mirror_base_url),
        results_per_page: config.results_per_page.unwrap_or(defaults.results_per_page),
        head_skip: config.head_skip.unwrap_or(defaults.head_skip),
        max_rows: config.max_rows.unwrap_or(defaults.max_rows),
        query_char_limit: config.query_char_limit.unwrap_or(defaults.query_char_limit),
        download_dir: config.download_dir.unwrap_or(defaults.download_dir),
        request_timeout_secs: config
            .request_timeout_secs
            .unwrap_or(defaults.request_timeout_secs),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        no_color: config.no_color.unwrap_or(defaults.no_color),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    no_color_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(no_color) = no_color_override {
        config.no_color = no_color;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
