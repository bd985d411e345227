//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Placeholder shown for a response body that has not resolved yet
pub const LOADING_PLACEHOLDER: &str = "Loading...";

/// Visible marker used when a text body cannot be split for display
pub const LARGE_TEXT_ERROR: &str = "Error while rendering large text";

/// Default maximum size (in chars) of one displayed text segment
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Statuses at or above this value count as errors
pub const DEFAULT_ERROR_STATUS: i32 = 400;

/// Default log file written by the binary
pub const DEFAULT_LOG_FILE: &str = "netscope.log";

/// Name of the per-user config directory under the home directory
pub const CONFIG_DIR_NAME: &str = ".netscope";

/// Application name
pub const APP_NAME: &str = "netscope";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
