//! Error types for the host binary.
//!
//! [`HostError`] is the top-level error type that wraps all possible
//! failure modes during host startup and the command loop.

/// Top-level error for the host binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: reservoir_core::config::ConfigError,
    },

    /// The state file could not be opened.
    #[error("storage error: {source}")]
    Storage {
        /// The underlying storage error.
        #[from]
        source: reservoir_db::DbError,
    },

    /// Reading commands from stdin failed.
    #[error("input error: {source}")]
    Input {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
