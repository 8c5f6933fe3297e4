//! Domain-specific error types for reposetup.
//!
//! This module defines `ReposetupError`, a `thiserror`-based enum that
//! provides typed error variants for common failure modes. Public API
//! functions return `Result<T, ReposetupError>` where callers benefit
//! from matching on variants, while trait boundaries continue to use
//! `anyhow::Result`.
//!
//! `ReposetupError` implements `Into<anyhow::Error>`, so the `?` operator
//! converts it automatically at trait boundaries that return `anyhow::Result`.

/// Domain-specific error type for reposetup.
///
/// Provides typed variants for common failure modes, enabling callers
/// to match on error kinds programmatically rather than parsing error
/// message strings.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ReposetupError {
    /// A validation constraint was violated.
    #[error("validation error: {0}")]
    Validation(String),

    /// A configuration manifest could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A remote command failed (non-zero exit, spawn failure, etc.).
    #[error("remote command failed on {host}: {command}: {status}")]
    Execution {
        /// The host the command was dispatched to.
        host: String,
        /// The command that was executed.
        command: String,
        /// Human-readable reason for the failure: exit code, signal
        /// information, or a description of the transport error.
        status: String,
    },

    /// A repository availability probe could not complete.
    ///
    /// Emitted for transport-level failures only; a non-200 response is
    /// not an error, it simply excludes the candidate.
    #[error("repository probe failed: {url}")]
    Probe {
        /// The compose URL that was being checked.
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
