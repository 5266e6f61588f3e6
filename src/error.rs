//! Error taxonomy for a collection run.
//!
//! Failures are contained where they happen: an [`ItemError`] skips one
//! listing, a [`SourceError`] empties one registry entry, and only a
//! [`SessionError`] aborts the whole run.

use std::time::Duration;

use thiserror::Error;

/// A registry entry could not be read at all.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },
    #[error("HTTP request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("browser session is closed")]
    SessionClosed,
    #[error("browser protocol error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
    #[error("invalid URL {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("adapter {adapter} expects a {expected} handle")]
    WrongHandle {
        adapter: &'static str,
        expected: &'static str,
    },
}

/// One listing's fields could not be read. Never surfaced past the adapter.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("filtered out: {0}")]
    Filtered(&'static str),
    #[error(transparent)]
    Dom(#[from] SourceError),
}

/// The browser capability could not be created. Fatal for the run.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to build browser config: {0}")]
    Config(String),
    #[error("failed to launch browser: {0}")]
    Launch(#[from] chromiumoxide::error::CdpError),
}
