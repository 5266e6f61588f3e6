//! Shared constants used across the application.

/// User agent presented by both the browser and the HTTP client.
///
/// A realistic desktop Chrome string; several boards serve an empty shell
/// to unknown agents.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
