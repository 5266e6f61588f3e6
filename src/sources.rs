//! The ordered list of sources a run visits.

use std::path::Path;

use serde::Deserialize;

use crate::config::ConfigError;
use crate::listing::{HandleKind, JobBoard};

/// One registry entry: a URL and the adapter that reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub url: String,
    pub board: JobBoard,
    pub handle: HandleKind,
}

impl SourceEntry {
    /// An entry read through the board's natural handle kind.
    #[must_use]
    pub fn new(url: impl Into<String>, board: JobBoard) -> Self {
        Self {
            url: url.into(),
            board,
            handle: board.handle_kind(),
        }
    }
}

/// The built-in registry, in visiting order.
#[must_use]
pub fn default_sources() -> Vec<SourceEntry> {
    vec![
        SourceEntry::new(
            "https://dribbble.com/jobs?keyword=product+designer&location=",
            JobBoard::Dribbble,
        ),
        SourceEntry::new(
            "https://dribbble.com/jobs?keyword=ui%2Fux+designer&location=",
            JobBoard::Dribbble,
        ),
        SourceEntry::new(
            "https://www.remoterocketship.com/jobs/ui-ux-designer/?page=1&sort=DateAdded&jobTitle=UI%2FUX+Designer",
            JobBoard::RemoteRocketship,
        ),
        SourceEntry::new(
            "https://builtin.com/jobs/remote?search=ui%2Fux+designer&country=USA&allLocations=true",
            JobBoard::BuiltIn,
        ),
        SourceEntry::new("https://up2staff.com/", JobBoard::Up2Staff),
        SourceEntry::new(
            "https://weworkremotely.com/remote-jobs/search?term=ui+ux+designer",
            JobBoard::WeWorkRemotely,
        ),
        SourceEntry::new("https://justremote.co/remote-ui-ux-jobs", JobBoard::JustRemote),
        SourceEntry::new(
            "https://remote4africa.com/jobs/search?q=ui%2Fux+designer",
            JobBoard::Remote4Africa,
        ),
        SourceEntry::new(
            "https://www.realworkfromanywhere.com/remote-product-designer-jobs",
            JobBoard::RealWorkFromAnywhere,
        ),
        SourceEntry::new(
            "https://productjobsanywhere.com/jobs/product-designers/?utm_source=chatgpt.com",
            JobBoard::ProductJobsAnywhere,
        ),
    ]
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(default, rename = "source")]
    sources: Vec<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    url: String,
    board: String,
    handle: Option<HandleKind>,
}

/// Parse a TOML registry of `[[source]]` tables.
///
/// # Errors
///
/// Returns an error on malformed TOML or an unknown board identifier.
pub fn parse_sources(text: &str, origin: &Path) -> Result<Vec<SourceEntry>, ConfigError> {
    let file: SourcesFile = toml::from_str(text).map_err(|source| ConfigError::SourcesParse {
        path: origin.to_path_buf(),
        source,
    })?;

    file.sources
        .into_iter()
        .map(|raw| {
            let board: JobBoard = raw.board.parse().map_err(|e| ConfigError::InvalidValue {
                name: "SOURCES_FILE".to_string(),
                message: format!("{e}"),
            })?;
            Ok(SourceEntry {
                url: raw.url,
                board,
                handle: raw.handle.unwrap_or_else(|| board.handle_kind()),
            })
        })
        .collect()
}

/// Read a TOML registry from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_sources(path: &Path) -> Result<Vec<SourceEntry>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::SourcesRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sources(&text, path)
}
