//! The shared listing shape every adapter produces.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Serialized format of [`ListingRecord::posted_at`].
pub const POSTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sentinel company when a board does not expose one.
pub const UNKNOWN_COMPANY: &str = "N/A";

/// Default sentinel location for boards without a location field.
pub const REMOTE_GLOBAL: &str = "Remote/Global";

/// How a source has to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    /// A rendered browser tab.
    Page,
    /// A plain HTTP request.
    Http,
}

impl HandleKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Http => "http",
        }
    }
}

/// The fixed set of job boards the feed is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobBoard {
    Dribbble,
    RemoteRocketship,
    BuiltIn,
    Up2Staff,
    WeWorkRemotely,
    JustRemote,
    Remote4Africa,
    RealWorkFromAnywhere,
    ProductJobsAnywhere,
}

impl JobBoard {
    pub const ALL: [Self; 9] = [
        Self::Dribbble,
        Self::RemoteRocketship,
        Self::BuiltIn,
        Self::Up2Staff,
        Self::WeWorkRemotely,
        Self::JustRemote,
        Self::Remote4Africa,
        Self::RealWorkFromAnywhere,
        Self::ProductJobsAnywhere,
    ];

    /// Stable identifier used in configuration.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Dribbble => "dribbble",
            Self::RemoteRocketship => "remoterocketship",
            Self::BuiltIn => "builtin",
            Self::Up2Staff => "up2staff_api",
            Self::WeWorkRemotely => "weworkremotely",
            Self::JustRemote => "justremote",
            Self::Remote4Africa => "remote4africa",
            Self::RealWorkFromAnywhere => "realworkfromanywhere",
            Self::ProductJobsAnywhere => "productjobsanywhere",
        }
    }

    /// Human-readable name written to the `source` field.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Dribbble => "Dribbble",
            Self::RemoteRocketship => "RemoteRocketship",
            Self::BuiltIn => "BuiltIn",
            Self::Up2Staff => "Up2Staff",
            Self::WeWorkRemotely => "WeWorkRemotely",
            Self::JustRemote => "Just Remote",
            Self::Remote4Africa => "Remote4Africa",
            Self::RealWorkFromAnywhere => "Real Work From Anywhere",
            Self::ProductJobsAnywhere => "Product Jobs Anywhere",
        }
    }

    /// Origin that relative listing links are resolved against.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Dribbble => "https://dribbble.com",
            Self::RemoteRocketship => "https://www.remoterocketship.com",
            Self::BuiltIn => "https://builtin.com",
            Self::Up2Staff => "https://up2staff.com",
            Self::WeWorkRemotely => "https://weworkremotely.com",
            Self::JustRemote => "https://justremote.co",
            Self::Remote4Africa => "https://remote4africa.com",
            Self::RealWorkFromAnywhere => "https://www.realworkfromanywhere.com",
            Self::ProductJobsAnywhere => "https://productjobsanywhere.com",
        }
    }

    /// Location written when the board shows none.
    #[must_use]
    pub const fn location_sentinel(self) -> &'static str {
        match self {
            Self::Remote4Africa => "Remote/Africa",
            Self::RealWorkFromAnywhere => "Remote/Worldwide",
            _ => REMOTE_GLOBAL,
        }
    }

    /// Kind of handle the board's adapter reads from.
    #[must_use]
    pub const fn handle_kind(self) -> HandleKind {
        match self {
            Self::Up2Staff => HandleKind::Http,
            _ => HandleKind::Page,
        }
    }

    /// Whether listing URLs change between renders of the same posting.
    #[must_use]
    pub const fn rewrites_urls(self) -> bool {
        matches!(self, Self::BuiltIn)
    }
}

impl fmt::Display for JobBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error for an unrecognised board identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job board '{0}'")]
pub struct UnknownBoard(pub String);

impl FromStr for JobBoard {
    type Err = UnknownBoard;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|board| board.id() == wanted)
            .ok_or_else(|| UnknownBoard(s.to_string()))
    }
}

/// One job posting, as written to the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    /// Raw posted-time text from the board.
    pub posted_ago_text: String,
    #[serde(serialize_with = "serialize_posted_at")]
    pub posted_at: NaiveDateTime,
    /// Absolute listing URL.
    pub url: String,
    #[serde(serialize_with = "serialize_board")]
    pub source: JobBoard,
}

impl ListingRecord {
    /// Key deciding whether two records describe the same posting.
    ///
    /// The URL, except on boards that rewrite URLs between renders, where
    /// the board, the whitespace-collapsed title and the posted text are
    /// combined instead.
    #[must_use]
    pub fn dedupe_key(&self) -> String {
        if self.source.rewrites_urls() {
            format!(
                "{}:{}:{}",
                self.source.display_name(),
                collapse_whitespace(&self.title.to_lowercase()),
                collapse_whitespace(&self.posted_ago_text.to_lowercase()),
            )
        } else {
            self.url.clone()
        }
    }
}

/// Trim and squeeze internal whitespace runs to a single space.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn serialize_posted_at<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&value.format(POSTED_AT_FORMAT))
}

fn serialize_board<S: Serializer>(value: &JobBoard, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(value.display_name())
}
