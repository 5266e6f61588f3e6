use std::time::Duration;

use async_trait::async_trait;

use crate::clock::RunClock;
use crate::error::SourceError;
use crate::listing::{HandleKind, JobBoard, ListingRecord};
use crate::session::{HttpFetcher, RenderedPage};

/// Default wait after scrolling a lazy-loaded list to the bottom.
pub const DEFAULT_SCROLL_SETTLE: Duration = Duration::from_secs(3);

/// Default page navigation bound.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Default bound for API requests.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Run-wide inputs every adapter call receives.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext {
    /// Fixed `now` and recency threshold for the run.
    pub clock: RunClock,
    pub navigation_timeout: Duration,
    pub scroll_settle: Duration,
    pub http_timeout: Duration,
}

impl ExtractContext {
    #[must_use]
    pub fn new(clock: RunClock) -> Self {
        Self {
            clock,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            scroll_settle: DEFAULT_SCROLL_SETTLE,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// What an adapter reads a source through.
#[derive(Clone, Copy)]
pub enum SourceHandle<'a> {
    Page(&'a dyn RenderedPage),
    Http(&'a dyn HttpFetcher),
}

impl<'a> SourceHandle<'a> {
    /// The rendered page, or an error naming the adapter that needed one.
    pub fn page(self, board: JobBoard) -> Result<&'a dyn RenderedPage, SourceError> {
        match self {
            Self::Page(page) => Ok(page),
            Self::Http(_) => Err(SourceError::WrongHandle {
                adapter: board.id(),
                expected: HandleKind::Page.as_str(),
            }),
        }
    }

    /// The HTTP client, or an error naming the adapter that needed one.
    pub fn http(self, board: JobBoard) -> Result<&'a dyn HttpFetcher, SourceError> {
        match self {
            Self::Http(http) => Ok(http),
            Self::Page(_) => Err(SourceError::WrongHandle {
                adapter: board.id(),
                expected: HandleKind::Http.as_str(),
            }),
        }
    }
}

/// Extracts listings for one job board.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// The board this adapter understands.
    fn board(&self) -> JobBoard;

    /// Kind of handle [`SiteAdapter::extract`] expects.
    fn handle_kind(&self) -> HandleKind {
        self.board().handle_kind()
    }

    /// Extract recent listings from `source_url`.
    ///
    /// Items that cannot be read, have no parseable time, or fall at or
    /// before the run's recency threshold are skipped. A selector-wait
    /// timeout yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error only when the source itself is unavailable
    /// (navigation failure, non-2xx status, wrong handle kind).
    async fn extract(
        &self,
        handle: SourceHandle<'_>,
        source_url: &str,
        ctx: &ExtractContext,
    ) -> Result<Vec<ListingRecord>, SourceError>;
}
