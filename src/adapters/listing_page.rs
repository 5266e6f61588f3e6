//! Extraction flow shared by every board.
//!
//! A board supplies a [`PageLayout`] and an [`ItemReader`] that pulls the raw
//! fields out of one listing container. Everything else lives here: waiting
//! for the list, scrolling lazy lists, isolating per-item failures,
//! normalizing the posted time, applying the recency threshold, resolving
//! URLs and filling in sentinels.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::normalize::resolve_url;
use super::traits::{ExtractContext, SiteAdapter, SourceHandle};
use crate::error::{ItemError, SourceError};
use crate::listing::{collapse_whitespace, JobBoard, ListingRecord, UNKNOWN_COMPANY};
use crate::posted_time;
use crate::session::{DomElement, DomNode, RenderedPage};

/// Where listings live on a board's page.
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    /// Selector matching one listing container.
    pub container: &'static str,
    /// How long to wait for the first container.
    pub wait: Duration,
    /// Scroll to the bottom first so lazy lists fill in.
    pub scroll: bool,
    /// Keep going with whatever is present when the wait times out.
    pub proceed_on_timeout: bool,
}

impl PageLayout {
    #[must_use]
    pub const fn new(container: &'static str, wait: Duration) -> Self {
        Self {
            container,
            wait,
            scroll: false,
            proceed_on_timeout: false,
        }
    }

    #[must_use]
    pub const fn scrolling(mut self) -> Self {
        self.scroll = true;
        self
    }

    #[must_use]
    pub const fn lenient(mut self) -> Self {
        self.proceed_on_timeout = true;
        self
    }
}

/// Fields read from one container before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListing {
    pub title: String,
    pub href: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub posted_ago: String,
}

/// Reads one listing container.
#[async_trait]
pub trait ItemReader: Send + Sync {
    async fn read_item(&self, item: &dyn DomElement) -> Result<RawListing, ItemError>;
}

/// A board laid out as a single list of containers on a rendered page.
pub trait ListingBoard: ItemReader {
    fn board(&self) -> JobBoard;

    fn layout(&self) -> PageLayout;
}

/// Adapts any [`ListingBoard`] into a [`SiteAdapter`].
pub struct PageAdapter<B> {
    inner: B,
}

impl<B: ListingBoard> PageAdapter<B> {
    #[must_use]
    pub const fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: ListingBoard> SiteAdapter for PageAdapter<B> {
    fn board(&self) -> JobBoard {
        self.inner.board()
    }

    async fn extract(
        &self,
        handle: SourceHandle<'_>,
        source_url: &str,
        ctx: &ExtractContext,
    ) -> Result<Vec<ListingRecord>, SourceError> {
        let board = self.inner.board();
        let page = handle.page(board)?;
        let items = open_listing_page(page, source_url, board, &self.inner.layout(), ctx).await?;
        Ok(collect_listings(board, board.base_url(), &self.inner, &items, ctx).await)
    }
}

/// Navigate to `url` and return the listing containers.
///
/// A selector-wait timeout gives an empty list unless the layout is lenient.
///
/// # Errors
///
/// Returns an error if navigation fails or the DOM cannot be queried.
pub async fn open_listing_page(
    page: &dyn RenderedPage,
    url: &str,
    board: JobBoard,
    layout: &PageLayout,
    ctx: &ExtractContext,
) -> Result<Vec<Box<dyn DomElement>>, SourceError> {
    page.navigate(url, ctx.navigation_timeout).await?;

    if page.wait_for_selector(layout.container, layout.wait).await {
        debug!(board = %board, "Listing containers visible");
    } else {
        warn!(
            board = %board,
            selector = layout.container,
            timeout = ?layout.wait,
            "Timed out waiting for listing containers"
        );
        if !layout.proceed_on_timeout {
            return Ok(Vec::new());
        }
    }

    if layout.scroll {
        page.scroll_to_bottom().await?;
        tokio::time::sleep(ctx.scroll_settle).await;
    }

    let items = page.query_all(layout.container).await?;
    if items.is_empty() {
        warn!(board = %board, "No listing containers found");
    } else {
        info!(board = %board, count = items.len(), "Found listing containers");
    }
    Ok(items)
}

/// Read every container, keeping only recent, well-formed listings.
pub async fn collect_listings(
    board: JobBoard,
    base_url: &str,
    reader: &dyn ItemReader,
    items: &[Box<dyn DomElement>],
    ctx: &ExtractContext,
) -> Vec<ListingRecord> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (index, item) in items.iter().enumerate() {
        let outcome = match reader.read_item(item.as_ref()).await {
            Ok(raw) => finish_listing(raw, board, base_url, ctx),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                debug!(board = %board, index, reason = %e, "Skipping listing");
            }
        }
    }

    info!(
        board = %board,
        kept = records.len(),
        skipped,
        "Finished reading listings"
    );
    records
}

/// Validate raw fields and build the final record.
///
/// # Errors
///
/// Fails when the title or link is missing, the posted time cannot be
/// parsed, or the listing is at or before the recency threshold.
pub fn finish_listing(
    raw: RawListing,
    board: JobBoard,
    base_url: &str,
    ctx: &ExtractContext,
) -> Result<ListingRecord, ItemError> {
    let title = collapse_whitespace(&raw.title);
    if title.is_empty() {
        return Err(ItemError::MissingField("title"));
    }

    let posted_ago_text = raw.posted_ago.trim().to_string();
    let posted_at = posted_time::normalize(&posted_ago_text, ctx.clock.now())
        .ok_or(ItemError::Filtered("unparseable posted time"))?;
    if !ctx.clock.is_recent(posted_at) {
        return Err(ItemError::Filtered("older than recency threshold"));
    }

    let url = resolve_url(base_url, &raw.href).ok_or(ItemError::MissingField("url"))?;

    let company = raw
        .company
        .map(|c| collapse_whitespace(&c))
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());

    let location = raw
        .location
        .map(|l| collapse_whitespace(&l))
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| board.location_sentinel().to_string());

    Ok(ListingRecord {
        title,
        company,
        location,
        posted_ago_text,
        posted_at,
        url,
        source: board,
    })
}

/// Text of the first match, `None` when absent or blank.
pub async fn text_of<N: DomNode + ?Sized>(
    node: &N,
    selector: &str,
) -> Result<Option<String>, SourceError> {
    match node.query_first(selector).await? {
        Some(el) => Ok(non_blank(el.text().await?)),
        None => Ok(None),
    }
}

/// Like [`text_of`], but only when the match is visible.
pub async fn visible_text_of<N: DomNode + ?Sized>(
    node: &N,
    selector: &str,
) -> Result<Option<String>, SourceError> {
    let Some(el) = node.query_first(selector).await? else {
        return Ok(None);
    };
    if !el.visible().await? {
        return Ok(None);
    }
    Ok(non_blank(el.text().await?))
}

/// Attribute of the first match.
pub async fn attr_of<N: DomNode + ?Sized>(
    node: &N,
    selector: &str,
    attribute: &str,
) -> Result<Option<String>, SourceError> {
    match node.query_first(selector).await? {
        Some(el) => Ok(el.attribute(attribute).await?.and_then(non_blank)),
        None => Ok(None),
    }
}

/// First element matching `selector` that contains a match for `marker`.
pub async fn first_containing<N: DomNode + ?Sized>(
    node: &N,
    selector: &str,
    marker: &str,
) -> Result<Option<Box<dyn DomElement>>, SourceError> {
    for candidate in node.query_all(selector).await? {
        if candidate.query_first(marker).await?.is_some() {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Unwrap a mandatory field.
pub fn require(value: Option<String>, field: &'static str) -> Result<String, ItemError> {
    value.ok_or(ItemError::MissingField(field))
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
