//! RemoteRocketship ships its listing markup in more than one shape.
//!
//! Each [`SelectorSet`] describes one shape. The page is loaded once and the
//! sets are tried in order; the first set whose container selector matches
//! anything is committed to, even if none of its items survive validation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::listing_page::{
    attr_of, collect_listings, require, text_of, visible_text_of, ItemReader, RawListing,
};
use super::normalize::strip_location_pills;
use super::traits::{ExtractContext, SiteAdapter, SourceHandle};
use crate::error::{ItemError, SourceError};
use crate::listing::{JobBoard, ListingRecord};
use crate::session::DomElement;

const SET_WAIT: Duration = Duration::from_secs(5);
const TITLE_LINK: &str = "h3 a";
const COMPANY: &str = "h4 a";
const POSTED: &str = "p.text-sm.font-semibold.text-secondary";

/// How a selector set finds the location text inside a container.
#[derive(Debug, Clone, Copy)]
enum LocationRule {
    /// First visible, non-empty match.
    FirstNonEmpty(&'static str),
    /// First match, if visible.
    FirstVisible(&'static str),
}

/// One known shape of the listing markup.
#[derive(Debug, Clone, Copy)]
pub struct SelectorSet {
    pub version: &'static str,
    pub container: &'static str,
    location: LocationRule,
}

pub const SELECTOR_SETS: [SelectorSet; 2] = [
    SelectorSet {
        version: "v1",
        container: "div.relative.cursor-pointer div.flex.flex-col",
        location: LocationRule::FirstNonEmpty("div.py-2.px-2.my-1 p"),
    },
    SelectorSet {
        version: "v2",
        container: "div.relative.cursor-pointer",
        location: LocationRule::FirstVisible(
            "div.flex.flex-row.flex-wrap.items-center.-ml-2 div.rounded-3xl p",
        ),
    },
];

impl SelectorSet {
    async fn location(&self, item: &dyn DomElement) -> Result<Option<String>, SourceError> {
        let raw = match self.location {
            LocationRule::FirstNonEmpty(selector) => {
                let mut found = None;
                for candidate in item.query_all(selector).await? {
                    if !candidate.visible().await? {
                        continue;
                    }
                    let text = candidate.text().await?;
                    if !text.trim().is_empty() {
                        found = Some(text);
                        break;
                    }
                }
                found
            }
            LocationRule::FirstVisible(selector) => visible_text_of(item, selector).await?,
        };
        Ok(raw
            .map(|text| strip_location_pills(&text))
            .filter(|text| !text.is_empty()))
    }
}

#[async_trait]
impl ItemReader for SelectorSet {
    async fn read_item(&self, item: &dyn DomElement) -> Result<RawListing, ItemError> {
        let title = require(text_of(item, TITLE_LINK).await?, "title")?;
        let href = require(attr_of(item, TITLE_LINK, "href").await?, "url")?;
        let company = visible_text_of(item, COMPANY).await?;
        let posted_ago = require(visible_text_of(item, POSTED).await?, "posted time")?;
        let location = self.location(item).await?;

        Ok(RawListing {
            title,
            href,
            company,
            location,
            posted_ago,
        })
    }
}

pub struct RemoteRocketship;

impl RemoteRocketship {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for RemoteRocketship {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SiteAdapter for RemoteRocketship {
    fn board(&self) -> JobBoard {
        JobBoard::RemoteRocketship
    }

    async fn extract(
        &self,
        handle: SourceHandle<'_>,
        source_url: &str,
        ctx: &ExtractContext,
    ) -> Result<Vec<ListingRecord>, SourceError> {
        let board = self.board();
        let page = handle.page(board)?;
        page.navigate(source_url, ctx.navigation_timeout).await?;

        for set in &SELECTOR_SETS {
            if !page.wait_for_selector(set.container, SET_WAIT).await {
                info!(board = %board, version = set.version, "Selector set did not match");
                continue;
            }
            let items = page.query_all(set.container).await?;
            if items.is_empty() {
                continue;
            }
            info!(
                board = %board,
                version = set.version,
                count = items.len(),
                "Committed to selector set"
            );
            return Ok(collect_listings(board, board.base_url(), set, &items, ctx).await);
        }

        warn!(board = %board, url = source_url, "No selector set matched");
        Ok(Vec::new())
    }
}
