use std::time::Duration;

use async_trait::async_trait;

use super::listing_page::{
    attr_of, first_containing, require, text_of, ItemReader, ListingBoard, PageLayout, RawListing,
};
use crate::error::{ItemError, SourceError};
use crate::listing::JobBoard;
use crate::session::DomElement;

const LAYOUT: PageLayout =
    PageLayout::new(r#"div[data-id="job-card"]"#, Duration::from_secs(60)).scrolling();
const TITLE_LINK: &str = "h2 a.card-alias-after-overlay";
const COMPANY: &str = r#"a[data-id="company-title"] span"#;
const DETAIL_ROW: &str = "div.d-flex.align-items-start.gap-sm";

/// BuiltIn rewrites listing URLs between renders, so its records dedupe on
/// title and posted text instead of URL.
pub struct BuiltIn;

impl BuiltIn {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for BuiltIn {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingBoard for BuiltIn {
    fn board(&self) -> JobBoard {
        JobBoard::BuiltIn
    }

    fn layout(&self) -> PageLayout {
        LAYOUT
    }
}

/// Location from the pin row, with the work-arrangement row appended.
async fn location(item: &dyn DomElement) -> Result<Option<String>, SourceError> {
    let Some(row) = first_containing(item, DETAIL_ROW, "i.fa-location-dot").await? else {
        return Ok(None);
    };
    let Some(last) = row.query_all("span").await?.pop() else {
        return Ok(None);
    };
    let location = last.text().await?;
    if location.trim().is_empty() {
        return Ok(None);
    }

    let mut status = None;
    if let Some(row) = first_containing(item, DETAIL_ROW, "i.fa-house-building").await? {
        if row.visible().await? {
            status = text_of(row.as_ref(), "span").await?;
        }
    }

    Ok(Some(match status {
        Some(status) => format!("{location} - {status}"),
        None => location,
    }))
}

#[async_trait]
impl ItemReader for BuiltIn {
    async fn read_item(&self, item: &dyn DomElement) -> Result<RawListing, ItemError> {
        let clock = first_containing(item, "span", "i.fa-clock")
            .await?
            .ok_or(ItemError::MissingField("posted time"))?;
        let posted_ago = clock.text().await?;
        if posted_ago.trim().is_empty() {
            return Err(ItemError::MissingField("posted time"));
        }

        let title = require(text_of(item, TITLE_LINK).await?, "title")?;
        let href = require(attr_of(item, TITLE_LINK, "href").await?, "url")?;
        let company = text_of(item, COMPANY).await?;
        let location = location(item).await?;

        Ok(RawListing {
            title,
            href,
            company,
            location,
            posted_ago,
        })
    }
}
