use std::time::Duration;

use async_trait::async_trait;

use super::listing_page::{
    attr_of, require, text_of, ItemReader, ListingBoard, PageLayout, RawListing,
};
use crate::error::ItemError;
use crate::listing::JobBoard;
use crate::session::DomElement;

const LAYOUT: PageLayout = PageLayout::new("li.job-list-item", Duration::from_secs(30)).scrolling();

pub struct Dribbble;

impl Dribbble {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Dribbble {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingBoard for Dribbble {
    fn board(&self) -> JobBoard {
        JobBoard::Dribbble
    }

    fn layout(&self) -> PageLayout {
        LAYOUT
    }
}

#[async_trait]
impl ItemReader for Dribbble {
    async fn read_item(&self, item: &dyn DomElement) -> Result<RawListing, ItemError> {
        let posted_ago = require(text_of(item, "div.posted-on").await?, "posted time")?;
        let href = require(attr_of(item, "a.job-link", "href").await?, "url")?;

        let details = item
            .query_first("div.job-details-container")
            .await?
            .ok_or(ItemError::MissingField("details"))?;
        let title = require(
            text_of(details.as_ref(), "h4.job-board-job-title").await?,
            "title",
        )?;
        let company = text_of(details.as_ref(), "span.job-board-job-company").await?;
        let location = text_of(details.as_ref(), "div.location-container").await?;

        Ok(RawListing {
            title,
            href,
            company,
            location,
            posted_ago,
        })
    }
}
