use std::time::Duration;

use async_trait::async_trait;

use super::listing_page::{
    attr_of, require, text_of, ItemReader, ListingBoard, PageLayout, RawListing,
};
use super::normalize::strip_glyphs;
use crate::error::ItemError;
use crate::listing::JobBoard;
use crate::session::DomElement;

const CONTAINER: &str = r#"div[class*="relative flex flex-col justify-start p-4"]"#;
const LOCATION_TAG: &str = "div.flex.text-base";
const WORLDWIDE: &str = "Worldwide";

/// Only listings tagged as open worldwide are kept.
pub struct ProductJobsAnywhere;

impl ProductJobsAnywhere {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for ProductJobsAnywhere {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingBoard for ProductJobsAnywhere {
    fn board(&self) -> JobBoard {
        JobBoard::ProductJobsAnywhere
    }

    fn layout(&self) -> PageLayout {
        PageLayout::new(CONTAINER, Duration::from_secs(30)).lenient()
    }
}

/// Text of the visible location tag mentioning "Worldwide".
async fn worldwide_tag(item: &dyn DomElement) -> Result<Option<String>, ItemError> {
    for tag in item.query_all(LOCATION_TAG).await? {
        let text = tag.text().await?;
        if text.contains(WORLDWIDE) && tag.visible().await? {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

#[async_trait]
impl ItemReader for ProductJobsAnywhere {
    async fn read_item(&self, item: &dyn DomElement) -> Result<RawListing, ItemError> {
        let location = worldwide_tag(item)
            .await?
            .ok_or(ItemError::Filtered("not open worldwide"))?;
        let location = strip_glyphs(&location).trim().to_string();

        let posted_ago = require(text_of(item, "span.text-sm.text-gray-400").await?, "posted time")?;
        let href = require(attr_of(item, "a.absolute.inset-0.z-10", "href").await?, "url")?;
        let title = require(text_of(item, "h3").await?, "title")?;
        let company = text_of(item, "a.flex.items-center span.text-lg").await?;

        Ok(RawListing {
            title,
            href,
            company,
            location: Some(location),
            posted_ago,
        })
    }
}
