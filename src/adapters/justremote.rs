use std::time::Duration;

use async_trait::async_trait;

use super::listing_page::{
    require, text_of, visible_text_of, ItemReader, ListingBoard, PageLayout, RawListing,
};
use crate::error::ItemError;
use crate::listing::JobBoard;
use crate::session::DomElement;

pub struct JustRemote;

impl JustRemote {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for JustRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingBoard for JustRemote {
    fn board(&self) -> JobBoard {
        JobBoard::JustRemote
    }

    fn layout(&self) -> PageLayout {
        PageLayout::new(r#"div[class*="job-card-wrapper"]"#, Duration::from_secs(60))
    }
}

#[async_trait]
impl ItemReader for JustRemote {
    async fn read_item(&self, item: &dyn DomElement) -> Result<RawListing, ItemError> {
        let link = item
            .query_first(r#"a[class*="job-link"]"#)
            .await?
            .ok_or(ItemError::MissingField("url"))?;
        let href = require(link.attribute("href").await?, "url")?;
        let title = link.text().await?;

        let company = text_of(item, r#"div[class*="company-name"]"#).await?;
        let location = visible_text_of(item, r#"span[class*="location-text"]"#).await?;
        let posted_ago = require(
            text_of(item, r#"span[class*="date-text"]"#).await?,
            "posted time",
        )?;

        Ok(RawListing {
            title,
            href,
            company,
            location,
            posted_ago,
        })
    }
}
