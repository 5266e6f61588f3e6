use std::time::Duration;

use async_trait::async_trait;

use super::listing_page::{
    attr_of, require, text_of, ItemReader, ListingBoard, PageLayout, RawListing,
};
use crate::error::ItemError;
use crate::listing::JobBoard;
use crate::session::DomElement;

/// Listings carry no location; every record gets the sentinel.
pub struct WeWorkRemotely;

impl WeWorkRemotely {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for WeWorkRemotely {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingBoard for WeWorkRemotely {
    fn board(&self) -> JobBoard {
        JobBoard::WeWorkRemotely
    }

    fn layout(&self) -> PageLayout {
        PageLayout::new("li.feature", Duration::from_secs(30))
    }
}

#[async_trait]
impl ItemReader for WeWorkRemotely {
    async fn read_item(&self, item: &dyn DomElement) -> Result<RawListing, ItemError> {
        let href = require(attr_of(item, r#"a[href*="/remote-jobs/"]"#, "href").await?, "url")?;
        let title = require(text_of(item, "span.title").await?, "title")?;
        let company = text_of(item, "span.company").await?;
        let posted_ago = require(text_of(item, "span.date").await?, "posted time")?;

        Ok(RawListing {
            title,
            href,
            company,
            location: None,
            posted_ago,
        })
    }
}
