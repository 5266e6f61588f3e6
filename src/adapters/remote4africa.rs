use std::time::Duration;

use async_trait::async_trait;

use super::listing_page::{require, text_of, ItemReader, ListingBoard, PageLayout, RawListing};
use crate::error::ItemError;
use crate::listing::JobBoard;
use crate::session::DomElement;

// MUI emits hashed class names; these are the observed hashes.
const CONTAINER: &str = r#"div[class*="MuiStack-root"][class*="mui-nguhj9"]"#;
const COMPANY: &str = r#"div[class*="mui-1tik93c"] p[class*="MuiTypography-body1"][class*="MuiTypography-gutterBottom"]"#;
const POSTED: &str = r#"div[class*="mui-15fepi"] p[class*="MuiTypography-body2"]"#;

/// Africa-focused board; location is always the board sentinel.
pub struct Remote4Africa;

impl Remote4Africa {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Remote4Africa {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingBoard for Remote4Africa {
    fn board(&self) -> JobBoard {
        JobBoard::Remote4Africa
    }

    fn layout(&self) -> PageLayout {
        PageLayout::new(CONTAINER, Duration::from_secs(30))
    }
}

#[async_trait]
impl ItemReader for Remote4Africa {
    async fn read_item(&self, item: &dyn DomElement) -> Result<RawListing, ItemError> {
        let link = item
            .query_first(r#"a[class*="MuiLink-root"]"#)
            .await?
            .ok_or(ItemError::MissingField("url"))?;
        let href = require(link.attribute("href").await?, "url")?;
        let title = link.text().await?;
        let company = text_of(item, COMPANY).await?;
        let posted_ago = require(text_of(item, POSTED).await?, "posted time")?;

        Ok(RawListing {
            title,
            href,
            company,
            location: None,
            posted_ago,
        })
    }
}
