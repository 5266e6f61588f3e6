use std::time::Duration;

use async_trait::async_trait;

use super::listing_page::{
    attr_of, require, text_of, visible_text_of, ItemReader, ListingBoard, PageLayout, RawListing,
};
use crate::error::ItemError;
use crate::listing::JobBoard;
use crate::session::DomElement;

const CONTAINER: &str = r#"div[class*="flex flex-col m-auto ring-1"][style*="background-color"]"#;
const COMPANY: &str = r#"div[class*="sm:-ml-10"] div.flex.flex-wrap.items-center.gap-1.text-sm"#;
const LOCATION: &str = r"div.flex.items-center.gap-1\.5 span.text-sm";

// The posted time is rendered twice, once per breakpoint.
const POSTED_WIDE: &str = r"div.hidden.sm\:block.text-sm";
const POSTED_NARROW: &str = r"div.sm\:hidden.text-sm.text-right";

pub struct RealWorkFromAnywhere;

impl RealWorkFromAnywhere {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for RealWorkFromAnywhere {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingBoard for RealWorkFromAnywhere {
    fn board(&self) -> JobBoard {
        JobBoard::RealWorkFromAnywhere
    }

    fn layout(&self) -> PageLayout {
        PageLayout::new(CONTAINER, Duration::from_secs(30))
    }
}

#[async_trait]
impl ItemReader for RealWorkFromAnywhere {
    async fn read_item(&self, item: &dyn DomElement) -> Result<RawListing, ItemError> {
        let href = require(attr_of(item, r#"a[href*="/jobs/"]"#, "href").await?, "url")?;
        let title = require(text_of(item, "h3").await?, "title")?;
        let company = text_of(item, COMPANY).await?;
        let location = visible_text_of(item, LOCATION).await?;

        let posted_ago = match visible_text_of(item, POSTED_WIDE).await? {
            Some(text) => text,
            None => require(text_of(item, POSTED_NARROW).await?, "posted time")?,
        };

        Ok(RawListing {
            title,
            href,
            company,
            location,
            posted_ago,
        })
    }
}
