//! Up2Staff serves its listings through a WordPress AJAX endpoint rather
//! than a rendered page, so this adapter POSTs the search form and parses
//! the returned fragment as a static document.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{info, warn};
use url::Url;

use super::listing_page::{collect_listings, require, text_of, ItemReader, RawListing};
use super::normalize::resolve_url;
use super::traits::{ExtractContext, SiteAdapter, SourceHandle};
use crate::constants::BROWSER_USER_AGENT;
use crate::error::{ItemError, SourceError};
use crate::listing::{JobBoard, ListingRecord};
use crate::session::{DomElement, DomNode, StaticDocument};

const ENDPOINT: &str = "/admin-ajax.php";

const SEARCH_FORM: [(&str, &str); 5] = [
    ("action", "get_listings"),
    ("key", "ui/ux designer"),
    ("category", "design"),
    ("job_type", "all"),
    ("paged", "1"),
];

const CONTAINERS: &str = "li.job_listing";
const FALLBACK_CONTAINERS: &str = "li, div.job-item, div.job-listing";

/// Account, cart and employer links share the listing markup.
const SKIP_PATHS: [&str; 6] = [
    "/cart",
    "/checkout",
    "/jobs-dashboard",
    "/myaccount",
    "/maltings",
    "/post-a-job",
];

const TIME_SELECTOR: &str = "div.date, span.date, p.date, time.date, \
     div.posted, span.posted, p.posted, time.posted, \
     div.time, span.time, p.time, time.time, \
     div.wp-job-manager-date, span.wp-job-manager-date, p.wp-job-manager-date, time.wp-job-manager-date";
const COMPANY_SELECTOR: &str = "div.company, span.company, p.company, \
     div.employer, span.employer, p.employer, \
     div.job-company, span.job-company, p.job-company";
const LOCATION_SELECTOR: &str = "div.location, span.location, p.location, \
     div.job-location, span.job-location, p.job-location";

const TIME_KEYWORDS: [&str; 5] = ["hour", "day", "week", "minute", "ago"];

static LOOSE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}").unwrap());

pub struct Up2Staff;

impl Up2Staff {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Up2Staff {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the listing fragment out of the endpoint's response body.
///
/// A JSON object carries the fragment in its `html` field; any other JSON
/// means there is nothing to read. A body that is not JSON is the fragment.
fn listing_fragment(body: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("html")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        Err(_) => Some(body.to_string()),
    }
}

/// Reads one listing card, resolving links against the source URL.
struct CardReader<'a> {
    base: &'a str,
}

impl CardReader<'_> {
    /// Account links by path, and any link that resolves to the source page
    /// or the site root.
    fn is_navigation_link(&self, href: &str) -> bool {
        if SKIP_PATHS.iter().any(|path| href.contains(path)) {
            return true;
        }
        let Some(url) = resolve_url(self.base, href) else {
            return false;
        };
        let url = url.trim_end_matches('/');
        url == self.base.trim_end_matches('/')
            || resolve_url(self.base, "/").is_some_and(|root| url == root.trim_end_matches('/'))
    }
}

/// The card's title link: first linked heading, else any link.
async fn title_link(card: &dyn DomElement) -> Result<Option<Box<dyn DomElement>>, SourceError> {
    for heading in ["h3 a[href]", "h4 a[href]", "h5 a[href]"] {
        if let Some(link) = card.query_first(heading).await? {
            return Ok(Some(link));
        }
    }
    card.query_first("a[href]").await
}

/// Posted-time text from a dated element, else the first text that reads
/// like a relative or numeric date.
async fn posted_text(card: &dyn DomElement) -> Result<Option<String>, SourceError> {
    if let Some(tag) = card.query_first(TIME_SELECTOR).await? {
        return Ok(Some(tag.text().await?));
    }
    for candidate in card.query_all("span, div, p").await? {
        let text = candidate.text().await?;
        let lowered = text.to_lowercase();
        if TIME_KEYWORDS.iter().any(|k| lowered.contains(k)) || LOOSE_DATE.is_match(&text) {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

#[async_trait]
impl<'a> ItemReader for CardReader<'a> {
    async fn read_item(&self, item: &dyn DomElement) -> Result<RawListing, ItemError> {
        let link = title_link(item)
            .await?
            .ok_or(ItemError::MissingField("url"))?;
        let href = require(link.attribute("href").await?, "url")?;
        if self.is_navigation_link(&href) {
            return Err(ItemError::Filtered("navigation link"));
        }
        let title = link.text().await?;

        let posted_ago = posted_text(item)
            .await?
            .filter(|t| !t.trim().is_empty())
            .ok_or(ItemError::MissingField("posted time"))?;
        let company = text_of(item, COMPANY_SELECTOR).await?;
        let location = text_of(item, LOCATION_SELECTOR).await?;

        Ok(RawListing {
            title,
            href,
            company,
            location,
            posted_ago,
        })
    }
}

#[async_trait]
impl SiteAdapter for Up2Staff {
    fn board(&self) -> JobBoard {
        JobBoard::Up2Staff
    }

    async fn extract(
        &self,
        handle: SourceHandle<'_>,
        source_url: &str,
        ctx: &ExtractContext,
    ) -> Result<Vec<ListingRecord>, SourceError> {
        let board = self.board();
        let http = handle.http(board)?;

        let endpoint = Url::parse(source_url)
            .and_then(|base| base.join(ENDPOINT))
            .map_err(|source| SourceError::Url {
                url: source_url.to_string(),
                source,
            })?;
        let headers = [
            ("User-Agent", BROWSER_USER_AGENT),
            ("Referer", source_url),
            (
                "Content-Type",
                "application/x-www-form-urlencoded; charset=UTF-8",
            ),
            ("X-Requested-With", "XMLHttpRequest"),
        ];

        let response = http
            .post_form(endpoint.as_str(), &SEARCH_FORM, &headers, ctx.http_timeout)
            .await?;
        if !response.is_success() {
            warn!(board = %board, status = response.status, "Listing endpoint returned an error");
            return Err(SourceError::HttpStatus {
                url: endpoint.to_string(),
                status: response.status,
            });
        }

        let Some(fragment) = listing_fragment(&response.body) else {
            warn!(board = %board, "JSON response has no html field");
            return Ok(Vec::new());
        };

        let document = StaticDocument::new(fragment);
        let mut cards = document.query_all(CONTAINERS).await?;
        if cards.is_empty() {
            cards = document.query_all(FALLBACK_CONTAINERS).await?;
        }
        if cards.is_empty() {
            warn!(board = %board, "No listing cards in response");
            return Ok(Vec::new());
        }
        info!(board = %board, count = cards.len(), "Found listing cards");

        let reader = CardReader { base: source_url };
        Ok(collect_listings(board, source_url, &reader, &cards, ctx).await)
    }
}
