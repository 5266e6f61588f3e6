//! Capabilities adapters read job boards through.
//!
//! A rendered tab and a parsed static document expose the same element
//! queries, so board logic is written once against [`DomNode`] and
//! [`DomElement`] regardless of where the markup came from.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{SessionError, SourceError};

pub mod browser;
pub mod http;
pub mod static_html;

pub use browser::{BrowserOptions, ChromeLauncher};
pub use http::{HttpFetcher, HttpResponse, ReqwestFetcher};
pub use static_html::{StaticBrowser, StaticDocument, StaticElement, StaticPage};

/// Anything elements can be queried from.
#[async_trait]
pub trait DomNode: Send + Sync {
    /// All descendants matching a CSS selector, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn DomElement>>, SourceError>;

    /// The first descendant matching a CSS selector.
    async fn query_first(&self, selector: &str) -> Result<Option<Box<dyn DomElement>>, SourceError> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }
}

/// One element of a document.
#[async_trait]
pub trait DomElement: DomNode {
    /// Rendered text content, trimmed.
    async fn text(&self) -> Result<String, SourceError>;

    async fn attribute(&self, name: &str) -> Result<Option<String>, SourceError>;

    async fn visible(&self) -> Result<bool, SourceError>;
}

/// A browser tab.
#[async_trait]
pub trait RenderedPage: DomNode {
    /// Load `url` and wait for the DOM to be ready.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), SourceError>;

    /// Poll until `selector` matches something. Returns `false` on timeout.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> bool;

    /// Scroll to the bottom to trigger lazy-loaded lists.
    async fn scroll_to_bottom(&self) -> Result<(), SourceError>;

    /// Close the tab. Errors are logged, not returned.
    async fn close(&self);
}

/// A running browser that hands out tabs.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>, SourceError>;

    /// Close the browser. Called once after the last entry.
    async fn shutdown(&self);
}

/// Starts a [`BrowserSession`].
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, SessionError>;
}
