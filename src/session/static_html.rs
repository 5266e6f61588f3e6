//! Already-fetched markup exposed through the same DOM traits as a live tab.
//!
//! Elements are kept as their outer HTML and re-parsed on demand, so the
//! handles are plain owned strings and can cross await points freely.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use super::{BrowserLauncher, BrowserSession, DomElement, DomNode, RenderedPage};
use crate::error::{SessionError, SourceError};
use crate::listing::collapse_whitespace;

fn parse_selector(selector: &str) -> Result<Selector, SourceError> {
    Selector::parse(selector).map_err(|e| SourceError::Selector {
        selector: selector.to_string(),
        message: format!("{e:?}"),
    })
}

fn into_handles(fragments: Vec<String>) -> Vec<Box<dyn DomElement>> {
    fragments
        .into_iter()
        .map(|html| Box::new(StaticElement { html }) as Box<dyn DomElement>)
        .collect()
}

/// A parsed HTML document or fragment.
#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    html: String,
}

impl StaticDocument {
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    fn select(&self, selector: &str) -> Result<Vec<String>, SourceError> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.html);
        Ok(document.select(&selector).map(|el| el.html()).collect())
    }
}

#[async_trait]
impl DomNode for StaticDocument {
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn DomElement>>, SourceError> {
        Ok(into_handles(self.select(selector)?))
    }
}

/// One element of a [`StaticDocument`].
#[derive(Debug, Clone)]
pub struct StaticElement {
    html: String,
}

impl StaticElement {
    /// Run `f` against this element re-parsed as a fragment.
    fn with_element<T>(&self, f: impl FnOnce(ElementRef<'_>) -> T) -> Option<T> {
        let fragment = Html::parse_fragment(&self.html);
        let element = fragment.root_element().child_elements().next()?;
        Some(f(element))
    }

    fn select(&self, selector: &str) -> Result<Vec<String>, SourceError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .with_element(|el| el.select(&selector).map(|e| e.html()).collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl DomNode for StaticElement {
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn DomElement>>, SourceError> {
        Ok(into_handles(self.select(selector)?))
    }
}

#[async_trait]
impl DomElement for StaticElement {
    async fn text(&self) -> Result<String, SourceError> {
        Ok(self
            .with_element(|el| collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, SourceError> {
        Ok(self
            .with_element(|el| el.value().attr(name).map(str::to_string))
            .flatten())
    }

    async fn visible(&self) -> Result<bool, SourceError> {
        Ok(self
            .with_element(|el| {
                let attrs = el.value();
                let style = attrs
                    .attr("style")
                    .unwrap_or("")
                    .replace(' ', "")
                    .to_lowercase();
                attrs.attr("hidden").is_none()
                    && !style.contains("display:none")
                    && !style.contains("visibility:hidden")
            })
            .unwrap_or(false))
    }
}

/// A tab over fixed markup. With routes, navigation picks the markup by URL.
#[derive(Debug, Default)]
pub struct StaticPage {
    routes: Option<Arc<HashMap<String, String>>>,
    current: RwLock<StaticDocument>,
}

impl StaticPage {
    /// A page that shows `html` whatever it is navigated to.
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            routes: None,
            current: RwLock::new(StaticDocument::new(html)),
        }
    }

    /// A page that serves markup per URL and fails navigation elsewhere.
    #[must_use]
    pub fn with_routes(routes: Arc<HashMap<String, String>>) -> Self {
        Self {
            routes: Some(routes),
            current: RwLock::new(StaticDocument::default()),
        }
    }

    fn document(&self) -> StaticDocument {
        self.current
            .read()
            .map(|doc| doc.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DomNode for StaticPage {
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn DomElement>>, SourceError> {
        Ok(into_handles(self.document().select(selector)?))
    }
}

#[async_trait]
impl RenderedPage for StaticPage {
    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<(), SourceError> {
        let Some(routes) = &self.routes else {
            return Ok(());
        };
        let html = routes.get(url).ok_or_else(|| SourceError::Navigation {
            url: url.to_string(),
            message: "no such page".to_string(),
        })?;
        if let Ok(mut current) = self.current.write() {
            *current = StaticDocument::new(html.clone());
        }
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> bool {
        self.document()
            .select(selector)
            .is_ok_and(|found| !found.is_empty())
    }

    async fn scroll_to_bottom(&self) -> Result<(), SourceError> {
        Ok(())
    }

    async fn close(&self) {}
}

/// A browser whose tabs serve pre-rendered markup keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct StaticBrowser {
    routes: Arc<HashMap<String, String>>,
}

impl StaticBrowser {
    #[must_use]
    pub fn new(routes: HashMap<String, String>) -> Self {
        Self {
            routes: Arc::new(routes),
        }
    }
}

#[async_trait]
impl BrowserSession for StaticBrowser {
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>, SourceError> {
        Ok(Box::new(StaticPage::with_routes(Arc::clone(&self.routes))))
    }

    async fn shutdown(&self) {}
}

#[async_trait]
impl BrowserLauncher for StaticBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        Ok(Box::new(self.clone()))
    }
}
