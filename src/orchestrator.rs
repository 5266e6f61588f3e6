//! Sequential run over the source registry.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::adapters::{AdapterRegistry, ExtractContext, SiteAdapter, SourceHandle};
use crate::error::{SessionError, SourceError};
use crate::listing::{HandleKind, ListingRecord};
use crate::session::{BrowserLauncher, BrowserSession, HttpFetcher};
use crate::sources::SourceEntry;

/// Visits every registry entry in order and pools what the adapters return.
pub struct Orchestrator<'a> {
    sources: Vec<SourceEntry>,
    adapters: &'a AdapterRegistry,
    politeness_delay: Duration,
}

impl<'a> Orchestrator<'a> {
    #[must_use]
    pub fn new(
        sources: Vec<SourceEntry>,
        adapters: &'a AdapterRegistry,
        politeness_delay: Duration,
    ) -> Self {
        Self {
            sources,
            adapters,
            politeness_delay,
        }
    }

    /// Run every entry and return the raw pool, in registry order.
    ///
    /// One browser is launched up front when any entry needs a rendered page
    /// and shut down after the last entry. A failing entry contributes
    /// nothing and the run moves on.
    ///
    /// # Errors
    ///
    /// Returns an error only if the browser cannot be launched.
    pub async fn run(
        &self,
        launcher: &dyn BrowserLauncher,
        http: &dyn HttpFetcher,
        ctx: &ExtractContext,
    ) -> Result<Vec<ListingRecord>, SessionError> {
        let needs_browser = self.sources.iter().any(|s| s.handle == HandleKind::Page);
        let browser = if needs_browser {
            match launcher.launch().await {
                Ok(browser) => Some(browser),
                Err(e) => {
                    error!("Failed to initialize browser: {e}");
                    return Err(e);
                }
            }
        } else {
            None
        };

        info!(
            sources = self.sources.len(),
            threshold = %ctx.clock.threshold(),
            "Starting collection run"
        );

        let mut pool = Vec::new();
        for (index, entry) in self.sources.iter().enumerate() {
            let Some(adapter) = self.adapters.find(entry.board) else {
                warn!(board = %entry.board, url = %entry.url, "No adapter registered, skipping");
                continue;
            };

            info!(board = %entry.board, url = %entry.url, "Processing source");
            match self
                .run_entry(entry, adapter, browser.as_deref(), http, ctx)
                .await
            {
                Ok(records) => {
                    info!(board = %entry.board, count = records.len(), "Source finished");
                    pool.extend(records);
                }
                Err(e) => {
                    warn!(board = %entry.board, url = %entry.url, "Source unavailable: {e}");
                }
            }

            if index + 1 < self.sources.len() && !self.politeness_delay.is_zero() {
                tokio::time::sleep(self.politeness_delay).await;
            }
        }

        if let Some(browser) = browser {
            browser.shutdown().await;
        }

        info!(raw = pool.len(), "Collection run finished");
        Ok(pool)
    }

    async fn run_entry(
        &self,
        entry: &SourceEntry,
        adapter: &dyn SiteAdapter,
        browser: Option<&dyn BrowserSession>,
        http: &dyn HttpFetcher,
        ctx: &ExtractContext,
    ) -> Result<Vec<ListingRecord>, SourceError> {
        match entry.handle {
            HandleKind::Http => {
                adapter
                    .extract(SourceHandle::Http(http), &entry.url, ctx)
                    .await
            }
            HandleKind::Page => {
                let browser = browser.ok_or(SourceError::SessionClosed)?;
                let page = browser.open_page().await?;
                let result = adapter
                    .extract(SourceHandle::Page(page.as_ref()), &entry.url, ctx)
                    .await;
                page.close().await;
                result
            }
        }
    }
}
