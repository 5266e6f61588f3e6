//! Headless Chromium sessions via chromiumoxide.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{BrowserLauncher, BrowserSession, DomElement, DomNode, RenderedPage};
use crate::constants::BROWSER_USER_AGENT;
use crate::error::{SessionError, SourceError};

/// Default viewport width in pixels.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

/// Default viewport height in pixels.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 960;

/// Default CDP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// How often `wait_for_selector` re-checks the DOM.
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight)";

const IS_VISIBLE_JS: &str = "function() { \
    if (!(this.offsetWidth || this.offsetHeight || this.getClientRects().length)) { return false; } \
    return window.getComputedStyle(this).visibility !== 'hidden'; }";

/// Browser launch configuration.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    /// Upper bound on any single CDP request.
    pub request_timeout: Duration,
    /// Path to Chrome/Chromium executable (None for auto-detection).
    pub chrome_path: Option<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            chrome_path: None,
        }
    }
}

/// Launches a real headless Chromium.
#[derive(Debug, Clone, Default)]
pub struct ChromeLauncher {
    options: BrowserOptions,
}

impl ChromeLauncher {
    #[must_use]
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        let session = ChromeSession::launch(&self.options).await?;
        Ok(Box::new(session))
    }
}

/// One shared headless browser for the whole run.
pub struct ChromeSession {
    browser: Mutex<Option<Browser>>,
    handler_task: JoinHandle<()>,
}

impl ChromeSession {
    /// Start the browser process and its CDP event loop.
    pub async fn launch(options: &BrowserOptions) -> Result<Self, SessionError> {
        info!("Launching headless browser");

        let mut config_builder = BrowserConfig::builder()
            .window_size(options.viewport_width, options.viewport_height)
            .viewport(None)
            .request_timeout(options.request_timeout)
            .no_sandbox()
            .disable_default_args()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-extensions")
            .arg("--disable-sync")
            .arg("--mute-audio")
            .arg(format!("--user-agent={BROWSER_USER_AGENT}"));

        if let Some(ref chrome_path) = options.chrome_path {
            config_builder = config_builder.chrome_executable(chrome_path);
        }

        let browser_config = config_builder.build().map_err(SessionError::Config)?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {e}");
                }
            }
        });

        info!("Headless browser ready");

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler_task,
        })
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>, SourceError> {
        let guard = self.browser.lock().await;
        let browser = guard.as_ref().ok_or(SourceError::SessionClosed)?;
        let page = browser.new_page("about:blank").await?;
        Ok(Box::new(ChromePage { page }))
    }

    async fn shutdown(&self) {
        let mut guard = self.browser.lock().await;
        if let Some(mut browser) = guard.take() {
            if let Err(e) = browser.close().await {
                error!("Failed to close browser: {e}");
            } else {
                let _ = browser.wait().await;
                info!("Browser shutdown complete");
            }
        }
        self.handler_task.abort();
    }
}

/// A browser tab.
pub struct ChromePage {
    page: Page,
}

#[async_trait]
impl DomNode for ChromePage {
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn DomElement>>, SourceError> {
        let elements = self.page.find_elements(selector).await?;
        Ok(wrap_elements(elements))
    }
}

#[async_trait]
impl RenderedPage for ChromePage {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), SourceError> {
        debug!(url = %url, "Navigating");
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Err(_) => Err(SourceError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            }),
            Ok(Err(e)) => Err(SourceError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Ok(Ok(_)) => Ok(()),
        }
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            match self.page.find_elements(selector).await {
                Ok(found) if !found.is_empty() => return true,
                Ok(_) => {}
                Err(e) => debug!(selector = %selector, "Selector query failed: {e}"),
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn scroll_to_bottom(&self) -> Result<(), SourceError> {
        self.page.evaluate(SCROLL_TO_BOTTOM_JS).await?;
        Ok(())
    }

    async fn close(&self) {
        if let Err(e) = self.page.clone().close().await {
            warn!("Failed to close page: {e}");
        }
    }
}

struct ChromeElement {
    element: Element,
}

fn wrap_elements(elements: Vec<Element>) -> Vec<Box<dyn DomElement>> {
    elements
        .into_iter()
        .map(|element| Box::new(ChromeElement { element }) as Box<dyn DomElement>)
        .collect()
}

#[async_trait]
impl DomNode for ChromeElement {
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn DomElement>>, SourceError> {
        let elements = self.element.find_elements(selector).await?;
        Ok(wrap_elements(elements))
    }
}

#[async_trait]
impl DomElement for ChromeElement {
    async fn text(&self) -> Result<String, SourceError> {
        let text = self.element.inner_text().await?;
        Ok(text.map(|t| t.trim().to_string()).unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, SourceError> {
        Ok(self.element.attribute(name).await?)
    }

    async fn visible(&self) -> Result<bool, SourceError> {
        let returns = self.element.call_js_fn(IS_VISIBLE_JS, false).await?;
        Ok(returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }
}
