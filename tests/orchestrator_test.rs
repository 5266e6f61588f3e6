//! Orchestrator runs over fake browser and HTTP capabilities.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use remote_job_feed::adapters::{AdapterRegistry, ExtractContext, PageAdapter, ADAPTERS};
use remote_job_feed::adapters::weworkremotely::WeWorkRemotely;
use remote_job_feed::aggregate::aggregate;
use remote_job_feed::clock::RunClock;
use remote_job_feed::error::{SessionError, SourceError};
use remote_job_feed::listing::{HandleKind, JobBoard};
use remote_job_feed::orchestrator::Orchestrator;
use remote_job_feed::session::{
    BrowserLauncher, BrowserSession, DomElement, DomNode, HttpFetcher, HttpResponse, RenderedPage,
    StaticBrowser, StaticPage,
};
use remote_job_feed::sources::SourceEntry;

const WWR_URL: &str = "https://weworkremotely.com/remote-jobs/search?term=designer";
const JUSTREMOTE_URL: &str = "https://justremote.co/remote-ui-ux-jobs";
const MISSING_URL: &str = "https://remote4africa.com/jobs/search?q=designer";
const UP2STAFF_URL: &str = "https://up2staff.com/";

const WWR_HTML: &str = r#"
<ul>
  <li class="feature">
    <a href="/remote-jobs/acme-product-designer">
      <span class="company">Acme</span>
      <span class="title">Product Designer</span>
      <span class="date">1h ago</span>
    </a>
  </li>
  <li class="feature">
    <a href="/remote-jobs/beta-ui-designer">
      <span class="title">UI Designer</span>
      <span class="date">9h ago</span>
    </a>
  </li>
</ul>
"#;

const JUSTREMOTE_HTML: &str = r#"
<div class="job-card-wrapper">
  <a class="job-link" href="https://weworkremotely.com/remote-jobs/acme-product-designer">Product Designer</a>
  <div class="company-name">Acme</div>
  <span class="date-text">2 hours ago</span>
</div>
<div class="job-card-wrapper">
  <a class="job-link" href="/ux-lead-gamma">UX Lead</a>
  <span class="date-text">5 hours ago</span>
</div>
"#;

const UP2STAFF_HTML: &str = r#"
<li class="job_listing">
  <h3><a href="https://up2staff.com/job/visual-designer/">Visual Designer</a></h3>
  <span class="date">3 hours ago</span>
</li>
"#;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn ctx() -> ExtractContext {
    ExtractContext::new(RunClock::at(now(), TimeDelta::hours(48)))
}

fn routes() -> Arc<HashMap<String, String>> {
    let mut routes = HashMap::new();
    routes.insert(WWR_URL.to_string(), WWR_HTML.to_string());
    routes.insert(JUSTREMOTE_URL.to_string(), JUSTREMOTE_HTML.to_string());
    Arc::new(routes)
}

#[derive(Default)]
struct Counters {
    launches: AtomicUsize,
    opened: AtomicUsize,
    closed: AtomicUsize,
    shutdowns: AtomicUsize,
}

/// Serves routed static markup and counts lifecycle calls.
struct CountingBrowser {
    routes: Arc<HashMap<String, String>>,
    counters: Arc<Counters>,
}

struct CountingPage {
    inner: StaticPage,
    counters: Arc<Counters>,
}

#[async_trait]
impl DomNode for CountingPage {
    async fn query_all(&self, selector: &str) -> Result<Vec<Box<dyn DomElement>>, SourceError> {
        self.inner.query_all(selector).await
    }
}

#[async_trait]
impl RenderedPage for CountingPage {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), SourceError> {
        self.inner.navigate(url, timeout).await
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> bool {
        self.inner.wait_for_selector(selector, timeout).await
    }

    async fn scroll_to_bottom(&self) -> Result<(), SourceError> {
        self.inner.scroll_to_bottom().await
    }

    async fn close(&self) {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BrowserSession for CountingBrowser {
    async fn open_page(&self) -> Result<Box<dyn RenderedPage>, SourceError> {
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingPage {
            inner: StaticPage::with_routes(Arc::clone(&self.routes)),
            counters: Arc::clone(&self.counters),
        }))
    }

    async fn shutdown(&self) {
        self.counters.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

struct CountingLauncher {
    counters: Arc<Counters>,
}

#[async_trait]
impl BrowserLauncher for CountingLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingBrowser {
            routes: routes(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct FailingLauncher;

#[async_trait]
impl BrowserLauncher for FailingLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        Err(SessionError::Config("no browser available".to_string()))
    }
}

/// Answers every POST with fixed markup.
struct FixedHttp {
    status: u16,
    body: &'static str,
    calls: AtomicUsize,
}

impl FixedHttp {
    fn new(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl HttpFetcher for FixedHttp {
    async fn post_form(
        &self,
        _url: &str,
        _form: &[(&str, &str)],
        _headers: &[(&str, &str)],
        _timeout: Duration,
    ) -> Result<HttpResponse, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HttpResponse {
            status: self.status,
            body: self.body.to_string(),
        })
    }
}

fn mixed_sources() -> Vec<SourceEntry> {
    vec![
        SourceEntry::new(WWR_URL, JobBoard::WeWorkRemotely),
        SourceEntry::new(MISSING_URL, JobBoard::Remote4Africa),
        SourceEntry::new(UP2STAFF_URL, JobBoard::Up2Staff),
        SourceEntry::new(JUSTREMOTE_URL, JobBoard::JustRemote),
    ]
}

#[tokio::test]
async fn test_run_pools_entries_in_order() {
    let counters = Arc::new(Counters::default());
    let launcher = CountingLauncher {
        counters: Arc::clone(&counters),
    };
    let http = FixedHttp::new(200, UP2STAFF_HTML);

    let orchestrator = Orchestrator::new(mixed_sources(), &ADAPTERS, Duration::ZERO);
    let pool = orchestrator.run(&launcher, &http, &ctx()).await.unwrap();

    let titles: Vec<_> = pool.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Product Designer",
            "UI Designer",
            "Visual Designer",
            "Product Designer",
            "UX Lead",
        ]
    );

    assert_eq!(counters.launches.load(Ordering::SeqCst), 1);
    assert_eq!(counters.shutdowns.load(Ordering::SeqCst), 1);
    // Three page entries, including the one whose navigation fails.
    assert_eq!(counters.opened.load(Ordering::SeqCst), 3);
    assert_eq!(counters.closed.load(Ordering::SeqCst), 3);
    assert_eq!(http.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_pool_aggregates_into_feed() {
    let counters = Arc::new(Counters::default());
    let launcher = CountingLauncher { counters };
    let http = FixedHttp::new(200, UP2STAFF_HTML);
    let ctx = ctx();

    let orchestrator = Orchestrator::new(mixed_sources(), &ADAPTERS, Duration::ZERO);
    let pool = orchestrator.run(&launcher, &http, &ctx).await.unwrap();
    let feed = aggregate(pool, &ctx.clock);

    let titles: Vec<_> = feed.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Product Designer", "Visual Designer", "UX Lead", "UI Designer"]
    );
    assert_eq!(feed[0].source, JobBoard::WeWorkRemotely);
}

#[tokio::test]
async fn test_http_failure_is_contained() {
    let counters = Arc::new(Counters::default());
    let launcher = CountingLauncher {
        counters: Arc::clone(&counters),
    };
    let http = FixedHttp::new(500, "");

    let orchestrator = Orchestrator::new(mixed_sources(), &ADAPTERS, Duration::ZERO);
    let pool = orchestrator.run(&launcher, &http, &ctx()).await.unwrap();

    assert_eq!(pool.len(), 4);
    assert!(pool.iter().all(|r| r.source != JobBoard::Up2Staff));
}

#[tokio::test]
async fn test_launch_failure_is_fatal() {
    let http = FixedHttp::new(200, UP2STAFF_HTML);
    let orchestrator = Orchestrator::new(mixed_sources(), &ADAPTERS, Duration::ZERO);

    let result = orchestrator.run(&FailingLauncher, &http, &ctx()).await;
    assert!(matches!(result, Err(SessionError::Config(_))));
    assert_eq!(http.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_http_only_registry_skips_browser() {
    let http = FixedHttp::new(200, UP2STAFF_HTML);
    let sources = vec![SourceEntry::new(UP2STAFF_URL, JobBoard::Up2Staff)];
    assert_eq!(sources[0].handle, HandleKind::Http);

    let orchestrator = Orchestrator::new(sources, &ADAPTERS, Duration::ZERO);
    let pool = orchestrator.run(&FailingLauncher, &http, &ctx()).await.unwrap();
    assert_eq!(pool.len(), 1);
}

#[tokio::test]
async fn test_unregistered_board_is_skipped() {
    let mut registry = AdapterRegistry::new();
    registry.register(Box::new(PageAdapter::new(WeWorkRemotely::new())));

    let counters = Arc::new(Counters::default());
    let launcher = CountingLauncher {
        counters: Arc::clone(&counters),
    };
    let http = FixedHttp::new(200, UP2STAFF_HTML);

    let orchestrator = Orchestrator::new(mixed_sources(), &registry, Duration::ZERO);
    let pool = orchestrator.run(&launcher, &http, &ctx()).await.unwrap();

    assert_eq!(pool.len(), 2);
    assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
    assert_eq!(http.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_registry() {
    let http = FixedHttp::new(200, UP2STAFF_HTML);
    let orchestrator = Orchestrator::new(Vec::new(), &ADAPTERS, Duration::ZERO);
    let pool = orchestrator.run(&FailingLauncher, &http, &ctx()).await.unwrap();
    assert!(pool.is_empty());
}

#[tokio::test]
async fn test_static_browser_launcher() {
    let launcher = StaticBrowser::new(routes().as_ref().clone());
    let http = FixedHttp::new(200, UP2STAFF_HTML);
    let sources = vec![
        SourceEntry::new(JUSTREMOTE_URL, JobBoard::JustRemote),
        SourceEntry::new(MISSING_URL, JobBoard::Remote4Africa),
    ];

    let orchestrator = Orchestrator::new(sources, &ADAPTERS, Duration::from_millis(1));
    let pool = orchestrator.run(&launcher, &http, &ctx()).await.unwrap();
    assert_eq!(pool.len(), 2);
    assert!(pool.iter().all(|r| r.source == JobBoard::JustRemote));
}
