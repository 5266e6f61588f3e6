//! Up2Staff adapter against a mock listing endpoint.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use remote_job_feed::adapters::{ExtractContext, SiteAdapter, SourceHandle, ADAPTERS};
use remote_job_feed::clock::RunClock;
use remote_job_feed::error::SourceError;
use remote_job_feed::listing::{JobBoard, ListingRecord, UNKNOWN_COMPANY};
use remote_job_feed::session::{ReqwestFetcher, StaticPage};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn ctx() -> ExtractContext {
    ExtractContext::new(RunClock::at(now(), TimeDelta::hours(48)))
}

fn adapter() -> &'static dyn SiteAdapter {
    ADAPTERS.find(JobBoard::Up2Staff).expect("adapter registered")
}

/// Listing cards as the endpoint renders them, with links rooted at `base`.
fn listing_fragment(base: &str) -> String {
    format!(
        r#"
<ul class="job_listings">
  <li class="job_listing">
    <h3><a href="{base}job/ui-ux-designer-acme/">UI/UX Designer</a></h3>
    <div class="company">Acme</div>
    <div class="location">Europe</div>
    <span class="date">Posted 5 hours ago</span>
  </li>
  <li class="job_listing">
    <h3><a href="{base}cart/">Cart</a></h3>
    <span class="date">1 hour ago</span>
  </li>
  <li class="job_listing">
    <a href="{base}">Up2Staff</a>
    <span class="date">1 hour ago</span>
  </li>
  <li class="job_listing">
    <a href="/">Home</a>
    <span class="date">1 hour ago</span>
  </li>
  <li class="job_listing">
    <h4><a href="/job/product-designer-beta/">Product Designer</a></h4>
    <p>12 hours ago</p>
  </li>
  <li class="job_listing">
    <h3><a href="{base}job/old-listing/">Old Listing</a></h3>
    <span class="date">3 weeks ago</span>
  </li>
</ul>
"#
    )
}

async fn run(server: &MockServer) -> Result<Vec<ListingRecord>, SourceError> {
    let source = format!("{}/", server.uri());
    let http = ReqwestFetcher::new(Duration::from_secs(5)).unwrap();
    adapter()
        .extract(SourceHandle::Http(&http), &source, &ctx())
        .await
}

#[tokio::test]
async fn test_json_wrapped_fragment() {
    let server = MockServer::start().await;
    let base = format!("{}/", server.uri());
    let body = serde_json::json!({ "found_jobs": true, "html": listing_fragment(&base) });

    Mock::given(method("POST"))
        .and(path("/admin-ajax.php"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(body_string_contains("action=get_listings"))
        .and(body_string_contains("category=design"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let records = run(&server).await.unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].title, "UI/UX Designer");
    assert_eq!(records[0].company, "Acme");
    assert_eq!(records[0].location, "Europe");
    assert_eq!(records[0].url, format!("{base}job/ui-ux-designer-acme/"));
    assert_eq!(records[0].posted_at, now() - TimeDelta::hours(5));
    assert_eq!(records[0].source, JobBoard::Up2Staff);

    assert_eq!(records[1].title, "Product Designer");
    assert_eq!(records[1].company, UNKNOWN_COMPANY);
    assert_eq!(records[1].location, "Remote/Global");
    assert_eq!(records[1].posted_ago_text, "12 hours ago");
    assert_eq!(records[1].url, format!("{base}job/product-designer-beta/"));
}

#[tokio::test]
async fn test_raw_html_body() {
    let server = MockServer::start().await;
    let base = format!("{}/", server.uri());

    Mock::given(method("POST"))
        .and(path("/admin-ajax.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_fragment(&base)))
        .mount(&server)
        .await;

    let records = run(&server).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_home_links_are_not_listings() {
    let server = MockServer::start().await;
    let body = r#"
        <li class="job_listing"><a href="/">Up2Staff</a><span class="date">1 hour ago</span></li>
        <li class="job_listing"><a href="">Blank</a><span class="date">1 hour ago</span></li>
    "#;

    Mock::given(method("POST"))
        .and(path("/admin-ajax.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    assert!(run(&server).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_endpoint_is_at_site_root() {
    let server = MockServer::start().await;
    let base = format!("{}/", server.uri());

    Mock::given(method("POST"))
        .and(path("/admin-ajax.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_fragment(&base)))
        .expect(1)
        .mount(&server)
        .await;

    let source = format!("{}/jobs/designers/", server.uri());
    let http = ReqwestFetcher::new(Duration::from_secs(5)).unwrap();
    let records = adapter()
        .extract(SourceHandle::Http(&http), &source, &ctx())
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_fallback_containers() {
    let server = MockServer::start().await;
    let body = r#"
        <div class="job-item">
          <h5><a href="https://up2staff.com/job/visual-designer/">Visual Designer</a></h5>
          <span class="employer">Gamma</span>
          <time class="posted">3 days ago</time>
        </div>
        <div class="job-item">
          <a href="https://up2staff.com/job/motion-designer/">Motion Designer</a>
          <span class="job-location">LATAM</span>
          <div>Posted 01/09/2025</div>
        </div>
    "#;

    Mock::given(method("POST"))
        .and(path("/admin-ajax.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let records = run(&server).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Motion Designer");
    assert_eq!(records[0].location, "LATAM");
    assert_eq!(
        records[0].posted_at,
        NaiveDate::from_ymd_opt(2025, 1, 9)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );
}

#[tokio::test]
async fn test_json_without_html_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin-ajax.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "found_jobs": false })),
        )
        .mount(&server)
        .await;

    assert!(run(&server).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_error_status_is_source_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin-ajax.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = run(&server).await.unwrap_err();
    assert!(matches!(err, SourceError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_rejects_page_handle() {
    let page = StaticPage::new("<html></html>");
    let err = adapter()
        .extract(SourceHandle::Page(&page), "https://up2staff.com/", &ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::WrongHandle { .. }));
}
