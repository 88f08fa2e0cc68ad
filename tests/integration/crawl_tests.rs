//! Integration tests for the crawler
//!
//! Most tests drive the controller with a scripted render engine so that
//! link graphs, failures and timing are fully controlled. The HTTP render
//! engine is exercised end-to-end against wiremock servers.

use async_trait::async_trait;
use sherlock_crawler::config::{Config, CrawlConfig, OutputFormat};
use sherlock_crawler::crawler::{
    run_crawl, CrawlReport, Crawler, Frontier, FrontierItem, HttpRenderEngine, RenderEngine,
    RenderError, RenderResult, RenderSession, RenderedPage,
};
use sherlock_crawler::output::{
    load_statistics, CsvSink, MatchRecord, MemorySink, OutputError, OutputResult, OutputSink,
    RunStatus, ScrapeRecord, RESULT_CSV, RESULT_TXT, SCRAPED_URLS_CSV, SCRAPED_URLS_TXT,
};
use sherlock_crawler::storage::SqliteStorage;
use sherlock_crawler::{CrawlError, CrawlPhase};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// What the scripted engine does for a URL
#[derive(Clone)]
enum Script {
    Html(String),
    Fail,
    Hang,
    Lost,
    CancelThenHtml(CancellationToken, String),
}

/// Render engine serving scripted responses; unknown URLs fail
#[derive(Default)]
struct ScriptedEngine {
    pages: HashMap<String, Script>,
    rendered: Arc<Mutex<Vec<String>>>,
    unavailable: bool,
}

impl ScriptedEngine {
    fn new() -> Self {
        Self::default()
    }

    fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), Script::Html(html.into()));
        self
    }

    fn script(mut self, url: &str, script: Script) -> Self {
        self.pages.insert(url.to_string(), script);
        self
    }

    fn rendered(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.rendered)
    }
}

struct ScriptedSession {
    pages: HashMap<String, Script>,
    rendered: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl RenderEngine for ScriptedEngine {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn open_session(&self) -> RenderResult<Box<dyn RenderSession>> {
        if self.unavailable {
            return Err(RenderError::Unavailable("connection refused".to_string()));
        }
        Ok(Box::new(ScriptedSession {
            pages: self.pages.clone(),
            rendered: Arc::clone(&self.rendered),
        }))
    }
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn render(&mut self, url: &Url, timeout: Duration) -> RenderResult<RenderedPage> {
        self.rendered.lock().unwrap().push(url.to_string());

        let html = match self.pages.get(url.as_str()) {
            Some(Script::Html(html)) => html.clone(),
            Some(Script::CancelThenHtml(cancel, html)) => {
                cancel.cancel();
                // Give other workers a chance to observe the cancellation
                tokio::time::sleep(Duration::from_millis(20)).await;
                html.clone()
            }
            Some(Script::Fail) => return Err(RenderError::Timeout(timeout)),
            Some(Script::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                return Err(RenderError::Timeout(timeout));
            }
            Some(Script::Lost) => return Err(RenderError::Unavailable("browser gone".to_string())),
            None => return Err(RenderError::Transport(format!("no route to {}", url))),
        };

        Ok(RenderedPage {
            final_url: url.clone(),
            html,
        })
    }
}

/// Output sink whose writes always fail
struct BrokenSink;

impl OutputSink for BrokenSink {
    fn record_scrape(&self, _record: &ScrapeRecord) -> OutputResult<()> {
        Err(OutputError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }

    fn record_matches(&self, _records: &[MatchRecord]) -> OutputResult<()> {
        Err(OutputError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }

    fn finish(&self, _status: RunStatus) -> OutputResult<()> {
        Ok(())
    }
}

fn links(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}

fn crawl_config(start: &str, query: &str) -> CrawlConfig {
    CrawlConfig::new(Url::parse(start).unwrap(), query)
}

async fn crawl(config: CrawlConfig, engine: ScriptedEngine) -> (CrawlReport, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let report = Crawler::new(config, Arc::new(engine), sink.clone())
        .run()
        .await
        .expect("crawl failed");
    (report, sink)
}

fn scraped(sink: &MemorySink) -> Vec<(String, u32)> {
    sink.scrapes()
        .into_iter()
        .map(|record| (record.url, record.depth))
        .collect()
}

#[tokio::test]
async fn test_repeated_enqueue_accepted_once() {
    let frontier = Frontier::new(0);
    let url = Url::parse("https://a.net/page").unwrap();

    assert!(frontier.try_enqueue(FrontierItem::seed(url.clone())));
    for depth in 0..5 {
        assert!(!frontier.try_enqueue(FrontierItem::new(url.clone(), depth)));
    }
    assert_eq!(frontier.len(), 1);
    assert_eq!(frontier.seen_count(), 1);
}

#[tokio::test]
async fn test_depth_is_parent_depth_plus_one() {
    let engine = ScriptedEngine::new()
        .page(
            "https://a.net/",
            links(&["https://a.net/a", "https://a.net/b"]),
        )
        .page("https://a.net/a", links(&["https://a.net/c"]))
        .page(
            "https://a.net/b",
            links(&["https://a.net/c", "https://a.net/"]),
        )
        .page("https://a.net/c", links(&["https://a.net/d"]))
        .page("https://a.net/d", "<p>leaf</p>");

    let (report, sink) = crawl(crawl_config("https://a.net/", "zzz"), engine).await;

    let mut depths: Vec<(String, u32)> = scraped(&sink);
    depths.sort();
    assert_eq!(
        depths,
        vec![
            ("https://a.net/".to_string(), 0),
            ("https://a.net/a".to_string(), 1),
            ("https://a.net/b".to_string(), 1),
            ("https://a.net/c".to_string(), 2),
            ("https://a.net/d".to_string(), 3),
        ]
    );
    assert_eq!(report.links_enqueued, 4);
    assert_eq!(report.urls_seen, 5);
}

#[tokio::test]
async fn test_max_depth_two_never_scrapes_deeper() {
    let engine = ScriptedEngine::new()
        .page("https://a.net/", links(&["https://a.net/1"]))
        .page("https://a.net/1", links(&["https://a.net/2"]))
        .page("https://a.net/2", links(&["https://a.net/3"]))
        .page("https://a.net/3", links(&["https://a.net/4"]))
        .page("https://a.net/4", "<p>too deep</p>");
    let rendered = engine.rendered();

    let mut config = crawl_config("https://a.net/", "zzz");
    config.max_depth = 2;
    let (report, sink) = crawl(config, engine).await;

    assert_eq!(
        scraped(&sink),
        vec![
            ("https://a.net/".to_string(), 0),
            ("https://a.net/1".to_string(), 1),
            ("https://a.net/2".to_string(), 2),
        ]
    );
    assert!(sink.scrapes().iter().all(|record| record.depth <= 2));
    assert!(!rendered.lock().unwrap().contains(&"https://a.net/3".to_string()));
    assert_eq!(report.pages_scraped, 3);
}

#[tokio::test]
async fn test_link_cap_keeps_first_links_in_order() {
    let children: Vec<String> = (1..=10).map(|i| format!("https://a.net/{}", i)).collect();
    let hrefs: Vec<&str> = children.iter().map(String::as_str).collect();

    let mut engine = ScriptedEngine::new().page("https://a.net/", links(&hrefs));
    for child in &children {
        engine = engine.page(child, "<p>child</p>");
    }

    let mut config = crawl_config("https://a.net/", "zzz");
    config.max_links_per_page = 3;
    let (report, sink) = crawl(config, engine).await;

    assert_eq!(report.links_enqueued, 3);
    assert_eq!(
        scraped(&sink),
        vec![
            ("https://a.net/".to_string(), 0),
            ("https://a.net/1".to_string(), 1),
            ("https://a.net/2".to_string(), 1),
            ("https://a.net/3".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn test_domain_suffix_filters_links() {
    let engine = ScriptedEngine::new()
        .page(
            "https://a.net/",
            links(&["https://example.com/x", "https://shop.example.net/x"]),
        )
        .page("https://example.com/x", "<p>outside</p>")
        .page("https://shop.example.net/x", "<p>inside</p>");
    let rendered = engine.rendered();

    let mut config = crawl_config("https://a.net/", "zzz");
    config.domain_suffix = ".net".to_string();
    let (_report, sink) = crawl(config, engine).await;

    let urls: Vec<String> = sink.scrapes().into_iter().map(|r| r.url).collect();
    assert!(urls.contains(&"https://shop.example.net/x".to_string()));
    assert!(!urls.contains(&"https://example.com/x".to_string()));
    assert!(!rendered
        .lock()
        .unwrap()
        .contains(&"https://example.com/x".to_string()));
}

#[tokio::test]
async fn test_link_mode_records_matching_link_only() {
    let engine = ScriptedEngine::new().page(
        "https://a.net/home-page-url",
        links(&["https://a.net/analytics.js", "https://a.net/home"]),
    );

    let mut config = crawl_config("https://a.net/home-page-url", "analytics.js");
    config.max_depth = 1;
    config.max_links_per_page = 0;
    let (_report, sink) = crawl(config, engine).await;

    let for_seed: Vec<MatchRecord> = sink
        .matches()
        .into_iter()
        .filter(|record| record.source_url == "https://a.net/home-page-url")
        .collect();
    assert_eq!(
        for_seed,
        vec![MatchRecord::new(
            "https://a.net/home-page-url",
            "https://a.net/analytics.js"
        )]
    );
}

#[tokio::test]
async fn test_full_page_mode_records_query_once() {
    let engine = ScriptedEngine::new().page(
        "https://a.net/",
        r#"<html><body><script>load("analytics.js"); load("analytics.js");</script>
           <a href="https://a.net/other">other</a></body></html>"#,
    );

    let mut config = crawl_config("https://a.net/", "analytics.js");
    config.full_page_search = true;
    let (report, sink) = crawl(config, engine).await;

    assert_eq!(
        sink.matches(),
        vec![MatchRecord::new("https://a.net/", "analytics.js")]
    );
    assert_eq!(report.match_records, 1);
}

#[tokio::test]
async fn test_failed_render_writes_nothing_and_crawl_continues() {
    let engine = ScriptedEngine::new()
        .page(
            "https://a.net/",
            links(&[
                "https://a.net/timeout",
                "https://a.net/hang",
                "https://a.net/ok",
            ]),
        )
        .script("https://a.net/timeout", Script::Fail)
        .script("https://a.net/hang", Script::Hang)
        .page("https://a.net/ok", links(&["https://a.net/analytics.js"]));

    let mut config = crawl_config("https://a.net/", "analytics.js");
    config.render_timeout = Duration::from_millis(100);
    config.concurrency = 2;
    let (report, sink) = crawl(config, engine).await;

    let urls: Vec<String> = sink.scrapes().into_iter().map(|r| r.url).collect();
    assert!(!urls.contains(&"https://a.net/timeout".to_string()));
    assert!(!urls.contains(&"https://a.net/hang".to_string()));
    assert!(urls.contains(&"https://a.net/ok".to_string()));
    assert!(sink
        .matches()
        .iter()
        .all(|record| record.source_url != "https://a.net/timeout"
            && record.source_url != "https://a.net/hang"));
    // timeout, hang and the unrouted analytics.js link
    assert_eq!(report.render_failures, 3);
    assert_eq!(report.status, RunStatus::Completed);
}

#[tokio::test]
async fn test_two_page_cycle_terminates() {
    let engine = ScriptedEngine::new()
        .page("https://a.net/a", links(&["https://a.net/b"]))
        .page("https://a.net/b", links(&["https://a.net/a"]));
    let rendered = engine.rendered();

    let mut config = crawl_config("https://a.net/a", "zzz");
    config.max_depth = 0;
    config.concurrency = 4;

    let (report, sink) = tokio::time::timeout(Duration::from_secs(5), crawl(config, engine))
        .await
        .expect("cyclic crawl did not terminate");

    assert_eq!(report.pages_scraped, 2);
    assert_eq!(report.phase, CrawlPhase::Done);
    assert_eq!(sink.scrapes().len(), 2);
    assert_eq!(rendered.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_worker_pool_scrapes_every_page_once() {
    let children: Vec<String> = (0..50).map(|i| format!("https://a.net/p{}", i)).collect();
    let hrefs: Vec<&str> = children.iter().map(String::as_str).collect();

    let mut engine = ScriptedEngine::new().page("https://a.net/", links(&hrefs));
    for child in &children {
        // Every child links back to all siblings
        engine = engine.page(child, links(&hrefs));
    }
    let rendered = engine.rendered();

    let mut config = crawl_config("https://a.net/", "zzz");
    config.concurrency = 8;
    let (report, sink) = crawl(config, engine).await;

    assert_eq!(report.pages_scraped, 51);
    let mut urls: Vec<String> = sink.scrapes().into_iter().map(|r| r.url).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 51);
    assert_eq!(rendered.lock().unwrap().len(), 51);
}

#[tokio::test]
async fn test_sink_failure_is_fatal() {
    let engine = ScriptedEngine::new()
        .page("https://a.net/", links(&["https://a.net/1"]))
        .page("https://a.net/1", "<p>child</p>");

    let crawler = Crawler::new(
        crawl_config("https://a.net/", "zzz"),
        Arc::new(engine),
        Arc::new(BrokenSink),
    );

    let result = crawler.run().await;
    assert!(matches!(result, Err(CrawlError::Sink(_))));
    assert_eq!(crawler.phase(), CrawlPhase::Done);
}

#[tokio::test]
async fn test_unreachable_engine_fails_at_startup() {
    let engine = ScriptedEngine {
        unavailable: true,
        ..ScriptedEngine::default()
    };
    let sink = Arc::new(MemorySink::new());

    let result = Crawler::new(
        crawl_config("https://a.net/", "zzz"),
        Arc::new(engine),
        sink.clone(),
    )
    .run()
    .await;

    assert!(matches!(result, Err(CrawlError::RenderUnavailable(_))));
    assert!(sink.scrapes().is_empty());
    assert_eq!(sink.status(), Some(RunStatus::Failed));
}

#[tokio::test]
async fn test_engine_lost_mid_run_terminates() {
    let engine = ScriptedEngine::new()
        .page(
            "https://a.net/",
            links(&["https://a.net/lost", "https://a.net/1"]),
        )
        .script("https://a.net/lost", Script::Lost)
        .page("https://a.net/1", "<p>child</p>");

    let sink = Arc::new(MemorySink::new());
    let result = Crawler::new(
        crawl_config("https://a.net/", "zzz"),
        Arc::new(engine),
        sink.clone(),
    )
    .run()
    .await;

    assert!(matches!(result, Err(CrawlError::Render(_))));
    assert_eq!(sink.status(), Some(RunStatus::Failed));
    let urls: Vec<String> = sink.scrapes().into_iter().map(|r| r.url).collect();
    assert!(!urls.contains(&"https://a.net/1".to_string()));
}

#[tokio::test]
async fn test_cancellation_finishes_in_flight_page_only() {
    let cancel = CancellationToken::new();
    let engine = ScriptedEngine::new()
        .script(
            "https://a.net/",
            Script::CancelThenHtml(
                cancel.clone(),
                links(&["https://a.net/1", "https://a.net/2"]),
            ),
        )
        .page("https://a.net/1", "<p>child</p>")
        .page("https://a.net/2", "<p>child</p>");
    let rendered = engine.rendered();

    let sink = Arc::new(MemorySink::new());
    let mut config = crawl_config("https://a.net/", "zzz");
    config.concurrency = 2;
    let report = Crawler::new(config, Arc::new(engine), sink.clone())
        .with_cancellation(cancel)
        .run()
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Interrupted);
    assert_eq!(report.phase, CrawlPhase::Done);
    assert_eq!(scraped(&sink), vec![("https://a.net/".to_string(), 0)]);
    assert_eq!(rendered.lock().unwrap().len(), 1);
    assert_eq!(sink.status(), Some(RunStatus::Interrupted));
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_http_engine_crawl_writes_csv_logs() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><head>
            <script src="/static/analytics.js"></script>
            </head><body>
            <a href="/page1">Page 1</a>
            <a href="/page2#top">Page 2</a>
            <a href="mailto:someone@example.net">Mail</a>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page(
            r#"<html><body><a href="/">Home</a></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let sink = Arc::new(CsvSink::create(dir.path()).unwrap());

    let mut config = crawl_config(&format!("{}/", base_url), "analytics.js");
    config.concurrency = 2;
    config.max_depth = 1;
    config.render_timeout = Duration::from_secs(5);

    let report = Crawler::new(
        config,
        Arc::new(HttpRenderEngine::new("TestBot/1.0")),
        sink,
    )
    .run()
    .await
    .unwrap();

    // "/" and "/page1" render; "/page2" is a 404 and the script has no mock
    assert_eq!(report.pages_scraped, 2);
    assert_eq!(report.render_failures, 2);
    assert_eq!(report.status, RunStatus::Completed);

    let scraped_csv = std::fs::read_to_string(dir.path().join(SCRAPED_URLS_CSV)).unwrap();
    assert!(scraped_csv.starts_with("URL,Deep Level\n"));
    assert!(scraped_csv.contains(&format!("{}/,0\n", base_url)));
    assert!(scraped_csv.contains(&format!("{}/page1,1\n", base_url)));

    let scraped_txt = std::fs::read_to_string(dir.path().join(SCRAPED_URLS_TXT)).unwrap();
    assert_eq!(scraped_txt.lines().count(), 2);

    let result_csv = std::fs::read_to_string(dir.path().join(RESULT_CSV)).unwrap();
    assert_eq!(
        result_csv,
        format!(
            "Base URL,Search Query\n{}/,{}/static/analytics.js\n",
            base_url, base_url
        )
    );

    let result_txt = std::fs::read_to_string(dir.path().join(RESULT_TXT)).unwrap();
    assert_eq!(result_txt, format!("{}/\n", base_url));
}

#[tokio::test]
async fn test_run_crawl_records_to_sqlite() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><body>
            <a href="/a">A</a>
            <a href="/b">B</a>
            <script>window.analytics = "analytics.js";</script>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    for page in ["/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page("<p>plain</p>"))
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("crawl.db");

    let mut config = Config::default();
    config.crawl.start_url = format!("{}/", mock_server.uri());
    config.crawl.domain_suffix = "any".to_string();
    config.crawl.query = "analytics.js".to_string();
    config.crawl.full_page_search = true;
    config.render.concurrency = 2;
    config.render.timeout_secs = 5;
    config.output.format = OutputFormat::Sqlite;
    config.output.database_path = db_path.to_string_lossy().into_owned();

    let report = run_crawl(&config, CancellationToken::new()).await.unwrap();
    assert_eq!(report.pages_scraped, 3);
    assert_eq!(report.match_records, 1);

    let storage = SqliteStorage::new(&db_path).unwrap();
    let stats = load_statistics(&storage).unwrap().unwrap();
    assert_eq!(stats.run.status, RunStatus::Completed);
    assert_eq!(stats.pages_scraped, 3);
    assert_eq!(stats.matching_pages, 1);
    assert_eq!(stats.depth_breakdown.get(&1), Some(&2));
}

#[tokio::test]
async fn test_run_crawl_rejects_empty_query() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.crawl.start_url = "https://a.net/".to_string();
    config.crawl.query = String::new();
    config.output.directory = dir.path().to_string_lossy().into_owned();

    let result = run_crawl(&config, CancellationToken::new()).await;
    assert!(matches!(result, Err(CrawlError::Config(_))));
}

#[tokio::test]
async fn test_unicode_domain_suffix_follows_unicode_hosts() {
    let seed = Url::parse("https://сайт.укр/").unwrap();
    let news = Url::parse("https://новини.укр/").unwrap();
    let engine = ScriptedEngine::new()
        .page(
            seed.as_str(),
            links(&["https://новини.укр/", "https://example.net/"]),
        )
        .page(news.as_str(), "<p>news</p>")
        .page("https://example.net/", "<p>outside</p>");

    let mut config = Config::default();
    config.crawl.start_url = "https://сайт.укр/".to_string();
    config.crawl.query = "zzz".to_string();
    config.crawl.domain_suffix = ".укр".to_string();
    config.render.concurrency = 1;
    let settings = CrawlConfig::from_config(&config).unwrap();

    let (_report, sink) = crawl(settings, engine).await;

    assert_eq!(scraped(&sink), vec![(seed.to_string(), 0), (news.to_string(), 1)]);
}

#[tokio::test]
async fn test_http_engine_skips_non_html_responses() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<html><head>
            <link rel="stylesheet" href="/app.css">
            </head><body>
            <a href="/logo.png">Logo</a>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/app.css"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("body { color: red }", "text/css"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0x89u8, b'P', b'N', b'G'], "image/png"),
        )
        .mount(&mock_server)
        .await;

    let mut config = crawl_config(&format!("{}/", base_url), "analytics.js");
    config.render_timeout = Duration::from_secs(5);

    let sink = Arc::new(MemorySink::new());
    let report = Crawler::new(
        config,
        Arc::new(HttpRenderEngine::new("TestBot/1.0")),
        sink.clone(),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.pages_scraped, 1);
    assert_eq!(report.render_failures, 2);
    assert_eq!(scraped(&sink), vec![(format!("{}/", base_url), 0)]);
}

#[tokio::test]
async fn test_run_crawl_opens_sink_before_rendering() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_page("<p>never fetched</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let occupied = dir.path().join("occupied");
    std::fs::write(&occupied, "not a directory").unwrap();

    let mut config = Config::default();
    config.crawl.start_url = format!("{}/", mock_server.uri());
    config.crawl.query = "analytics.js".to_string();
    config.output.directory = occupied.to_string_lossy().into_owned();

    let result = run_crawl(&config, CancellationToken::new()).await;
    assert!(matches!(result, Err(CrawlError::Sink(_))));
}
