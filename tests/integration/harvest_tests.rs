//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock listing sites and run the full
//! fetch-parse-store cycle end-to-end against a temporary SQLite file.

use page_harvest::config::{load_config, Config, ExtractionRules};
use page_harvest::crawler::{run_harvest, ArticleRecord, Harvester, PageOutcome};
use page_harvest::storage::{ArticleStore, SqliteStore};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, db_path: &Path, start: u32, end: u32) -> Config {
    Config {
        db_path: db_path.to_string_lossy().into_owned(),
        base_url: format!("{}/list/{{page}}.html", server.uri()),
        start_page: start,
        end_page: end,
        first_page_url: String::new(),
        max_workers: 2,
        request_timeout_secs: 1,
        extraction: ExtractionRules {
            article_pattern: format!(r"^{}/\d+\.html$", regex::escape(&server.uri())),
            ..ExtractionRules::default()
        },
    }
}

/// Builds a listing page with one link per (id, title)
fn listing(server: &MockServer, articles: &[(u32, &str)]) -> String {
    let links: String = articles
        .iter()
        .map(|(id, title)| {
            format!(
                r#"<a href="{}/{}.html">
                    <h5 class="xs-padding xs-font-size">{}</h5>
                    <div class="pp-box-time"><span>2024.03</span><p>{:02}</p></div>
                </a>"#,
                server.uri(),
                id,
                title,
                id % 28 + 1
            )
        })
        .collect();

    format!(
        r#"<html><body>
        <header><a href="{}/1000.html">Pinned</a></header>
        <div class="col-sm-9 col-xs-12 xs-padding">{}</div>
        </body></html>"#,
        server.uri(),
        links
    )
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/list/{}.html", page)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn open_store(db_path: &Path) -> SqliteStore {
    SqliteStore::open_with_schema(db_path).expect("Failed to open store")
}

#[tokio::test]
async fn test_scenario_duplicate_empty_and_timeout() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("articles.db");

    // One of page 1's URLs is already stored
    {
        let mut store = open_store(&db_path);
        store
            .insert_or_ignore(
                &[ArticleRecord {
                    url: format!("{}/11.html", server.uri()),
                    title: "Seen before".to_string(),
                    publish_time: String::new(),
                    source_list_url: "earlier".to_string(),
                }],
                "earlier",
            )
            .unwrap();
    }

    mount_page(&server, 1, listing(&server, &[(11, "Old"), (12, "New")])).await;
    mount_page(
        &server,
        2,
        format!(
            r#"<div class="col-sm-9 col-xs-12 xs-padding"><a href="{}/about">About</a></div>"#,
            server.uri()
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/list/3.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing(&server, &[(13, "Late")]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&server, &db_path, 1, 3);
    let summary = run_harvest(config).await.expect("Harvest failed");

    assert_eq!(summary.pages_attempted, 3);
    assert_eq!(summary.records_extracted, 2);
    assert_eq!(summary.newly_stored, 1);
    assert_eq!(summary.distinct_urls, 2);
    assert_eq!(summary.pages_failed, 1);

    let page3 = summary.pages.iter().find(|p| p.page == 3).unwrap();
    assert!(matches!(page3.outcome, PageOutcome::Network(_)));
    let page2 = summary.pages.iter().find(|p| p.page == 2).unwrap();
    assert_eq!(page2.outcome, PageOutcome::Parsed);
    assert_eq!(page2.records, 0);

    // The pre-existing row is untouched
    let store = open_store(&db_path);
    let rows = store.recent(10).unwrap();
    let old = rows.iter().find(|r| r.url.ends_with("/11.html")).unwrap();
    assert_eq!(old.title, "Seen before");
    let new = rows.iter().find(|r| r.url.ends_with("/12.html")).unwrap();
    assert_eq!(new.title, "New");
    assert_eq!(new.list_url, format!("{}/list/1.html", server.uri()));
    assert!(!new.publish_time.is_empty());
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("articles.db");

    for page in 1..=4u32 {
        let articles: Vec<(u32, String)> = (0..5).map(|i| (page * 10 + i, format!("A{}", i))).collect();
        let refs: Vec<(u32, &str)> = articles.iter().map(|(id, t)| (*id, t.as_str())).collect();
        mount_page(&server, page, listing(&server, &refs)).await;
    }

    let first = run_harvest(create_test_config(&server, &db_path, 1, 4))
        .await
        .unwrap();
    assert_eq!(first.distinct_urls, 20);
    assert_eq!(first.newly_stored, 20);
    // No URL repeats across the range, so the counts agree
    assert_eq!(first.records_extracted as u64, first.distinct_urls);

    let second = run_harvest(create_test_config(&server, &db_path, 1, 4))
        .await
        .unwrap();
    assert_eq!(second.distinct_urls, 20);
    assert_eq!(second.newly_stored, 0);
    assert_eq!(second.records_extracted, 20);
}

#[tokio::test]
async fn test_cross_page_duplicates_counted_pre_dedup() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("articles.db");

    // Article 7 is listed on both pages
    mount_page(&server, 1, listing(&server, &[(7, "Shared"), (8, "Only one")])).await;
    mount_page(&server, 2, listing(&server, &[(7, "Shared"), (9, "Only two")])).await;

    let summary = run_harvest(create_test_config(&server, &db_path, 1, 2))
        .await
        .unwrap();

    assert_eq!(summary.records_extracted, 4);
    assert_eq!(summary.distinct_urls, 3);
    assert!(summary.records_extracted as u64 > summary.distinct_urls);
}

#[tokio::test]
async fn test_failing_pages_do_not_block_others() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("articles.db");

    mount_page(&server, 1, listing(&server, &[(1, "One")])).await;
    mount_page(&server, 2, "<html><body>no container here</body></html>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/list/3.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, 4, listing(&server, &[(4, "Four"), (5, "")])).await;

    let summary = run_harvest(create_test_config(&server, &db_path, 1, 4))
        .await
        .unwrap();

    assert_eq!(summary.pages_attempted, 4);
    assert_eq!(summary.pages_failed, 2);
    assert_eq!(summary.distinct_urls, 3);

    let page2 = summary.pages.iter().find(|p| p.page == 2).unwrap();
    assert_eq!(page2.outcome, PageOutcome::ContainerMissing);
    let page3 = summary.pages.iter().find(|p| p.page == 3).unwrap();
    assert_eq!(page3.outcome, PageOutcome::HttpStatus(500));

    // An empty title is stored, not dropped
    let store = open_store(&db_path);
    let untitled = store
        .recent(10)
        .unwrap()
        .into_iter()
        .find(|r| r.url.ends_with("/5.html"))
        .unwrap();
    assert_eq!(untitled.title, "");
}

#[tokio::test]
async fn test_first_page_override() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("articles.db");

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&server, &[(100, "Front")])))
        .mount(&server)
        .await;
    mount_page(&server, 2, listing(&server, &[(200, "Second")])).await;

    let mut config = create_test_config(&server, &db_path, 1, 2);
    config.first_page_url = format!("{}/index.html", server.uri());

    let summary = run_harvest(config).await.unwrap();
    assert_eq!(summary.distinct_urls, 2);
    assert_eq!(summary.pages_failed, 0);

    let page1 = summary.pages.iter().find(|p| p.page == 1).unwrap();
    assert_eq!(page1.list_url, format!("{}/index.html", server.uri()));
}

#[tokio::test]
async fn test_run_from_config_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("data").join("articles.db");

    mount_page(&server, 5, listing(&server, &[(50, "Fifty"), (51, "Fifty-one")])).await;

    let config_path = dir.path().join("config.yaml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    write!(
        file,
        r#"dbPath: "{db}"
baseUrl: "{base}/list/{{page}}.html"
startPage: 5
endPage: 5
maxWorkers: 3
requestTimeoutSecs: 2
extraction:
  articlePattern: '^{pattern}/\d+\.html$'
"#,
        db = db_path.display(),
        base = server.uri(),
        pattern = regex::escape(&server.uri())
    )
    .unwrap();
    drop(file);

    let config = load_config(&config_path).expect("Failed to load config");
    let mut harvester = Harvester::new(config).unwrap();
    let summary = harvester.run(open_store(&db_path)).await.unwrap();

    assert_eq!(summary.pages_attempted, 1);
    assert_eq!(summary.distinct_urls, 2);
    assert_eq!(open_store(&db_path).count().unwrap(), 2);
}
