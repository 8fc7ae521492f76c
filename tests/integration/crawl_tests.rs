//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use lantern_crawl::config::{
    ClassifierConfig, Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig,
};
use lantern_crawl::crawler::{Coordinator, StopReason};
use lantern_crawl::storage::{SqliteStorage, Storage};
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server from one seed
fn create_test_config(base_url: &str, seed: &str, db_path: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            workers: 2,
            queue_capacity: 1000,
            request_timeout_secs: 5,
            run_timeout_secs: 30,
            max_records: 10,
            monitor_interval_secs: 1,
        },
        site: SiteConfig {
            base_url: base_url.to_string(),
            article_prefix: "/wiki/".to_string(),
            title_suffix: " - Wikipedia".to_string(),
            seeds: vec![format!("{}{}", base_url, seed)],
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string_lossy().into_owned(),
        },
        classifier: ClassifierConfig::default(),
    }
}

/// Builds an article page with the given title and links
fn article(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{} - Wikipedia</title></head><body><ul>{}</ul></body></html>",
        title, anchors
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn open_db(db_path: &Path) -> SqliteStorage {
    SqliteStorage::new(db_path).expect("Failed to reopen database")
}

#[tokio::test]
async fn test_seed_with_three_children() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");

    mount_page(
        &mock_server,
        "/wiki/Seed",
        article(
            "Seed",
            &[
                "/wiki/Sorting_algorithm",
                "/wiki/PostgreSQL",
                "/wiki/Compiler",
                "/wiki/Category:Computing",
                "https://other.site/x",
                "/wiki/Compiler#History",
            ],
        ),
    )
    .await;
    mount_page(&mock_server, "/wiki/Sorting_algorithm", article("Sorting algorithm", &["/wiki/Seed"])).await;
    mount_page(&mock_server, "/wiki/PostgreSQL", article("PostgreSQL", &["/wiki/Compiler"])).await;
    mount_page(&mock_server, "/wiki/Compiler", article("Compiler", &[])).await;

    let config = create_test_config(&base_url, "/wiki/Seed", &db_path);
    let summary = Coordinator::new(config, "test-hash")
        .run()
        .await
        .expect("Crawl should complete");

    assert_eq!(summary.total, 4);
    assert_eq!(summary.stop_reason, StopReason::Exhausted);
    assert!(summary.to_string().starts_with("FINISHED: 4 records in "));

    let storage = open_db(&db_path);
    assert_eq!(storage.count_pages().unwrap(), 4);

    let sorting = storage
        .get_page(&format!("{}/wiki/Sorting_algorithm", base_url))
        .unwrap()
        .expect("child should be stored");
    assert_eq!(sorting.title, "Sorting algorithm");
    assert_eq!(sorting.category, "Algorithms");

    let postgres = storage
        .get_page(&format!("{}/wiki/PostgreSQL", base_url))
        .unwrap()
        .unwrap();
    assert_eq!(postgres.category, "Databases");

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.total, 4);
    assert_eq!(run.config_hash, "test-hash");
    assert_eq!(run.stop_reason.as_deref(), Some("finished"));
}

#[tokio::test]
async fn test_every_url_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");

    mount_page(&mock_server, "/wiki/Seed", article("Seed", &["/wiki/A", "/wiki/B", "/wiki/A"])).await;
    mount_page(&mock_server, "/wiki/A", article("A", &["/wiki/B", "/wiki/Shared", "/wiki/Seed"])).await;
    mount_page(&mock_server, "/wiki/B", article("B", &["/wiki/A", "/wiki/Shared"])).await;

    Mock::given(method("GET"))
        .and(path("/wiki/Shared"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article("Shared", &["/wiki/Seed/"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, "/wiki/Seed", &db_path);
    config.crawler.workers = 4;

    let summary = Coordinator::new(config, "hash").run().await.unwrap();

    assert_eq!(summary.total, 4);
    assert_eq!(open_db(&db_path).count_pages().unwrap(), 4);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_cap_stops_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");

    let children: Vec<String> = (0..30).map(|i| format!("/wiki/Page_{}", i)).collect();
    let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();
    mount_page(&mock_server, "/wiki/Seed", article("Seed", &child_refs)).await;

    for child in &children {
        mount_page(&mock_server, child, article(child, &[])).await;
    }

    let mut config = create_test_config(&base_url, "/wiki/Seed", &db_path);
    config.crawler.workers = 3;
    config.crawler.max_records = 5;

    let summary = Coordinator::new(config, "hash").run().await.unwrap();

    assert_eq!(summary.stop_reason, StopReason::CapReached);
    assert!(summary.total >= 5);
    // Each worker may finish the page it already had in flight
    assert!(summary.total <= 5 + 3 - 1, "total {} exceeds tolerance", summary.total);
    assert!(summary.to_string().starts_with("CAPPED: "));

    let storage = open_db(&db_path);
    assert_eq!(storage.count_pages().unwrap(), summary.total);
    assert_eq!(
        storage.get_latest_run().unwrap().unwrap().stop_reason.as_deref(),
        Some("capped")
    );
}

#[tokio::test]
async fn test_page_without_title_is_not_stored() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");

    mount_page(&mock_server, "/wiki/Seed", article("Seed", &["/wiki/Untitled"])).await;
    mount_page(
        &mock_server,
        "/wiki/Untitled",
        r#"<html><body><a href="/wiki/Hidden">Hidden</a></body></html>"#.to_string(),
    )
    .await;

    // Links on an untitled page are not followed
    Mock::given(method("GET"))
        .and(path("/wiki/Hidden"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article("Hidden", &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, "/wiki/Seed", &db_path);
    let summary = Coordinator::new(config, "hash").run().await.unwrap();

    assert_eq!(summary.total, 1);

    let storage = open_db(&db_path);
    assert!(storage
        .get_page(&format!("{}/wiki/Untitled", base_url))
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_http_errors_are_soft_failures() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");

    mount_page(
        &mock_server,
        "/wiki/Seed",
        article("Seed", &["/wiki/Missing", "/wiki/Broken", "/wiki/Fine"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string(article("Broken", &[])))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/wiki/Fine", article("Fine", &[])).await;

    let config = create_test_config(&base_url, "/wiki/Seed", &db_path);
    let summary = Coordinator::new(config, "hash").run().await.unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.stop_reason, StopReason::Exhausted);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");

    // Seed -> A, B; A -> C; B -> D; C -> E
    mount_page(&mock_server, "/wiki/Seed", article("Seed", &["/wiki/A", "/wiki/B"])).await;
    mount_page(&mock_server, "/wiki/A", article("A", &["/wiki/C"])).await;
    mount_page(&mock_server, "/wiki/B", article("B", &["/wiki/D"])).await;
    mount_page(&mock_server, "/wiki/C", article("C", &["/wiki/E"])).await;
    mount_page(&mock_server, "/wiki/D", article("D", &[])).await;
    mount_page(&mock_server, "/wiki/E", article("E", &[])).await;

    let mut config = create_test_config(&base_url, "/wiki/Seed", &db_path);
    config.crawler.workers = 1;

    let summary = Coordinator::new(config, "hash").run().await.unwrap();
    assert_eq!(summary.total, 6);

    let fetched: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();

    assert_eq!(
        fetched,
        vec!["/wiki/Seed", "/wiki/A", "/wiki/B", "/wiki/C", "/wiki/D", "/wiki/E"]
    );
}

#[tokio::test]
async fn test_timeout_drains_in_flight_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");

    mount_page(
        &mock_server,
        "/wiki/Seed",
        article("Seed", &["/wiki/Slow_1", "/wiki/Slow_2", "/wiki/Slow_3"]),
    )
    .await;
    for slow in ["/wiki/Slow_1", "/wiki/Slow_2", "/wiki/Slow_3"] {
        Mock::given(method("GET"))
            .and(path(slow))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(article(slow, &[]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;
    }

    let mut config = create_test_config(&base_url, "/wiki/Seed", &db_path);
    config.crawler.run_timeout_secs = 1;

    let summary = tokio::time::timeout(
        Duration::from_secs(15),
        Coordinator::new(config, "hash").run(),
    )
    .await
    .expect("crawl must not hang after the deadline")
    .unwrap();

    assert_eq!(summary.stop_reason, StopReason::TimedOut);
    assert!(summary.total >= 1);
    assert!(summary.to_string().starts_with("TIMEOUT: "));

    // Both in-flight slow pages complete; the third is still queued when the
    // workers observe the deadline, so it is never fetched
    assert_eq!(summary.total, 3);
    let storage = open_db(&db_path);
    assert_eq!(storage.count_pages().unwrap(), 3);
    assert!(storage
        .get_page(&format!("{}/wiki/Slow_3", base_url))
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_runs_are_recorded_per_invocation() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("crawl.db");

    mount_page(&mock_server, "/wiki/Seed", article("Seed", &[])).await;

    let first = Coordinator::new(create_test_config(&base_url, "/wiki/Seed", &db_path), "one")
        .run()
        .await
        .unwrap();
    let second = Coordinator::new(create_test_config(&base_url, "/wiki/Seed", &db_path), "two")
        .run()
        .await
        .unwrap();

    assert_eq!(first.total, 1);
    // The record already exists from the first run
    assert_eq!(second.total, 0);
    assert!(second.run_id > first.run_id);

    let storage = open_db(&db_path);
    assert_eq!(storage.count_pages().unwrap(), 1);
    assert_eq!(storage.get_latest_run().unwrap().unwrap().config_hash, "two");
}
