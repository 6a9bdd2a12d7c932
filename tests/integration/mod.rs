mod helpers;

use std::sync::Arc;
use tempfile::TempDir;

use fandomrs::application::use_cases::harvest_use_case::HarvestUseCase;
use fandomrs::domain::models::crawl::CrawlTarget;
use fandomrs::storage::catalog::Catalog;
use fandomrs::utils::cancellation::CancelToken;
use fandomrs::utils::errors::HarvestError;
use fandomrs::utils::fandom_lock;
use fandomrs::utils::robots::AllowAllRobots;

use helpers::{character_page, test_settings, FixtureEngine};

fn use_case(engine: Arc<FixtureEngine>, output_dir: &std::path::Path) -> HarvestUseCase<FixtureEngine> {
    HarvestUseCase::new(
        engine,
        Arc::new(AllowAllRobots),
        test_settings(),
        output_dir,
    )
}

fn five_page_wiki() -> Vec<(&'static str, String)> {
    vec![
        (
            "/",
            r#"<html><body>
                <a href="/wiki/Ahri">Ahri</a>
                <a href="/wiki/Garen">Garen</a>
                <a href="/wiki/Teemo">Teemo</a>
                <a href="/wiki/Zed">Zed</a>
                <a href="/wiki/Brand">Brand</a>
            </body></html>"#
                .to_string(),
        ),
        ("/wiki/Ahri", character_page("Ahri", "Vastaya")),
        ("/wiki/Garen", character_page("Garen", "Human")),
        ("/wiki/Teemo", character_page("Teemo", "Yordle")),
        ("/wiki/Zed", character_page("Zed", "Human")),
        ("/wiki/Brand", character_page("Brand", "Spirit")),
    ]
}

fn engine_for(pages: &[(&'static str, String)]) -> Arc<FixtureEngine> {
    Arc::new(FixtureEngine::new(
        pages.iter().map(|(p, h)| (*p, h.as_str())).collect(),
    ))
}

#[tokio::test]
async fn test_budget_two_scenario_publishes_small_dataset() {
    let dir = TempDir::new().unwrap();
    let pages = five_page_wiki();
    let target = CrawlTarget::new("https://example.fandom.com/", 2).unwrap();

    let summary = use_case(engine_for(&pages), dir.path())
        .run(target, CancelToken::new())
        .await
        .unwrap();

    assert_eq!(summary.fandom_id, "example");
    assert_eq!(summary.stats.pages_fetched, 2);
    assert!(summary.records <= 2);

    let latest = dir.path().join("example_latest.json");
    let parsed: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&latest).unwrap()).unwrap();
    assert_eq!(parsed.len(), summary.records);
    assert!(parsed.iter().all(|r| r["fandom_name"] == "example"));

    // The crawl report sits next to the dataset
    assert!(dir.path().join("example_scraping_report.json").exists());
}

#[tokio::test]
async fn test_repeated_runs_produce_byte_identical_artifacts() {
    let pages = five_page_wiki();
    // Same wiki published under a fandom id no other test locks
    let target = || CrawlTarget::new("https://determin.fandom.com/", 4).unwrap();

    let dir_a = TempDir::new().unwrap();
    use_case(engine_for(&pages), dir_a.path())
        .run(target(), CancelToken::new())
        .await
        .unwrap();

    let dir_b = TempDir::new().unwrap();
    use_case(engine_for(&pages), dir_b.path())
        .run(target(), CancelToken::new())
        .await
        .unwrap();

    let bytes_a = std::fs::read(dir_a.path().join("determin_latest.json")).unwrap();
    let bytes_b = std::fs::read(dir_b.path().join("determin_latest.json")).unwrap();
    assert_eq!(bytes_a, bytes_b);
}

#[tokio::test]
async fn test_name_case_variants_merge_into_one_record() {
    let dir = TempDir::new().unwrap();
    let pages = vec![
        (
            "/",
            r#"<html><a href="/wiki/Ahri">A</a><a href="/wiki/Ahri_(old)">B</a></html>"#
                .to_string(),
        ),
        ("/wiki/Ahri", character_page("Ahri", "Vastaya")),
        // Title differs only in case and stray whitespace
        ("/wiki/Ahri_(old)", character_page("ahri ", "")),
    ];
    let target = CrawlTarget::new("https://mergecase.fandom.com/", 50).unwrap();

    let summary = use_case(engine_for(&pages), dir.path())
        .run(target, CancelToken::new())
        .await
        .unwrap();

    assert_eq!(summary.records, 1);

    let parsed: Vec<serde_json::Value> = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("mergecase_latest.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(parsed[0]["name"], "Ahri");
    // First non-empty species value survives the merge
    assert_eq!(parsed[0]["character_type"], "Vastaya");
}

#[tokio::test]
async fn test_invalid_target_is_rejected_before_any_fetch() {
    let err = CrawlTarget::new("https://notfandom.org/", 10).unwrap_err();
    assert!(matches!(err, HarvestError::InvalidTarget(_)));
}

#[tokio::test]
async fn test_cancelled_run_publishes_nothing() {
    let dir = TempDir::new().unwrap();
    let pages = five_page_wiki();
    let engine = engine_for(&pages);
    let target = CrawlTarget::new("https://cancelme.fandom.com/", 10).unwrap();

    let cancel = CancelToken::new();
    cancel.cancel();

    let err = use_case(engine.clone(), dir.path())
        .run(target, cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::Cancelled));
    assert_eq!(engine.fetch_count(), 0);
    assert!(!dir.path().join("cancelme_latest.json").exists());
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_concurrent_crawl_of_same_fandom_is_refused() {
    let dir = TempDir::new().unwrap();
    let pages = five_page_wiki();
    let target = CrawlTarget::new("https://locked.fandom.com/", 2).unwrap();

    let _held = fandom_lock::registry().try_acquire("locked").unwrap();

    let err = use_case(engine_for(&pages), dir.path())
        .run(target, CancelToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::CrawlInProgress(_)));
}

#[tokio::test]
async fn test_catalog_lists_published_datasets() {
    let dir = TempDir::new().unwrap();
    let pages = five_page_wiki();
    let target = CrawlTarget::new("https://catalogued.fandom.com/", 3).unwrap();

    use_case(engine_for(&pages), dir.path())
        .run(target, CancelToken::new())
        .await
        .unwrap();

    let known = std::collections::HashMap::new();
    let catalog = Catalog::new(dir.path(), &known);
    let entries = catalog.list_datasets().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "catalogued");
    assert_eq!(entries[0].data_file, "catalogued_latest.json");
    catalog.health().unwrap();
}
