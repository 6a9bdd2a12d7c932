use crate::config::settings::Settings;

#[test]
fn test_defaults_load_without_config_files() {
    let settings = Settings::new().expect("defaults should always load");

    assert_eq!(settings.crawler.default_page_budget, 50);
    assert!(settings.crawler.max_concurrency >= 1);
    assert!(settings.crawler.respect_robots);
    assert_eq!(settings.storage.output_dir, "./data");
    assert!(settings.known_fandoms.is_empty());
}
