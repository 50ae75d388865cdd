use std::fs;
use std::path::PathBuf;

use discovery_core::config::{Settings, WalletSettings};
use discovery_core::types::{ActiveFilterValue, ActiveFilters, Preferences, Topic};
use discovery_engine::{HtmlNewsletter, Orchestrator};
use discovery_wallet::MockWallet;

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().to_path_buf()
}

fn instant_settings() -> Settings {
    Settings { wallet: WalletSettings { mock_delay_ms: 0, ..WalletSettings::default() }, ..Settings::default() }
}

fn orchestrator() -> Orchestrator<MockWallet, HtmlNewsletter> {
    let settings = instant_settings();
    let wallet = MockWallet::new(settings.wallet.clone());
    let o = Orchestrator::from_settings(settings, &repo_root(), wallet).expect("orchestrator");
    o.initialize().expect("initialize");
    o
}

fn titles(items: &[discovery_core::types::DataItem]) -> Vec<&str> {
    items.iter().filter_map(|i| i.get("title").and_then(|v| v.as_str())).collect()
}

#[test]
fn query_before_initialize_reports_failure() {
    let settings = instant_settings();
    let wallet = MockWallet::new(settings.wallet.clone());
    let o = Orchestrator::from_settings(settings, &repo_root(), wallet).unwrap();
    let outcome = o.process_query("thriller movies", &ActiveFilters::new());
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("not initialized"));
    assert!(!o.status().initialized);
}

#[test]
fn thriller_movies_end_to_end() {
    let o = orchestrator();
    let outcome = o.process_query("  Thriller   MOVIES ", &ActiveFilters::new());
    assert!(outcome.success);
    assert_eq!(outcome.topic, Topic::Movies);
    assert_eq!(outcome.keywords, vec!["thriller", "movies"]);
    assert_eq!(outcome.filters.first().map(|f| f.id.as_str()), Some("showtimes"));
    assert_eq!(titles(&outcome.data), vec!["Midnight Protocol", "Cold Signal"]);
    assert!(outcome.newsletter.contains("Your Movie Recommendations"));
    assert!(outcome.newsletter.contains("Generated for query: thriller movies"));
}

#[test]
fn active_filters_refine_fetched_results() {
    let o = orchestrator();
    let mut active = ActiveFilters::new();
    active.insert("showtimes".into(), ActiveFilterValue::Checkbox(true));
    let outcome = o.process_query("thriller movies", &active);
    assert_eq!(titles(&outcome.data), vec!["Midnight Protocol"]);
    assert!(outcome.newsletter.contains("Showtimes Near Me"));
}

#[test]
fn short_query_fails_in_band() {
    let o = orchestrator();
    let outcome = o.process_query(" ab ", &ActiveFilters::new());
    assert!(!outcome.success);
    assert!(outcome.error.is_some());
    assert!(outcome.data.is_empty());
}

#[test]
fn unrelated_query_falls_back_to_default() {
    let o = orchestrator();
    let outcome = o.process_query("quantum gardening", &ActiveFilters::new());
    assert!(outcome.success);
    assert_eq!(outcome.topic, Topic::Default);
    assert!(outcome.data.is_empty());
    assert!(outcome.newsletter.contains("No results found"));
}

#[test]
fn missing_dataset_dir_fails_to_build() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = instant_settings();
    let wallet = MockWallet::new(settings.wallet.clone());
    assert!(Orchestrator::from_settings(settings, tmp.path(), wallet).is_err());
}

#[test]
fn catalog_file_override_is_loaded() {
    let tmp = tempfile::tempdir().unwrap();
    let datasets = tmp.path().join("data/datasets");
    fs::create_dir_all(&datasets).unwrap();
    fs::write(datasets.join("tech.json"), r#"[{"name": "Pocket Drone", "description": "tiny drone"}]"#).unwrap();
    let catalog = fs::read_to_string(repo_root().join("data/catalog.json")).unwrap();
    fs::write(tmp.path().join("catalog.json"), catalog).unwrap();

    let mut settings = instant_settings();
    settings.data.catalog_file = Some("catalog.json".to_string());
    let wallet = MockWallet::new(settings.wallet.clone());
    let o = Orchestrator::from_settings(settings, tmp.path(), wallet).unwrap();
    o.initialize().unwrap();
    let outcome = o.process_query("drone deals", &ActiveFilters::new());
    assert_eq!(outcome.topic, Topic::Tech);
    assert_eq!(outcome.data.len(), 1);
}

#[test]
fn result_limit_applies_after_filters() {
    let tmp = tempfile::tempdir().unwrap();
    let datasets = tmp.path().join("data/datasets");
    fs::create_dir_all(&datasets).unwrap();
    fs::write(
        datasets.join("tech.json"),
        r#"[{"name": "Old Drone", "specs": false}, {"name": "New Drone", "specs": true}]"#,
    )
    .unwrap();

    let mut settings = instant_settings();
    settings.search.max_results = 1;
    let wallet = MockWallet::new(settings.wallet.clone());
    let o = Orchestrator::from_settings(settings, tmp.path(), wallet).unwrap();
    o.initialize().unwrap();

    let mut active = ActiveFilters::new();
    active.insert("specs".into(), ActiveFilterValue::Checkbox(true));
    let outcome = o.process_query("drone", &active);
    let names: Vec<&str> = outcome.data.iter().filter_map(|i| i.get("name").and_then(|v| v.as_str())).collect();
    assert_eq!(names, vec!["New Drone"]);

    let unfiltered = o.process_query("drone", &ActiveFilters::new());
    assert_eq!(unfiltered.data.len(), 1, "limit still caps unfiltered results");
}

#[tokio::test]
async fn wallet_round_trip_through_orchestrator() {
    let o = orchestrator();
    assert!(!o.status().wallet_connected);
    let account = o.connect_wallet().await.unwrap();
    assert!(o.status().wallet_connected);

    let prefs = Preferences { theme: "light".into(), topics: vec![Topic::Events], filters: ActiveFilters::new() };
    o.store_preferences(&account, &prefs).await.unwrap();
    assert_eq!(o.get_preferences(&account).await, Some(prefs));

    o.disconnect_wallet().await.unwrap();
    assert!(o.store_preferences(&account, &MockWallet::default_preferences()).await.is_err());
    assert_eq!(o.get_preferences(&account).await, None);
}
