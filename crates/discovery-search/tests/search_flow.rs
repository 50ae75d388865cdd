use std::path::PathBuf;
use std::sync::Arc;

use discovery_core::dataset::DatasetLoader;
use discovery_core::types::{ActiveFilterValue, ActiveFilters, Topic};
use discovery_search::DatasetSearch;

fn shipped() -> DatasetSearch {
    // crates/discovery-search -> crates -> repo root
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().to_path_buf();
    let datasets = DatasetLoader::new().load_dir(&root.join("data/datasets")).expect("datasets");
    DatasetSearch::new(Arc::new(datasets))
}

fn names(items: &[discovery_core::types::DataItem], field: &str) -> Vec<String> {
    items.iter().filter_map(|i| i.get(field).and_then(|v| v.as_str()).map(str::to_string)).collect()
}

#[test]
fn search_is_idempotent() {
    let engine = shipped();
    let mut active = ActiveFilters::new();
    active.insert("dietary".into(), ActiveFilterValue::MultiSelect(["vegan".to_string()].into_iter().collect()));
    let first = engine.search(Topic::Restaurants, "downtown", &active);
    let second = engine.search(Topic::Restaurants, "downtown", &active);
    assert_eq!(first, second);
    assert_eq!(names(&first, "name"), vec!["Verde Table"]);
}

#[test]
fn no_query_no_filters_returns_whole_dataset() {
    let engine = shipped();
    for topic in [Topic::Movies, Topic::Restaurants, Topic::Travel, Topic::Events, Topic::Tech] {
        let all = engine.search(topic, "", &ActiveFilters::new());
        assert_eq!(all.as_slice(), engine.datasets().get(topic));
    }
}

#[test]
fn one_failing_predicate_excludes_item() {
    let engine = shipped();
    let mut active = ActiveFilters::new();
    active.insert("reservations".into(), ActiveFilterValue::Checkbox(true));
    active.insert("ambiance".into(), ActiveFilterValue::MultiSelect(["romantic".to_string()].into_iter().collect()));
    let both = names(&engine.search(Topic::Restaurants, "", &active), "name");
    assert_eq!(both, vec!["Verde Table", "Harbor Grill", "Le Petit Four"]);

    active.insert("dietary".into(), ActiveFilterValue::MultiSelect(["vegan".to_string()].into_iter().collect()));
    let all_three = names(&engine.search(Topic::Restaurants, "", &active), "name");
    assert_eq!(all_three, vec!["Verde Table"]);
}

#[test]
fn price_slider_filters_tech() {
    let engine = shipped();
    let mut active = ActiveFilters::new();
    active.insert("prices".into(), ActiveFilterValue::Range { min: 0.0, max: 500.0 });
    let cheap = names(&engine.search(Topic::Tech, "", &active), "name");
    assert_eq!(cheap, vec!["Aero Mini Drone", "Pulse Phone 9", "Beacon Smart Tag"]);
}
