use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::{DataItem, Topic};

/// Read-only topic datasets, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    items: BTreeMap<Topic, Vec<DataItem>>,
}

impl Datasets {
    pub fn new() -> Self { Self::default() }

    /// Builder used by tests and embedders that already hold parsed items.
    pub fn with_topic(mut self, topic: Topic, items: Vec<DataItem>) -> Self {
        self.items.insert(topic, items);
        self
    }

    /// Items for `topic`; the default topic and unknown topics have none.
    pub fn get(&self, topic: Topic) -> &[DataItem] {
        match self.items.get(&topic) {
            Some(items) => items.as_slice(),
            None => {
                debug!("{}", Error::NoDataForTopic(topic));
                &[]
            }
        }
    }

    pub fn topics(&self) -> impl Iterator<Item = Topic> + '_ { self.items.keys().copied() }

    pub fn len(&self) -> usize { self.items.values().map(Vec::len).sum() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Loads `<topic>.json` files (each a JSON array of objects) from a directory.
#[derive(Default)]
pub struct DatasetLoader;

impl DatasetLoader {
    pub fn new() -> Self { Self }

    pub fn load_dir(&self, data_dir: &Path) -> Result<Datasets> {
        if !data_dir.is_dir() {
            return Err(Error::NotFound(format!("dataset directory {}", data_dir.display())));
        }
        let files = self.list_json_files(data_dir);
        if files.is_empty() {
            warn!("No .json datasets found under {}", data_dir.display());
            return Ok(Datasets::new());
        }
        let mut datasets = Datasets::new();
        for file_path in &files {
            let Some(topic) = self.topic_from_path(file_path) else {
                warn!("Skipping {}: file stem is not a topic", file_path.display());
                continue;
            };
            if topic == Topic::Default {
                continue;
            }
            let items = self.read_items(file_path)?;
            debug!("Loaded {} items for topic {} from {}", items.len(), topic, file_path.display());
            datasets.items.insert(topic, items);
        }
        info!("Loaded {} items across {} topics", datasets.len(), datasets.items.len());
        Ok(datasets)
    }

    fn topic_from_path(&self, file_path: &Path) -> Option<Topic> {
        let stem = file_path.file_stem()?.to_str()?;
        Topic::ALL.into_iter().find(|t| t.slug() == stem)
    }

    fn read_items(&self, file_path: &Path) -> Result<Vec<DataItem>> {
        let content = fs::read_to_string(file_path)
            .map_err(|e| Error::InvalidConfig(format!("cannot read {}: {}", file_path.display(), e)))?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&content)
            .map_err(|e| Error::InvalidConfig(format!("cannot parse {}: {}", file_path.display(), e)))?;
        let mut items = Vec::with_capacity(values.len());
        for (i, value) in values.into_iter().enumerate() {
            match value {
                serde_json::Value::Object(map) => items.push(map),
                other => warn!("{}[{}] is not an object ({}), skipped", file_path.display(), i, other),
            }
        }
        Ok(items)
    }

    fn list_json_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut json_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).max_depth(1).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") { json_files.push(path.to_path_buf()); }
        }
        json_files.sort();
        json_files
    }
}
