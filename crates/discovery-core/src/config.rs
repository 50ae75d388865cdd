//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_SEARCH__MAX_RESULTS=20`). `Settings`
//! is the typed view every crate reads; missing keys fall back to defaults.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    /// Wrap an already assembled figment, e.g. one built from inline TOML.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment: Figment::from(Serialized::defaults(Settings::default())).merge(figment) }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub query: QuerySettings,
    pub classifier: ClassifierSettings,
    pub filters: FilterSettings,
    pub search: SearchSettings,
    pub newsletter: NewsletterSettings,
    pub wallet: WalletSettings,
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.query.min_length == 0 {
            return Err(anyhow::anyhow!("query.min_length must be at least 1"));
        }
        if self.filters.max_filters == 0 {
            return Err(anyhow::anyhow!("filters.max_filters must be at least 1"));
        }
        if self.search.max_results == 0 {
            return Err(anyhow::anyhow!("search.max_results must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dataset_dir: String,
    /// JSON file overriding the built-in filter catalog.
    pub catalog_file: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { dataset_dir: "data/datasets".to_string(), catalog_file: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub min_length: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self { min_length: 3 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierStrategy {
    /// Most exact keyword matches wins, earlier topic on ties.
    #[default]
    Overlap,
    /// First topic (in declaration order) with any keyword substring in the query.
    Substring,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub strategy: ClassifierStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub max_filters: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self { max_filters: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { max_results: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterSettings {
    pub max_items: usize,
    pub include_images: bool,
    pub include_links: bool,
}

impl Default for NewsletterSettings {
    fn default() -> Self {
        Self { max_items: 5, include_images: true, include_links: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletSettings {
    pub network: String,
    pub ws_provider: String,
    pub chain_name: String,
    pub storage_key: String,
    pub ss58_format: u16,
    pub app_name: String,
    /// Simulated latency of the mock connector, in milliseconds.
    pub mock_delay_ms: u64,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            network: "westend".to_string(),
            ws_provider: "wss://westend-rpc.polkadot.io".to_string(),
            chain_name: "Westend Testnet".to_string(),
            storage_key: "user_preferences".to_string(),
            ss58_format: 42,
            app_name: "Topic Discovery".to_string(),
            mock_delay_ms: 1000,
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
