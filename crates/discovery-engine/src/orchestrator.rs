use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use discovery_core::catalog::Catalog;
use discovery_core::config::{resolve_with_base, Settings};
use discovery_core::dataset::{DatasetLoader, Datasets};
use discovery_core::error::{Error, Result};
use discovery_core::traits::{NewsletterRenderer, WalletConnector};
use discovery_core::types::{Account, ActiveFilters, FilterDescriptor, Preferences, SearchResult, Topic, TxHandle};
use discovery_query::QueryPipeline;
use discovery_search::DatasetSearch;

use crate::newsletter::HtmlNewsletter;

/// Result of one end-to-end query. Failures are reported in-band so callers
/// never have to unwind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    pub success: bool,
    pub topic: Topic,
    pub keywords: Vec<String>,
    pub filters: Vec<FilterDescriptor>,
    pub data: SearchResult,
    pub newsletter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryOutcome {
    fn failure(error: &Error) -> Self {
        Self {
            success: false,
            topic: Topic::Default,
            keywords: Vec::new(),
            filters: Vec::new(),
            data: Vec::new(),
            newsletter: String::new(),
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrchestratorStatus {
    pub initialized: bool,
    pub wallet_connected: bool,
}

/// Load the filter catalog named in settings, or the built-in one.
pub fn load_catalog(settings: &Settings, base: &Path) -> Result<Catalog> {
    match &settings.data.catalog_file {
        Some(file) => Catalog::from_json_file(&resolve_with_base(base, file)),
        None => Ok(Catalog::default()),
    }
}

pub fn load_datasets(settings: &Settings, base: &Path) -> Result<Datasets> {
    DatasetLoader::new().load_dir(&resolve_with_base(base, &settings.data.dataset_dir))
}

/// Ties query analysis, dataset search, newsletter rendering and the wallet
/// capability together.
pub struct Orchestrator<W, R>
where
    W: WalletConnector,
    R: NewsletterRenderer,
{
    settings: Settings,
    catalog: Arc<Catalog>,
    pipeline: QueryPipeline,
    search: DatasetSearch,
    wallet: W,
    renderer: R,
    initialized: AtomicBool,
}

impl<W> Orchestrator<W, HtmlNewsletter>
where
    W: WalletConnector,
{
    /// Load catalog and datasets relative to `base` and render with [`HtmlNewsletter`].
    pub fn from_settings(settings: Settings, base: &Path, wallet: W) -> Result<Self> {
        let catalog = Arc::new(load_catalog(&settings, base)?);
        let datasets = Arc::new(load_datasets(&settings, base)?);
        let renderer = HtmlNewsletter::new(settings.newsletter.clone(), catalog.clone());
        Ok(Self::new(settings, catalog, datasets, wallet, renderer))
    }
}

impl<W, R> Orchestrator<W, R>
where
    W: WalletConnector,
    R: NewsletterRenderer,
{
    pub fn new(settings: Settings, catalog: Arc<Catalog>, datasets: Arc<Datasets>, wallet: W, renderer: R) -> Self {
        let pipeline = QueryPipeline::new(catalog.clone(), &settings);
        Self {
            settings,
            catalog,
            pipeline,
            search: DatasetSearch::new(datasets),
            wallet,
            renderer,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn pipeline(&self) -> &QueryPipeline { &self.pipeline }

    pub fn search(&self) -> &DatasetSearch { &self.search }

    pub fn catalog(&self) -> &Catalog { &self.catalog }

    pub fn wallet(&self) -> &W { &self.wallet }

    /// Check the catalog and mark the orchestrator ready. Topics without a
    /// dataset are logged, not rejected.
    pub fn initialize(&self) -> Result<()> {
        if let Err(e) = self.catalog.validate() {
            warn!("Initialization failed: {}", e);
            return Err(e);
        }
        for topic in Topic::ALL.into_iter().filter(|t| *t != Topic::Default) {
            if self.search.datasets().get(topic).is_empty() {
                warn!("no dataset loaded for {}", topic);
            }
        }
        self.initialized.store(true, Ordering::SeqCst);
        info!(items = self.search.datasets().len(), strategy = ?self.settings.classifier.strategy, "orchestrator initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool { self.initialized.load(Ordering::SeqCst) }

    /// Analyze the query, match the detected topic's items, narrow them with
    /// the active filters, keep at most `search.max_results` and render the
    /// newsletter preview.
    pub fn process_query(&self, raw: &str, active: &ActiveFilters) -> QueryOutcome {
        if !self.is_initialized() {
            let err = Error::Operation("orchestrator not initialized".to_string());
            warn!("Query rejected: {}", err);
            return QueryOutcome::failure(&err);
        }
        let analysis = match self.pipeline.analyze(raw) {
            Ok(a) => a,
            Err(e) => {
                warn!("Query processing failed: {}", e);
                return QueryOutcome::failure(&e);
            }
        };
        let data = self.search.fetch_filtered(analysis.topic, &analysis.normalized, active, self.settings.search.max_results);
        let newsletter = self.renderer.render(analysis.topic, &analysis.normalized, &data, active);
        info!(topic = %analysis.topic, filters = analysis.filters.len(), results = data.len(), "processed query '{}'", analysis.normalized);
        QueryOutcome {
            success: true,
            topic: analysis.topic,
            keywords: analysis.keywords,
            filters: analysis.filters,
            data,
            newsletter,
            error: None,
        }
    }

    pub async fn connect_wallet(&self) -> Result<Account> { self.wallet.connect().await }

    pub async fn disconnect_wallet(&self) -> Result<()> { self.wallet.disconnect().await }

    pub async fn store_preferences(&self, account: &Account, prefs: &Preferences) -> Result<TxHandle> {
        self.wallet.store_preferences(account, prefs).await
    }

    pub async fn get_preferences(&self, account: &Account) -> Option<Preferences> {
        self.wallet.get_preferences(account).await
    }

    pub fn status(&self) -> OrchestratorStatus {
        OrchestratorStatus { initialized: self.is_initialized(), wallet_connected: self.wallet.status().is_connected }
    }
}
