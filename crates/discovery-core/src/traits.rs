use std::future::Future;

use crate::error::Result;
use crate::types::{Account, ActiveFilters, ConnectionStatus, DataItem, Preferences, Topic, TxHandle};

/// Wallet plus on-chain preference storage, consumed as a capability so a
/// real backend can replace the mock without touching the pipeline.
pub trait WalletConnector: Send + Sync {
    fn connect(&self) -> impl Future<Output = Result<Account>> + Send;
    fn disconnect(&self) -> impl Future<Output = Result<()>> + Send;
    fn store_preferences(
        &self,
        account: &Account,
        prefs: &Preferences,
    ) -> impl Future<Output = Result<TxHandle>> + Send;
    fn get_preferences(&self, account: &Account) -> impl Future<Output = Option<Preferences>> + Send;
    fn status(&self) -> ConnectionStatus;
}

/// Renders matched items into a newsletter document.
pub trait NewsletterRenderer: Send + Sync {
    fn render(&self, topic: Topic, query: &str, items: &[DataItem], active: &ActiveFilters) -> String;
}
