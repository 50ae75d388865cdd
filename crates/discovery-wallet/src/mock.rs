use chrono::Utc;
use std::collections::HashMap;
use std::hash::Hasher;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{info, warn};
use twox_hash::XxHash64;

use discovery_core::config::WalletSettings;
use discovery_core::error::{Error, Result};
use discovery_core::traits::WalletConnector;
use discovery_core::types::{Account, ConnectionStatus, Preferences, Topic, TxHandle};

/// Well-known development address; stands in for the extension's first account.
const MOCK_ADDRESS: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

#[derive(Default)]
struct WalletState {
    account: Option<Account>,
    stored: HashMap<String, Preferences>,
}

/// In-process stand-in for a browser wallet plus chain storage.
///
/// Every call sleeps for `mock_delay_ms` to mimic network latency. Stored
/// preferences live in memory for the lifetime of the value.
pub struct MockWallet {
    settings: WalletSettings,
    extension_available: bool,
    accounts: Vec<Account>,
    state: RwLock<WalletState>,
}

impl MockWallet {
    pub fn new(settings: WalletSettings) -> Self {
        let account = Account {
            address: MOCK_ADDRESS.to_string(),
            name: Some("Mock Account".to_string()),
            source: "mock-extension".to_string(),
        };
        Self { settings, extension_available: true, accounts: vec![account], state: RwLock::new(WalletState::default()) }
    }

    /// Simulate a browser without the wallet extension installed.
    pub fn without_extension(mut self) -> Self {
        self.extension_available = false;
        self
    }

    pub fn with_accounts(mut self, accounts: Vec<Account>) -> Self {
        self.accounts = accounts;
        self
    }

    /// What a freshly connected account reads before storing anything.
    pub fn default_preferences() -> Preferences {
        Preferences { theme: "dark".to_string(), topics: vec![Topic::Movies], filters: Default::default() }
    }

    async fn simulate_delay(&self) {
        if self.settings.mock_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settings.mock_delay_ms)).await;
        }
    }

    fn connected_account(&self) -> Option<Account> {
        self.state.read().ok().and_then(|s| s.account.clone())
    }

    fn tx_handle(serialized: &str) -> TxHandle {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(serialized.as_bytes());
        TxHandle(format!("mock-tx-{}-{:016x}", Utc::now().timestamp_millis(), hasher.finish()))
    }
}

impl WalletConnector for MockWallet {
    async fn connect(&self) -> Result<Account> {
        self.simulate_delay().await;
        if !self.extension_available {
            warn!("Wallet connection failed: no wallet extension found");
            return Err(Error::Wallet("No wallet extension found".to_string()));
        }
        let Some(account) = self.accounts.first().cloned() else {
            warn!("Wallet connection failed: no accounts in extension");
            return Err(Error::Wallet("No accounts found in extension".to_string()));
        };
        {
            let mut state = self.state.write().map_err(|_| Error::Wallet("wallet state poisoned".to_string()))?;
            state.account = Some(account.clone());
        }
        info!(address = %account.address, network = %self.settings.network, endpoint = %self.settings.ws_provider, "wallet connected");
        Ok(account)
    }

    async fn disconnect(&self) -> Result<()> {
        {
            let mut state = self.state.write().map_err(|_| Error::Wallet("wallet state poisoned".to_string()))?;
            state.account = None;
        }
        info!("wallet disconnected");
        Ok(())
    }

    async fn store_preferences(&self, account: &Account, prefs: &Preferences) -> Result<TxHandle> {
        if self.connected_account().is_none() {
            warn!("Store preferences failed: wallet not connected");
            return Err(Error::NotConnected);
        }
        let serialized = serde_json::to_string(prefs).map_err(|e| Error::Operation(e.to_string()))?;
        self.simulate_delay().await;
        let tx = Self::tx_handle(&serialized);
        {
            let mut state = self.state.write().map_err(|_| Error::Wallet("wallet state poisoned".to_string()))?;
            state.stored.insert(account.address.clone(), prefs.clone());
        }
        info!(address = %account.address, key = %self.settings.storage_key, bytes = serialized.len(), %tx, "stored preferences");
        Ok(tx)
    }

    async fn get_preferences(&self, account: &Account) -> Option<Preferences> {
        self.connected_account()?;
        self.simulate_delay().await;
        let stored = self.state.read().ok().and_then(|s| s.stored.get(&account.address).cloned());
        Some(stored.unwrap_or_else(Self::default_preferences))
    }

    fn status(&self) -> ConnectionStatus {
        let account = self.connected_account();
        ConnectionStatus { is_connected: account.is_some(), account }
    }
}
