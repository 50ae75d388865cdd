//! discovery-wallet
//!
//! `WalletConnector` implementations. Only the in-process mock exists; a
//! chain-backed connector can implement the same trait without touching the
//! query or search crates.
pub mod mock;

pub use mock::MockWallet;
