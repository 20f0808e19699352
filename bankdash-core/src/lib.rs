//! Bankdash Core - logic behind a mock banking and crypto dashboard
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Account, Asset, rate tables, forms, state)
//! - **ports**: Trait definitions for external dependencies (StateStore, Verifier, TransactionGateway)
//! - **services**: Business logic orchestration (conversion, validation, transfers, ...)
//! - **adapters**: Concrete implementations (JSON state file, simulated gateway, demo data)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use adapters::demo;
use adapters::simulated::SimulatedGateway;
use adapters::state_store::JsonStateStore;
use config::Config;
use ports::{StateStore, TransactionGateway};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{Account, AppState, Asset, ExchangeRateTable, Receipt};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for bankdash operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration, the state store, the gateway and all services.
pub struct BankdashContext {
    pub data_dir: PathBuf,
    pub config: Config,
    pub store: Arc<dyn StateStore>,
    pub gateway: Arc<dyn TransactionGateway>,
    pub resolver: Arc<RequirementResolver>,
    pub auth_service: AuthService,
    pub transfer_service: TransferService,
    pub swap_service: SwapService,
    pub loan_service: LoanService,
    pub wallet_service: WalletService,
}

impl BankdashContext {
    /// Context backed by files in `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let config = Config::load(data_dir)?;
        let store: Arc<dyn StateStore> = Arc::new(JsonStateStore::new(data_dir));
        let gateway: Arc<dyn TransactionGateway> = Arc::new(SimulatedGateway::new(config.simulated_delay));
        Ok(Self::with_parts(data_dir, config, store, gateway))
    }

    /// Context over explicit parts, for tests and embedding
    pub fn with_parts(
        data_dir: &Path,
        config: Config,
        store: Arc<dyn StateStore>,
        gateway: Arc<dyn TransactionGateway>,
    ) -> Self {
        let resolver = Arc::new(RequirementResolver::new(demo::demo_countries()));

        let auth_service = AuthService::new(Arc::clone(&store), &config);
        let transfer_service = TransferService::new(
            demo::demo_accounts(),
            demo::demo_beneficiaries(),
            Arc::clone(&resolver),
            Arc::clone(&gateway),
        );
        let swap_service = SwapService::new(demo::demo_assets(), demo::swap_rates(), Arc::clone(&gateway));
        let loan_service = LoanService::new(demo::demo_loan_types(), Arc::clone(&gateway));
        let wallet_service = WalletService::new(data_dir.to_path_buf(), demo::demo_assets());

        Self {
            data_dir: data_dir.to_path_buf(),
            config,
            store,
            gateway,
            resolver,
            auth_service,
            transfer_service,
            swap_service,
            loan_service,
            wallet_service,
        }
    }
}
