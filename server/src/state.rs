use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use mandi_common::demo::demo_marketplace;
use mandi_common::vendor::{parse_vendors, VendorListing};
use mandi_common::{MarketResult, Marketplace};
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::config::Cli;
use crate::error::AppError;
use crate::items::ItemStore;
use crate::persist::{load_json, write_json};

const DEFAULT_VENDORS: &str = include_str!("../data/vendors.json");

pub struct AppState {
    market: RwLock<Marketplace>,
    pub items: ItemStore,
    pub vendors: Vec<VendorListing>,
    snapshot: Option<PathBuf>,
}

impl AppState {
    pub fn new(
        market: Marketplace,
        items: ItemStore,
        vendors: Vec<VendorListing>,
        snapshot: Option<PathBuf>,
    ) -> Arc<Self> {
        Arc::new(Self {
            market: RwLock::new(market),
            items,
            vendors,
            snapshot,
        })
    }

    /// Build the state from the command line: snapshot or demo catalog,
    /// vendor list, items collection.
    pub fn from_cli(cli: &Cli) -> Result<Arc<Self>, AppError> {
        let snapshot: Option<Marketplace> = match &cli.state_file {
            Some(path) => load_json(path)?,
            None => None,
        };
        let market = match snapshot {
            Some(market) => market,
            None if cli.no_seed => Marketplace::default(),
            None => demo_marketplace(Utc::now())?,
        };

        let vendors = match &cli.vendors_file {
            Some(path) => parse_vendors(&std::fs::read_to_string(path)?)?,
            None => default_vendors()?,
        };

        let items = match &cli.items_file {
            Some(path) => ItemStore::open(path.clone())?,
            None => ItemStore::in_memory(),
        };

        let stats = market.stats();
        tracing::info!(
            products = stats.products,
            orders = stats.orders,
            vendors = vendors.len(),
            "Marketplace ready"
        );
        Ok(Self::new(market, items, vendors, cli.state_file.clone()))
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Marketplace> {
        self.market.read().await
    }

    /// Run one mutation under the write lock and snapshot the result.
    ///
    /// The lock is held until the file is written, so snapshots land in
    /// mutation order. A failed snapshot is logged, not returned: the change
    /// has already happened in memory and the next successful write catches
    /// the file up.
    pub async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Marketplace) -> MarketResult<T>,
    ) -> Result<T, AppError> {
        let mut market = self.market.write().await;
        let out = op(&mut market)?;
        if let Some(path) = &self.snapshot {
            if let Err(e) = write_json(path, &*market).await {
                tracing::warn!("Failed to save snapshot to {}: {e}", path.display());
            }
        }
        Ok(out)
    }
}

pub fn default_vendors() -> Result<Vec<VendorListing>, AppError> {
    Ok(parse_vendors(DEFAULT_VENDORS)?)
}
