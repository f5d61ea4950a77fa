use crate::core::{Config, Result};
use crate::orders::{OrdersManager, SyncService};

/// Server state - shared by every handler
///
/// Cloning is cheap: the ledger handle is reference counted.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | orders | Lifecycle Coordinator over the Order Ledger |
/// | sync | reconnection sync over the same ledger |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub orders: OrdersManager,
    pub sync: SyncService,
}

impl ServerState {
    pub fn new(config: Config, orders: OrdersManager) -> Self {
        let sync = SyncService::new(orders.clone());
        Self {
            config,
            orders,
            sync,
        }
    }

    /// Open the ledger under the configured work directory
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let db_path = config.db_path();
        let orders = OrdersManager::new(&db_path)?;
        tracing::info!(
            db = %db_path.display(),
            orders = orders.order_count()?,
            sequence = orders.get_current_sequence()?,
            "Order ledger opened"
        );
        Ok(Self::new(config.clone(), orders))
    }

    /// Server instance epoch
    pub fn epoch(&self) -> &str {
        self.orders.epoch()
    }
}
