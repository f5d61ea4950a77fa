//! Synchronization API for reconnecting clients
//!
//! A kitchen or tracker device that lost its event stream reconnects with
//! the last sequence it applied and catches up.
//!
//! # Protocol
//!
//! 1. Client reconnects with last known sequence
//! 2. Server calculates gap
//! 3. If gap is small, return incremental events
//! 4. If gap is large, return the whole ledger (full sync)
//!
//! Every response carries the server epoch. A changed epoch means the
//! server restarted and the client should resync from zero.

use super::manager::{ManagerError, OrdersManager};
use shared::order::{SyncRequest, SyncResponse};

/// Maximum events to return in incremental sync
/// If gap exceeds this, full sync is returned instead
pub const MAX_INCREMENTAL_EVENTS: usize = 1000;

/// Sync service for handling reconnection
#[derive(Debug, Clone)]
pub struct SyncService {
    manager: OrdersManager,
}

impl SyncService {
    pub fn new(manager: OrdersManager) -> Self {
        Self { manager }
    }

    /// Handle a sync request
    pub fn sync(&self, request: SyncRequest) -> Result<SyncResponse, ManagerError> {
        let server_sequence = self.manager.get_current_sequence()?;
        let epoch = self.manager.epoch().to_string();

        // Client is up to date
        if request.since_sequence >= server_sequence {
            return Ok(SyncResponse::incremental(vec![], server_sequence, epoch));
        }

        let gap = server_sequence - request.since_sequence;
        if gap > MAX_INCREMENTAL_EVENTS as u64 {
            tracing::debug!(
                since = request.since_sequence,
                server_sequence,
                "Sync gap too large, sending full ledger"
            );
            let orders = self.manager.list_orders()?;
            return Ok(SyncResponse::full_sync(orders, server_sequence, epoch));
        }

        let events = self.manager.get_events_since(request.since_sequence)?;
        Ok(SyncResponse::incremental(events, server_sequence, epoch))
    }

    /// Verify that a stored record matches its event stream
    pub fn verify_record(&self, order_id: &str) -> Result<bool, ManagerError> {
        self.manager.verify_record(order_id)
    }

    /// Verify every active order
    pub fn verify_active_records(&self) -> Result<Vec<(String, bool)>, ManagerError> {
        let active_orders = self.manager.get_active_orders()?;
        let mut results = Vec::with_capacity(active_orders.len());

        for order in active_orders {
            let is_valid = self.manager.verify_record(&order.order_id)?;
            results.push((order.order_id, is_valid));
        }

        Ok(results)
    }
}
