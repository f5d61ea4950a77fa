//! OrdersManager - the Lifecycle Coordinator
//!
//! This module handles:
//! - Command validation and processing
//! - Event generation with global sequence numbers
//! - Persistence to redb (transactional)
//! - Record updates
//! - Event broadcasting
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Allocate order id (PlaceOrder only)
//!     ├─ 3. Begin write transaction
//!     ├─ 4. Convert command to action and execute
//!     ├─ 5. Apply events to records via EventApplier
//!     ├─ 6. Persist events and records
//!     ├─ 7. Mark command processed
//!     ├─ 8. Commit transaction
//!     ├─ 9. Broadcast event(s)
//!     └─ 10. Return response
//! ```
//!
//! Commands are processed one at a time: redb admits a single writer, so two
//! kitchen devices racing on the same order are serialized and the later
//! command wins.

mod error;
pub use error::*;

use super::actions::CommandAction;
use super::appliers::apply_event;
use super::storage::{OrderStorage, StorageError};
use super::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use chrono::Utc;
use shared::order::{
    Actor, CommandResponse, EventPayload, KitchenBucket, OrderCommand, OrderCommandPayload, OrderEvent,
    OrderRecord, OrderStatus, PaymentMethod, filter_bucket,
};
use shared::session::Cart;
use std::path::Path;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 65536;

/// OrdersManager for command processing
///
/// The `epoch` field is a unique identifier generated on each startup.
/// Clients use it to detect server restarts and trigger full resync.
#[derive(Clone)]
pub struct OrdersManager {
    storage: OrderStorage,
    event_tx: broadcast::Sender<OrderEvent>,
    /// Server instance epoch - unique ID generated on startup
    epoch: String,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &"<OrderStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl OrdersManager {
    /// Create a new OrdersManager with the given database path
    pub fn new(db_path: impl AsRef<Path>) -> ManagerResult<Self> {
        let storage = OrderStorage::open(db_path)?;
        Ok(Self::with_storage(storage))
    }

    /// Create an OrdersManager over existing storage
    pub fn with_storage(storage: OrderStorage) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, "OrdersManager started with new epoch");
        Self {
            storage,
            event_tx,
            epoch,
        }
    }

    /// Get the server epoch (unique ID for this instance)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to committed events
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    /// Generate the next order id (crash-safe via redb)
    ///
    /// `ORD-<yyyymmdd><10000 + count>`; the counter never resets, so ids are
    /// unique across days and restarts.
    fn next_order_id(&self) -> ManagerResult<String> {
        let count = self.storage.next_order_count()?;
        let date_str = Utc::now().format("%Y%m%d").to_string();
        Ok(format!("ORD-{}{}", date_str, 10000 + count))
    }

    // ========== Command Protocol ==========

    /// Execute a command and return the response
    pub fn execute_command(&self, cmd: OrderCommand) -> CommandResponse {
        let command_id = cmd.command_id.clone();
        match self.dispatch(cmd) {
            Ok((response, _)) => response,
            Err(err) => CommandResponse::error(command_id, err.into()),
        }
    }

    /// Process a command and broadcast its events after commit
    fn dispatch(&self, cmd: OrderCommand) -> ManagerResult<(CommandResponse, Vec<OrderEvent>)> {
        let (response, events) = self.process_command(cmd)?;
        for event in &events {
            if self.event_tx.send(event.clone()).is_err() {
                tracing::debug!("Event broadcast skipped: no active receivers");
                break;
            }
        }
        Ok((response, events))
    }

    /// Process command and return response with events
    fn process_command(
        &self,
        cmd: OrderCommand,
    ) -> ManagerResult<(CommandResponse, Vec<OrderEvent>)> {
        tracing::debug!(command_id = %cmd.command_id, actor = cmd.actor.as_str(), payload = ?cmd.payload, "Processing command");

        // 1. Idempotency check (before transaction)
        if let Some(order_id) = self.storage.get_processed_command(&cmd.command_id)? {
            tracing::warn!(command_id = %cmd.command_id, order_id = %order_id, "Duplicate command");
            return Ok((
                CommandResponse::duplicate(cmd.command_id, Some(order_id)),
                vec![],
            ));
        }

        // 2. Empty checkout fails before an order id is spent
        if let OrderCommandPayload::PlaceOrder { lines, .. } = &cmd.payload
            && lines.is_empty()
        {
            return Err(ManagerError::EmptyCart);
        }

        // 3. Pre-generate the order id (BEFORE transaction: redb has no nested writers)
        let new_order_id = match &cmd.payload {
            OrderCommandPayload::PlaceOrder { .. } => {
                let order_id = self.next_order_id()?;
                tracing::debug!(order_id = %order_id, "Pre-generated order id");
                Some(order_id)
            }
            _ => None,
        };

        // 4. Begin write transaction
        let txn = self.storage.begin_write()?;

        // Double-check idempotency within transaction
        if let Some(order_id) = self
            .storage
            .get_processed_command_txn(&txn, &cmd.command_id)?
        {
            return Ok((
                CommandResponse::duplicate(cmd.command_id, Some(order_id)),
                vec![],
            ));
        }

        // 5. Create context and metadata
        let current_sequence = self.storage.get_current_sequence()?;
        let mut ctx = CommandContext::new(&txn, &self.storage, current_sequence);
        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            actor: cmd.actor,
            timestamp: cmd.timestamp,
        };

        // 6. Convert to action and execute
        let action = CommandAction::from_command(&cmd, new_order_id.clone())?;
        let events = action.execute(&mut ctx, &metadata).map_err(|err| {
            tracing::warn!(command_id = %cmd.command_id, error = %err, "Command rejected");
            ManagerError::from(err)
        })?;

        // 7. Apply events to records
        for event in &events {
            let mut record = base_record(&ctx, event)?;
            apply_event(&mut record, event);
            ctx.save_record(record);
        }

        // 8. Persist events and records
        for event in &events {
            self.storage.store_event(&txn, event)?;
        }
        for record in ctx.modified_records() {
            self.storage.store_record(&txn, record)?;
        }

        // 9. Update sequence counter
        let max_sequence = events
            .iter()
            .map(|e| e.sequence)
            .max()
            .unwrap_or(current_sequence);
        if max_sequence > current_sequence {
            self.storage.set_sequence(&txn, max_sequence)?;
        }

        // 10. Mark command processed and commit
        let order_id = new_order_id
            .or_else(|| cmd.target_order_id().map(str::to_string))
            .unwrap_or_default();
        self.storage
            .mark_command_processed(&txn, &cmd.command_id, &order_id)?;
        txn.commit().map_err(StorageError::from)?;

        for event in &events {
            match &event.payload {
                EventPayload::OrderPlaced { total, .. } => {
                    tracing::info!(order_id = %event.order_id, total = *total, "Order placed");
                }
                EventPayload::StatusChanged { from, to } => {
                    tracing::info!(order_id = %event.order_id, from = %from, to = %to, "Order status changed");
                }
                _ => {}
            }
        }
        tracing::debug!(command_id = %cmd.command_id, order_id = %order_id, event_count = events.len(), "Command processed successfully");
        Ok((CommandResponse::success(cmd.command_id, Some(order_id)), events))
    }

    /// Run a command and return the record it produced or touched
    pub fn submit(&self, cmd: OrderCommand) -> ManagerResult<OrderRecord> {
        let (response, _) = self.dispatch(cmd)?;
        let order_id = response
            .order_id
            .ok_or_else(|| ManagerError::Internal("command touched no order".to_string()))?;
        self.storage
            .get_record(&order_id)?
            .ok_or(ManagerError::OrderNotFound(order_id))
    }

    // ========== Coordinator Operations ==========

    /// Checkout: create a pending order from the cart
    ///
    /// Fails with [`ManagerError::EmptyCart`] when the cart holds no items;
    /// the ledger is left untouched.
    pub fn create_order(
        &self,
        cart: &Cart,
        table_id: Option<&str>,
        payment_method: PaymentMethod,
    ) -> ManagerResult<OrderRecord> {
        if cart.total_item_count() <= 0 {
            return Err(ManagerError::EmptyCart);
        }
        self.submit(OrderCommand::new(
            Actor::Customer,
            OrderCommandPayload::PlaceOrder {
                table_id: table_id.map(str::to_string),
                customer_name: None,
                payment_method,
                lines: cart.to_order_lines(),
            },
        ))
    }

    /// Move an order to `target`
    ///
    /// Re-applying a status the order already reached returns it unchanged.
    pub fn transition_status(
        &self,
        order_id: &str,
        target: OrderStatus,
    ) -> ManagerResult<OrderRecord> {
        self.submit(OrderCommand::new(
            Actor::Kitchen,
            OrderCommandPayload::TransitionStatus {
                order_id: order_id.to_string(),
                target,
            },
        ))
    }

    /// Set the order-level ETA (minutes below 1 clamp to 1)
    pub fn set_estimated_time(&self, order_id: &str, minutes: i32) -> ManagerResult<OrderRecord> {
        self.submit(OrderCommand::new(
            Actor::Kitchen,
            OrderCommandPayload::SetEstimatedTime {
                order_id: order_id.to_string(),
                minutes,
            },
        ))
    }

    /// Set one item's ETA (minutes below 1 clamp to 1)
    pub fn set_item_estimated_time(
        &self,
        order_id: &str,
        item_index: usize,
        minutes: i32,
    ) -> ManagerResult<OrderRecord> {
        self.submit(OrderCommand::new(
            Actor::Kitchen,
            OrderCommandPayload::SetItemEstimatedTime {
                order_id: order_id.to_string(),
                item_index,
                minutes,
            },
        ))
    }

    // ========== Public Query Methods ==========

    /// Get a record by order ID
    pub fn get_order(&self, order_id: &str) -> ManagerResult<Option<OrderRecord>> {
        Ok(self.storage.get_record(order_id)?)
    }

    /// Get a record by order ID, failing if it does not exist
    pub fn require_order(&self, order_id: &str) -> ManagerResult<OrderRecord> {
        self.get_order(order_id)?
            .ok_or_else(|| ManagerError::OrderNotFound(order_id.to_string()))
    }

    /// The whole ledger, newest first
    pub fn list_orders(&self) -> ManagerResult<Vec<OrderRecord>> {
        Ok(self.storage.get_all_records()?)
    }

    /// Ledger entries in one kitchen bucket, newest first
    pub fn list_bucket(&self, bucket: KitchenBucket) -> ManagerResult<Vec<OrderRecord>> {
        let orders = self.storage.get_all_records()?;
        Ok(filter_bucket(&orders, bucket).cloned().collect())
    }

    /// Orders still waiting on the kitchen (pending, approved, cooking)
    pub fn get_active_orders(&self) -> ManagerResult<Vec<OrderRecord>> {
        Ok(self.storage.get_active_records()?)
    }

    /// Number of orders in the ledger
    pub fn order_count(&self) -> ManagerResult<u64> {
        Ok(self.storage.count_records()?)
    }

    /// Get current sequence number
    pub fn get_current_sequence(&self) -> ManagerResult<u64> {
        Ok(self.storage.get_current_sequence()?)
    }

    /// Get events since a given sequence
    pub fn get_events_since(&self, since_sequence: u64) -> ManagerResult<Vec<OrderEvent>> {
        Ok(self.storage.get_events_since(since_sequence)?)
    }

    /// Get all events for a specific order
    pub fn get_events_for_order(&self, order_id: &str) -> ManagerResult<Vec<OrderEvent>> {
        Ok(self.storage.get_events_for_order(order_id)?)
    }

    /// Rebuild a record by replaying its events
    pub fn rebuild_record(&self, order_id: &str) -> ManagerResult<OrderRecord> {
        let events = self.storage.get_events_for_order(order_id)?;
        if events.is_empty() {
            return Err(ManagerError::OrderNotFound(order_id.to_string()));
        }

        let mut record = OrderRecord::new(order_id.to_string());
        for event in &events {
            apply_event(&mut record, event);
        }

        Ok(record)
    }

    /// Compare the stored record with one rebuilt from events
    ///
    /// Returns `false` when they diverge (drift).
    pub fn verify_record(&self, order_id: &str) -> ManagerResult<bool> {
        let stored = self.require_order(order_id)?;
        let rebuilt = self.rebuild_record(order_id)?;

        let consistent = stored.verify_checksum() && stored == rebuilt;
        if !consistent {
            tracing::warn!(
                order_id = %order_id,
                stored_checksum = %stored.state_checksum,
                rebuilt_checksum = %rebuilt.state_checksum,
                "Order record drift detected"
            );
        }
        Ok(consistent)
    }
}

/// Record an event is folded into
///
/// Only `OrderPlaced` may start from a blank record; every other failure,
/// storage errors included, aborts the transaction.
fn base_record(ctx: &CommandContext<'_>, event: &OrderEvent) -> Result<OrderRecord, OrderError> {
    match ctx.load_record(&event.order_id) {
        Err(OrderError::OrderNotFound(_))
            if matches!(event.payload, EventPayload::OrderPlaced { .. }) =>
        {
            Ok(OrderRecord::new(event.order_id.clone()))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests;
