//! Command handler and event applier seams
//!
//! Actions turn a command into events inside a [`CommandContext`]; appliers
//! fold events into an [`OrderRecord`]. Appliers are pure and shared by the
//! server and by [`super::replica::LedgerReplica`].

use enum_dispatch::enum_dispatch;
use redb::WriteTransaction;
use shared::order::{Actor, CommandErrorCode, OrderEvent, OrderRecord, OrderStatus};
use std::collections::HashMap;
use thiserror::Error;

// `#[enum_dispatch]` expands the `EventApplier for EventAction` impl here
use super::appliers::{
    EstimatedTimeSetApplier, EventAction, ItemEstimatedTimeSetApplier, OrderPlacedApplier,
    StatusChangedApplier,
};
use super::storage::{OrderStorage, StorageError};

/// Domain failures raised by actions
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Item {index} not found on order {order_id}")]
    ItemNotFound { order_id: String, index: usize },

    #[error("Cannot place an order with an empty cart")]
    EmptyCart,

    #[error("Cannot move order from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{1}")]
    InvalidOperation(CommandErrorCode, String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for OrderError {
    fn from(err: StorageError) -> Self {
        OrderError::Storage(err.to_string())
    }
}

/// Who sent the command and when
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub actor: Actor,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
}

/// Per-command working set
///
/// Reads go through the write transaction so an action sees the records as
/// they will be committed. Records touched by appliers are buffered here and
/// written back by the manager.
pub struct CommandContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a OrderStorage,
    records: HashMap<String, OrderRecord>,
    sequence: u64,
}

impl<'a> CommandContext<'a> {
    pub fn new(txn: &'a WriteTransaction, storage: &'a OrderStorage, current_sequence: u64) -> Self {
        Self {
            txn,
            storage,
            records: HashMap::new(),
            sequence: current_sequence,
        }
    }

    /// Load a record, preferring the copy modified in this command
    pub fn load_record(&self, order_id: &str) -> Result<OrderRecord, OrderError> {
        if let Some(record) = self.records.get(order_id) {
            return Ok(record.clone());
        }
        self.storage
            .get_record_txn(self.txn, order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// True if a record with this id exists
    pub fn record_exists(&self, order_id: &str) -> Result<bool, OrderError> {
        if self.records.contains_key(order_id) {
            return Ok(true);
        }
        Ok(self.storage.get_record_txn(self.txn, order_id)?.is_some())
    }

    pub fn save_record(&mut self, record: OrderRecord) {
        self.records.insert(record.order_id.clone(), record);
    }

    pub fn modified_records(&self) -> impl Iterator<Item = &OrderRecord> {
        self.records.values()
    }

    /// Allocate the next global sequence number
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

/// Turns one command into events
pub trait CommandHandler {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError>;
}

/// Folds one event into a record
///
/// Implementations must be pure: the same event applied to the same record
/// always yields the same result.
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, record: &mut OrderRecord, event: &OrderEvent);
}
