//! redb-based storage layer for the order ledger
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `events` | `(order_id, sequence)` | `OrderEvent` | Event stream (append-only) |
//! | `orders` | `order_id` | `OrderRecord` | Current record per order |
//! | `active_orders` | `order_id` | `()` | Orders still waiting on the kitchen |
//! | `processed_commands` | `command_id` | `order_id` | Idempotency check |
//! | `sequence_counter` | `"seq"` / `"order_count"` | `u64` | Global sequence + order id counter |
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns, so order ids
//! and sequences are never handed out twice across restarts.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::de::DeserializeOwned;
use shared::order::{OrderEvent, OrderRecord};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const EVENTS: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("events");
const ORDERS: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");
const ACTIVE_ORDERS: TableDefinition<&str, ()> = TableDefinition::new("active_orders");
const PROCESSED_COMMANDS: TableDefinition<&str, &str> = TableDefinition::new("processed_commands");
const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const SEQUENCE_KEY: &str = "seq";
const ORDER_COUNT_KEY: &str = "order_count";

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cannot open order database: {0}")]
    Database(#[from] redb::DatabaseError),
    #[error("cannot start transaction: {0}")]
    Transaction(#[from] redb::TransactionError),
    #[error("cannot open table: {0}")]
    Table(#[from] redb::TableError),
    #[error("disk read/write failed: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("commit failed: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("bad ledger entry: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// The order ledger on disk; cheap to clone
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for OrderStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStorage").finish_non_exhaustive()
    }
}

impl OrderStorage {
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    /// Create missing tables so later read transactions never hit `TableDoesNotExist`
    fn init(db: Database) -> StorageResult<Self> {
        let txn = db.begin_write()?;
        txn.open_table(EVENTS)?;
        txn.open_table(ORDERS)?;
        txn.open_table(ACTIVE_ORDERS)?;
        txn.open_table(PROCESSED_COMMANDS)?;
        {
            let mut counters = txn.open_table(COUNTERS)?;
            if counters.get(SEQUENCE_KEY)?.is_none() {
                counters.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Last sequence handed to an event, 0 on a fresh ledger
    pub fn get_current_sequence(&self) -> StorageResult<u64> {
        let txn = self.db.begin_read()?;
        let counters = txn.open_table(COUNTERS)?;
        Ok(counters.get(SEQUENCE_KEY)?.map_or(0, |v| v.value()))
    }

    pub fn set_sequence(&self, txn: &WriteTransaction, sequence: u64) -> StorageResult<()> {
        let mut table = txn.open_table(COUNTERS)?;
        table.insert(SEQUENCE_KEY, sequence)?;
        Ok(())
    }

    /// Bump the persistent order counter in a transaction of its own
    ///
    /// redb has a single writer, so this must run before `begin_write`.
    pub fn next_order_count(&self) -> StorageResult<u64> {
        let txn = self.db.begin_write()?;
        let next = {
            let mut counters = txn.open_table(COUNTERS)?;
            let next = counters.get(ORDER_COUNT_KEY)?.map_or(0, |v| v.value()) + 1;
            counters.insert(ORDER_COUNT_KEY, next)?;
            next
        };
        txn.commit()?;
        Ok(next)
    }

    /// Order touched by an already-processed command
    pub fn get_processed_command(&self, command_id: &str) -> StorageResult<Option<String>> {
        let txn = self.db.begin_read()?;
        let processed = txn.open_table(PROCESSED_COMMANDS)?;
        Ok(processed.get(command_id)?.map(|v| v.value().to_owned()))
    }

    pub fn get_processed_command_txn(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<Option<String>> {
        let processed = txn.open_table(PROCESSED_COMMANDS)?;
        Ok(processed.get(command_id)?.map(|v| v.value().to_owned()))
    }

    pub fn mark_command_processed(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PROCESSED_COMMANDS)?;
        table.insert(command_id, order_id)?;
        Ok(())
    }

    pub fn store_event(&self, txn: &WriteTransaction, event: &OrderEvent) -> StorageResult<()> {
        let bytes = serde_json::to_vec(event)?;
        txn.open_table(EVENTS)?
            .insert((event.order_id.as_str(), event.sequence), bytes.as_slice())?;
        Ok(())
    }

    /// Event history of one order in sequence order
    pub fn get_events_for_order(&self, order_id: &str) -> StorageResult<Vec<OrderEvent>> {
        let txn = self.db.begin_read()?;
        let events = txn.open_table(EVENTS)?;
        // Keys sort by (order_id, sequence), so the range is already ordered
        events
            .range((order_id, 0u64)..=(order_id, u64::MAX))?
            .map(|entry| decode(entry?.1.value()))
            .collect()
    }

    /// Every event with a sequence above `since_sequence`, ascending
    pub fn get_events_since(&self, since_sequence: u64) -> StorageResult<Vec<OrderEvent>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(EVENTS)?;

        let mut events = Vec::new();
        for entry in table.iter()? {
            let event: OrderEvent = decode(entry?.1.value())?;
            if event.sequence > since_sequence {
                events.push(event);
            }
        }
        events.sort_by_key(|e| e.sequence);
        Ok(events)
    }

    /// Write a record; the active index follows its status
    pub fn store_record(&self, txn: &WriteTransaction, record: &OrderRecord) -> StorageResult<()> {
        let bytes = serde_json::to_vec(record)?;
        txn.open_table(ORDERS)?
            .insert(record.order_id.as_str(), bytes.as_slice())?;

        let mut active = txn.open_table(ACTIVE_ORDERS)?;
        if record.status.is_active() {
            active.insert(record.order_id.as_str(), ())?;
        } else {
            active.remove(record.order_id.as_str())?;
        }
        Ok(())
    }

    pub fn get_record(&self, order_id: &str) -> StorageResult<Option<OrderRecord>> {
        let txn = self.db.begin_read()?;
        let orders = txn.open_table(ORDERS)?;
        orders
            .get(order_id)?
            .map(|v| decode(v.value()))
            .transpose()
    }

    /// Same as [`get_record`](Self::get_record) but sees uncommitted writes of `txn`
    pub fn get_record_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<OrderRecord>> {
        let orders = txn.open_table(ORDERS)?;
        orders
            .get(order_id)?
            .map(|v| decode(v.value()))
            .transpose()
    }

    /// Whole ledger, newest first
    pub fn get_all_records(&self) -> StorageResult<Vec<OrderRecord>> {
        let txn = self.db.begin_read()?;
        let orders = txn.open_table(ORDERS)?;
        let mut records = orders
            .iter()?
            .map(|entry| decode(entry?.1.value()))
            .collect::<StorageResult<Vec<OrderRecord>>>()?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    pub fn count_records(&self) -> StorageResult<u64> {
        use redb::ReadableTableMetadata;

        let txn = self.db.begin_read()?;
        Ok(txn.open_table(ORDERS)?.len()?)
    }

    /// Pending, approved or cooking
    pub fn is_order_active(&self, order_id: &str) -> StorageResult<bool> {
        let txn = self.db.begin_read()?;
        Ok(txn.open_table(ACTIVE_ORDERS)?.get(order_id)?.is_some())
    }

    /// Records the kitchen still has to work on, newest first
    pub fn get_active_records(&self) -> StorageResult<Vec<OrderRecord>> {
        let txn = self.db.begin_read()?;
        let active = txn.open_table(ACTIVE_ORDERS)?;
        let orders = txn.open_table(ORDERS)?;

        let mut records = Vec::new();
        for entry in active.iter()? {
            let (order_id, _) = entry?;
            if let Some(v) = orders.get(order_id.value())? {
                records.push(decode(v.value())?);
            }
        }

        sort_newest_first(&mut records);
        Ok(records)
    }
}

/// Newest first; ties broken by the larger order id
fn sort_newest_first(records: &mut [OrderRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then(b.order_id.cmp(&a.order_id))
    });
}
