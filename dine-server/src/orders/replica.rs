//! Client-side copy of the Order Ledger
//!
//! Kitchen and tracker devices keep a [`LedgerReplica`] fed by the event
//! stream and by [`SyncResponse`]s. Events go through the same appliers as
//! on the server, so a replica that saw every event holds records identical
//! to the server's (same `state_checksum`).
//!
//! Events are applied at most once per order: anything at or below a
//! record's `last_sequence` is ignored, which makes redelivery harmless.

use std::collections::HashMap;

use super::appliers::apply_event;
use shared::order::{
    EventPayload, KitchenBucket, OrderEvent, OrderRecord, SyncRequest, SyncResponse,
};

#[derive(Debug, Default, Clone)]
pub struct LedgerReplica {
    orders: HashMap<String, OrderRecord>,
    /// Highest sequence applied
    last_sequence: u64,
    /// Epoch of the server the replica last synced with
    epoch: Option<String>,
    needs_full_sync: bool,
}

impl LedgerReplica {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    pub fn epoch(&self) -> Option<&str> {
        self.epoch.as_deref()
    }

    /// Whether the replica must resync from zero
    pub fn needs_full_sync(&self) -> bool {
        self.needs_full_sync
    }

    /// Build the request for the next reconnection
    pub fn create_sync_request(&self) -> SyncRequest {
        let since_sequence = if self.needs_full_sync {
            0
        } else {
            self.last_sequence
        };
        SyncRequest { since_sequence }
    }

    /// Apply one live event
    ///
    /// Returns `true` when the event changed the replica.
    pub fn apply_event(&mut self, event: &OrderEvent) -> bool {
        if event.sequence > self.last_sequence + 1 {
            tracing::debug!(
                expected = self.last_sequence + 1,
                got = event.sequence,
                "Sequence gap detected"
            );
            self.needs_full_sync = true;
        }

        let applied = match self.orders.get_mut(&event.order_id) {
            Some(record) if event.sequence <= record.last_sequence => false,
            Some(record) => {
                apply_event(record, event);
                true
            }
            None if matches!(event.payload, EventPayload::OrderPlaced { .. }) => {
                let mut record = OrderRecord::new(event.order_id.clone());
                apply_event(&mut record, event);
                self.orders.insert(event.order_id.clone(), record);
                true
            }
            None => {
                tracing::warn!(
                    order_id = %event.order_id,
                    sequence = event.sequence,
                    "Event for unknown order, resync required"
                );
                self.needs_full_sync = true;
                false
            }
        };

        self.last_sequence = self.last_sequence.max(event.sequence);
        applied
    }

    /// Apply a sync response
    ///
    /// Returns `false` when an incremental response came from a restarted
    /// server; the replica is cleared and must resync from zero.
    pub fn apply_sync(&mut self, response: SyncResponse) -> bool {
        let epoch_changed = self
            .epoch
            .as_deref()
            .is_some_and(|epoch| epoch != response.server_epoch);

        if response.requires_full_sync {
            self.orders = response
                .orders
                .into_iter()
                .map(|o| (o.order_id.clone(), o))
                .collect();
            self.last_sequence = response.server_sequence;
            self.epoch = Some(response.server_epoch);
            self.needs_full_sync = false;
            return true;
        }

        if epoch_changed && self.last_sequence > 0 {
            tracing::info!(
                server_epoch = %response.server_epoch,
                "Server restarted, replica will resync"
            );
            self.orders.clear();
            self.last_sequence = 0;
            self.epoch = Some(response.server_epoch);
            self.needs_full_sync = true;
            return false;
        }

        for event in &response.events {
            self.apply_event(event);
        }
        self.last_sequence = self.last_sequence.max(response.server_sequence);
        self.epoch = Some(response.server_epoch);
        self.needs_full_sync = false;
        true
    }

    pub fn get(&self, order_id: &str) -> Option<&OrderRecord> {
        self.orders.get(order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders newest first, like the server ledger
    pub fn orders(&self) -> Vec<&OrderRecord> {
        let mut orders: Vec<&OrderRecord> = self.orders.values().collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.order_id.cmp(&a.order_id))
        });
        orders
    }

    pub fn bucket(&self, bucket: KitchenBucket) -> Vec<&OrderRecord> {
        self.orders()
            .into_iter()
            .filter(|o| bucket.contains(o.status))
            .collect()
    }

    /// Pending + approved + cooking
    pub fn active_count(&self) -> usize {
        self.orders.values().filter(|o| o.status.is_active()).count()
    }

    /// Whether the local copy of `server_record` has drifted
    pub fn drifted(&self, server_record: &OrderRecord) -> bool {
        self.orders
            .get(&server_record.order_id)
            .is_none_or(|local| local.state_checksum != server_record.state_checksum)
    }
}
