//! SetEstimatedTime / SetItemEstimatedTime command handlers
//!
//! The kitchen can edit ETAs in any status. Minutes are clamped to
//! `1..=MAX_ESTIMATED_MINUTES`; prices are never touched.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, clamp_estimated_minutes};

/// SetEstimatedTime action (order-level ETA)
#[derive(Debug, Clone)]
pub struct SetEstimatedTimeAction {
    pub order_id: String,
    pub minutes: i32,
}

impl CommandHandler for SetEstimatedTimeAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let record = ctx.load_record(&self.order_id)?;
        let minutes = clamp_estimated_minutes(self.minutes);

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor,
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::EstimatedTimeSet,
            EventPayload::EstimatedTimeSet {
                minutes,
                previous: record.estimated_time,
            },
        );

        Ok(vec![event])
    }
}

/// SetItemEstimatedTime action (one item's ETA)
#[derive(Debug, Clone)]
pub struct SetItemEstimatedTimeAction {
    pub order_id: String,
    pub item_index: usize,
    pub minutes: i32,
}

impl CommandHandler for SetItemEstimatedTimeAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let record = ctx.load_record(&self.order_id)?;
        let item = record
            .items
            .get(self.item_index)
            .ok_or_else(|| OrderError::ItemNotFound {
                order_id: self.order_id.clone(),
                index: self.item_index,
            })?;
        let minutes = clamp_estimated_minutes(self.minutes);

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor,
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::ItemEstimatedTimeSet,
            EventPayload::ItemEstimatedTimeSet {
                item_index: self.item_index,
                minutes,
                previous: item.estimated_time,
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::storage::OrderStorage;
    use shared::order::{Actor, OrderItem, OrderRecord, OrderStatus};

    fn create_test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor: Actor::Kitchen,
            timestamp: 1234567890,
        }
    }

    fn create_order(storage: &OrderStorage, txn: &redb::WriteTransaction) {
        let mut record = OrderRecord::new("ORD-1".to_string());
        record.status = OrderStatus::Ready;
        record.estimated_time = Some(15);
        record.items = vec![OrderItem {
            name: "Naan".to_string(),
            quantity: 2,
            price: 40.0,
            notes: None,
            estimated_time: Some(8),
        }];
        storage.store_record(txn, &record).unwrap();
    }

    #[test]
    fn test_set_estimated_time_records_previous() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        create_order(&storage, &txn);
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        // Allowed even after the order is ready
        let action = SetEstimatedTimeAction {
            order_id: "ORD-1".to_string(),
            minutes: 20,
        };
        let events = action.execute(&mut ctx, &create_test_metadata()).unwrap();
        assert_eq!(
            events[0].payload,
            EventPayload::EstimatedTimeSet {
                minutes: 20,
                previous: Some(15),
            }
        );
    }

    #[test]
    fn test_set_estimated_time_clamps() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        create_order(&storage, &txn);
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        for (input, stored) in [(0, 1), (-5, 1), (100_000, 1440)] {
            let action = SetEstimatedTimeAction {
                order_id: "ORD-1".to_string(),
                minutes: input,
            };
            let events = action.execute(&mut ctx, &create_test_metadata()).unwrap();
            match &events[0].payload {
                EventPayload::EstimatedTimeSet { minutes, .. } => assert_eq!(*minutes, stored),
                other => panic!("unexpected payload: {:?}", other),
            }
        }
    }

    #[test]
    fn test_set_item_estimated_time_clamps_negative() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        create_order(&storage, &txn);
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = SetItemEstimatedTimeAction {
            order_id: "ORD-1".to_string(),
            item_index: 0,
            minutes: -5,
        };
        let events = action.execute(&mut ctx, &create_test_metadata()).unwrap();
        assert_eq!(
            events[0].payload,
            EventPayload::ItemEstimatedTimeSet {
                item_index: 0,
                minutes: 1,
                previous: Some(8),
            }
        );
    }

    #[test]
    fn test_set_item_estimated_time_unknown_index() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        create_order(&storage, &txn);
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = SetItemEstimatedTimeAction {
            order_id: "ORD-1".to_string(),
            item_index: 3,
            minutes: 10,
        };
        assert!(matches!(
            action.execute(&mut ctx, &create_test_metadata()),
            Err(OrderError::ItemNotFound { index: 3, .. })
        ));
    }
}
