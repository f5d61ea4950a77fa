//! TransitionStatus command handler
//!
//! Moves an order along the kitchen lifecycle. Only the transitions allowed
//! by [`OrderStatus::can_transition_to`] produce an event.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// TransitionStatus action
#[derive(Debug, Clone)]
pub struct TransitionStatusAction {
    pub order_id: String,
    pub target: OrderStatus,
}

impl CommandHandler for TransitionStatusAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let record = ctx.load_record(&self.order_id)?;
        let from = record.status;

        // Re-applying a transition the order already went through is a no-op
        if from == self.target && self.target.is_transition_target() {
            tracing::debug!(
                order_id = %self.order_id,
                status = %from,
                "Status already applied, nothing to do"
            );
            return Ok(vec![]);
        }

        if !from.can_transition_to(self.target) {
            return Err(OrderError::IllegalTransition {
                from,
                to: self.target,
            });
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor,
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::StatusChanged,
            EventPayload::StatusChanged {
                from,
                to: self.target,
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::storage::OrderStorage;
    use shared::order::{Actor, OrderRecord};

    fn create_test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor: Actor::Kitchen,
            timestamp: 1234567890,
        }
    }

    fn run(
        storage: &OrderStorage,
        status: OrderStatus,
        target: OrderStatus,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let txn = storage.begin_write().unwrap();
        let mut record = OrderRecord::new("ORD-1".to_string());
        record.status = status;
        storage.store_record(&txn, &record).unwrap();

        let mut ctx = CommandContext::new(&txn, storage, 10);
        let action = TransitionStatusAction {
            order_id: "ORD-1".to_string(),
            target,
        };
        action.execute(&mut ctx, &create_test_metadata())
    }

    #[test]
    fn test_legal_transition_emits_event() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let events = run(&storage, OrderStatus::Pending, OrderStatus::Approved).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sequence, 11);
        assert_eq!(events[0].actor, Actor::Kitchen);
        assert_eq!(
            events[0].payload,
            EventPayload::StatusChanged {
                from: OrderStatus::Pending,
                to: OrderStatus::Approved,
            }
        );
    }

    #[test]
    fn test_reject_path() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let events = run(&storage, OrderStatus::Pending, OrderStatus::Served).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_skipping_a_stage_is_illegal() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let err = run(&storage, OrderStatus::Pending, OrderStatus::Cooking).unwrap_err();
        assert!(matches!(
            err,
            OrderError::IllegalTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Cooking
            }
        ));
    }

    #[test]
    fn test_reapplied_target_is_noop() {
        let storage = OrderStorage::open_in_memory().unwrap();
        for status in [
            OrderStatus::Approved,
            OrderStatus::Cooking,
            OrderStatus::Ready,
            OrderStatus::Served,
        ] {
            let events = run(&storage, status, status).unwrap();
            assert!(events.is_empty(), "{status} -> {status}");
        }
    }

    #[test]
    fn test_pending_to_pending_is_illegal() {
        let storage = OrderStorage::open_in_memory().unwrap();
        assert!(matches!(
            run(&storage, OrderStatus::Pending, OrderStatus::Pending),
            Err(OrderError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn test_unknown_order() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = TransitionStatusAction {
            order_id: "ORD-404".to_string(),
            target: OrderStatus::Approved,
        };
        assert!(matches!(
            action.execute(&mut ctx, &create_test_metadata()),
            Err(OrderError::OrderNotFound(_))
        ));
    }
}
