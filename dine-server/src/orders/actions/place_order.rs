//! PlaceOrder command handler
//!
//! Turns a cart snapshot into a new pending order. This is the only place
//! that writes prices and item snapshots; every later event leaves them alone.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::money::compute_totals;
use shared::order::{
    CommandErrorCode, EventPayload, OrderEvent, OrderEventType, OrderItem, OrderLineInput,
    PaymentMethod,
};

/// PlaceOrder action
///
/// `order_id` is allocated by the manager before the transaction opens.
#[derive(Debug, Clone)]
pub struct PlaceOrderAction {
    pub order_id: String,
    pub table_id: Option<String>,
    pub customer_name: Option<String>,
    pub payment_method: PaymentMethod,
    pub lines: Vec<OrderLineInput>,
}

impl PlaceOrderAction {
    /// Only what the lifecycle itself forbids; size limits belong to the HTTP layer
    fn validate(&self) -> Result<(), OrderError> {
        if self.lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        if self.table_id.as_ref().is_some_and(|t| t.trim().is_empty()) {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InvalidOperation,
                "table_id must not be blank".to_string(),
            ));
        }
        for line in &self.lines {
            // A cart line always holds at least one unit
            if line.quantity < 1 {
                return Err(OrderError::InvalidAmount(format!(
                    "quantity of {} must be positive",
                    line.name
                )));
            }
            if !line.price.is_finite() || line.price < 0.0 {
                return Err(OrderError::InvalidAmount(format!(
                    "price of {} must be a non-negative number",
                    line.name
                )));
            }
        }
        Ok(())
    }
}

impl CommandHandler for PlaceOrderAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Validate input
        self.validate()?;

        // 2. Order ids are never reused
        if ctx.record_exists(&self.order_id)? {
            return Err(OrderError::InvalidOperation(
                CommandErrorCode::InternalError,
                format!("Order id already in use: {}", self.order_id),
            ));
        }

        // 3. Snapshot items and fix the totals
        let items: Vec<OrderItem> = self.lines.iter().map(OrderItem::from).collect();
        let totals = compute_totals(self.lines.iter().map(|l| (l.price, l.quantity)));

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor,
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderPlaced,
            EventPayload::OrderPlaced {
                table_id: self.table_id.as_ref().map(|t| t.trim().to_string()),
                customer_name: self
                    .customer_name
                    .as_ref()
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
                payment_method: self.payment_method,
                items,
                subtotal: totals.subtotal,
                tax: totals.tax,
                total: totals.total,
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::storage::OrderStorage;
    use shared::order::Actor;

    fn create_test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor: Actor::Customer,
            timestamp: 1234567890,
        }
    }

    fn line(id: &str, name: &str, price: f64, quantity: i32) -> OrderLineInput {
        OrderLineInput {
            menu_item_id: id.to_string(),
            name: name.to_string(),
            price,
            quantity,
            notes: None,
        }
    }

    fn action(lines: Vec<OrderLineInput>) -> PlaceOrderAction {
        PlaceOrderAction {
            order_id: "ORD-1".to_string(),
            table_id: Some("12".to_string()),
            customer_name: None,
            payment_method: PaymentMethod::Online,
            lines,
        }
    }

    #[test]
    fn test_place_order_fixes_totals() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = action(vec![
            line("naan", "Naan", 40.0, 2),
            line("bc", "Butter Chicken", 350.0, 1),
        ]);
        let events = action.execute(&mut ctx, &create_test_metadata()).unwrap();

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.sequence, 1);
        assert_eq!(event.actor, Actor::Customer);
        assert_eq!(event.client_timestamp, Some(1234567890));
        match &event.payload {
            EventPayload::OrderPlaced {
                items,
                subtotal,
                tax,
                total,
                table_id,
                ..
            } => {
                assert_eq!(items.len(), 2);
                assert_eq!(*subtotal, 430.0);
                assert_eq!(*tax, 21.5);
                assert_eq!(*total, 451.5);
                assert_eq!(table_id.as_deref(), Some("12"));
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_place_order_empty_cart() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = action(vec![]).execute(&mut ctx, &create_test_metadata());
        assert!(matches!(result, Err(OrderError::EmptyCart)));
        // No sequence was consumed
        assert_eq!(ctx.next_sequence(), 1);
    }

    #[test]
    fn test_place_order_rejects_bad_lines() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let metadata = create_test_metadata();

        let zero_qty = action(vec![line("naan", "Naan", 40.0, 0)]);
        assert!(matches!(
            zero_qty.execute(&mut ctx, &metadata),
            Err(OrderError::InvalidAmount(_))
        ));

        let negative_price = action(vec![line("naan", "Naan", -40.0, 1)]);
        assert!(matches!(
            negative_price.execute(&mut ctx, &metadata),
            Err(OrderError::InvalidAmount(_))
        ));

        let mut blank_table = action(vec![line("naan", "Naan", 40.0, 1)]);
        blank_table.table_id = Some("  ".to_string());
        assert!(blank_table.execute(&mut ctx, &metadata).is_err());
    }

    #[test]
    fn test_place_order_has_no_quantity_ceiling() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let events = action(vec![line("naan", "", 40.0, 10_000)])
            .execute(&mut ctx, &create_test_metadata())
            .unwrap();
        match &events[0].payload {
            EventPayload::OrderPlaced { items, total, .. } => {
                assert_eq!(items[0].quantity, 10_000);
                assert_eq!(*total, 420_000.0);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_place_order_rejects_reused_id() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage
            .store_record(&txn, &shared::order::OrderRecord::new("ORD-1".to_string()))
            .unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result =
            action(vec![line("naan", "Naan", 40.0, 1)]).execute(&mut ctx, &create_test_metadata());
        assert!(matches!(result, Err(OrderError::InvalidOperation(..))));
    }
}
