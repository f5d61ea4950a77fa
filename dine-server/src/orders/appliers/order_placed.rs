//! OrderPlaced event applier
//!
//! Fills an empty record from the checkout snapshot. Totals are copied from
//! the event, never recomputed.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderRecord, OrderStatus};

/// OrderPlaced applier
pub struct OrderPlacedApplier;

impl EventApplier for OrderPlacedApplier {
    fn apply(&self, record: &mut OrderRecord, event: &OrderEvent) {
        if let EventPayload::OrderPlaced {
            table_id,
            customer_name,
            payment_method,
            items,
            subtotal,
            tax,
            total,
        } = &event.payload
        {
            record.table_id = table_id.clone();
            record.customer_name = customer_name.clone();
            record.payment_method = *payment_method;
            record.items = items.clone();
            record.subtotal = *subtotal;
            record.tax = *tax;
            record.total = *total;
            record.status = OrderStatus::Pending;
            record.created_at = event.timestamp;
            record.estimated_time = None;

            super::finish(record, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{Actor, OrderEventType, OrderItem, PaymentMethod};

    fn create_order_placed_event(order_id: &str, seq: u64) -> OrderEvent {
        OrderEvent::new(
            seq,
            order_id.to_string(),
            Actor::Customer,
            "cmd-1".to_string(),
            Some(1234567890),
            OrderEventType::OrderPlaced,
            EventPayload::OrderPlaced {
                table_id: Some("12".to_string()),
                customer_name: Some("Asha".to_string()),
                payment_method: PaymentMethod::Cash,
                items: vec![OrderItem {
                    name: "Naan".to_string(),
                    quantity: 2,
                    price: 40.0,
                    notes: Some("crispy".to_string()),
                    estimated_time: None,
                }],
                subtotal: 80.0,
                tax: 4.0,
                total: 84.0,
            },
        )
    }

    #[test]
    fn test_order_placed_fills_record() {
        let mut record = OrderRecord::new("ORD-1".to_string());
        let event = create_order_placed_event("ORD-1", 1);

        OrderPlacedApplier.apply(&mut record, &event);

        assert_eq!(record.table_id.as_deref(), Some("12"));
        assert_eq!(record.customer_name.as_deref(), Some("Asha"));
        assert_eq!(record.payment_method, PaymentMethod::Cash);
        assert_eq!(record.item_count(), 2);
        assert_eq!(record.total, 84.0);
        assert_eq!(record.status, OrderStatus::Pending);
        assert_eq!(record.created_at, event.timestamp);
        assert_eq!(record.last_sequence, 1);
        assert!(record.verify_checksum());
    }

    #[test]
    fn test_order_placed_is_deterministic() {
        let event = create_order_placed_event("ORD-1", 1);

        let mut a = OrderRecord::new("ORD-1".to_string());
        let mut b = OrderRecord::new("ORD-1".to_string());
        OrderPlacedApplier.apply(&mut a, &event);
        OrderPlacedApplier.apply(&mut b, &event);

        assert_eq!(a, b);
    }
}
