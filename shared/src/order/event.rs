//! Ledger events
//!
//! Every accepted command leaves one or more of these behind; records are
//! nothing but the fold of their events.

use super::record::OrderStatus;
use super::types::{Actor, OrderItem, PaymentMethod};
use serde::{Deserialize, Serialize};

/// One committed change to one order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderEvent {
    pub event_id: String,
    /// Position in the ledger-wide stream, strictly increasing
    pub sequence: u64,
    pub order_id: String,
    /// Server clock, Unix millis; the only time appliers trust
    pub timestamp: i64,
    /// Caller's clock, informational
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
    /// Participant who triggered this event
    pub actor: Actor,
    /// `command_id` of the command that produced it
    pub command_id: String,
    pub event_type: OrderEventType,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderPlaced,
    StatusChanged,
    EstimatedTimeSet,
    ItemEstimatedTimeSet,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderPlaced => write!(f, "ORDER_PLACED"),
            OrderEventType::StatusChanged => write!(f, "STATUS_CHANGED"),
            OrderEventType::EstimatedTimeSet => write!(f, "ESTIMATED_TIME_SET"),
            OrderEventType::ItemEstimatedTimeSet => write!(f, "ITEM_ESTIMATED_TIME_SET"),
        }
    }
}

/// What changed, tagged by `type` on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    OrderPlaced {
        #[serde(skip_serializing_if = "Option::is_none")]
        table_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        customer_name: Option<String>,
        payment_method: PaymentMethod,
        items: Vec<OrderItem>,
        subtotal: f64,
        tax: f64,
        total: f64,
    },

    StatusChanged {
        from: OrderStatus,
        to: OrderStatus,
    },

    EstimatedTimeSet {
        minutes: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<i32>,
    },

    ItemEstimatedTimeSet {
        item_index: usize,
        minutes: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<i32>,
    },
}

impl OrderEvent {
    /// Create a new event stamped with the server clock
    pub fn new(
        sequence: u64,
        order_id: String,
        actor: Actor,
        command_id: String,
        client_timestamp: Option<i64>,
        event_type: OrderEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
            client_timestamp,
            actor,
            command_id,
            event_type,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_shape() {
        let event = OrderEvent::new(
            7,
            "ORD-2026101610001".to_string(),
            Actor::Kitchen,
            "cmd-1".to_string(),
            None,
            OrderEventType::StatusChanged,
            EventPayload::StatusChanged {
                from: OrderStatus::Pending,
                to: OrderStatus::Approved,
            },
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "STATUS_CHANGED");
        assert_eq!(json["payload"]["type"], "STATUS_CHANGED");
        assert_eq!(json["payload"]["from"], "pending");
        assert_eq!(json["payload"]["to"], "approved");
        assert_eq!(json["actor"], "kitchen");
        assert!(json.get("client_timestamp").is_none());

        let back: OrderEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_event_type_display() {
        assert_eq!(OrderEventType::OrderPlaced.to_string(), "ORDER_PLACED");
        assert_eq!(
            OrderEventType::ItemEstimatedTimeSet.to_string(),
            "ITEM_ESTIMATED_TIME_SET"
        );
    }
}
