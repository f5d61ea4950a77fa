//! Order commands - requests from participants to modify the ledger

use super::record::OrderStatus;
use super::types::{Actor, OrderLineInput, PaymentMethod};
use serde::{Deserialize, Serialize};

/// A command addressed to the order ledger
///
/// `command_id` is the idempotency key: a command redelivered with the same
/// id is acknowledged without producing new events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCommand {
    pub command_id: String,
    pub actor: Actor,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub payload: OrderCommandPayload,
}

impl OrderCommand {
    /// Build a command with a fresh id and the current client time
    pub fn new(actor: Actor, payload: OrderCommandPayload) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            actor,
            timestamp: crate::util::now_millis(),
            payload,
        }
    }

    /// The order this command targets (None for PlaceOrder)
    pub fn target_order_id(&self) -> Option<&str> {
        match &self.payload {
            OrderCommandPayload::PlaceOrder { .. } => None,
            OrderCommandPayload::TransitionStatus { order_id, .. }
            | OrderCommandPayload::SetEstimatedTime { order_id, .. }
            | OrderCommandPayload::SetItemEstimatedTime { order_id, .. } => Some(order_id),
        }
    }
}

/// Command payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderCommandPayload {
    /// Checkout: turn a cart snapshot into a new pending order
    PlaceOrder {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        table_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        customer_name: Option<String>,
        payment_method: PaymentMethod,
        lines: Vec<OrderLineInput>,
    },

    TransitionStatus {
        order_id: String,
        target: OrderStatus,
    },

    SetEstimatedTime {
        order_id: String,
        minutes: i32,
    },

    SetItemEstimatedTime {
        order_id: String,
        item_index: usize,
        minutes: i32,
    },
}
