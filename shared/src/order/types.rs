//! Order value types shared by commands, events and records

use serde::{Deserialize, Serialize};

/// Maximum per-order or per-item ETA (24 hours, in minutes)
pub const MAX_ESTIMATED_MINUTES: i32 = 24 * 60;

/// Who issued a command
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// Ordering customer (checkout)
    Customer,
    /// Kitchen staff (status + ETA edits)
    Kitchen,
}

impl Actor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Customer => "customer",
            Actor::Kitchen => "kitchen",
        }
    }
}

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Online,
    Cash,
}

impl PaymentMethod {
    /// Label printed on receipts
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "Online Payment",
            PaymentMethod::Cash => "Cash at Counter",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Online => write!(f, "online"),
            PaymentMethod::Cash => write!(f, "cash"),
        }
    }
}

/// Cart line captured at checkout (input for PlaceOrder)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineInput {
    /// Menu item id (informational; orders never reference the live catalog)
    pub menu_item_id: String,
    pub name: String,
    /// Unit price at the moment of checkout
    pub price: f64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Item snapshot stored on an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub name: String,
    /// Always ≥ 1
    pub quantity: i32,
    /// Unit price snapshot (for receipts; never re-priced)
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Per-item ETA in minutes (≥ 1 once set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<i32>,
}

impl From<&OrderLineInput> for OrderItem {
    fn from(line: &OrderLineInput) -> Self {
        Self {
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.price,
            notes: line.notes.clone(),
            estimated_time: None,
        }
    }
}

/// Clamp an ETA edit into `1..=MAX_ESTIMATED_MINUTES`
pub fn clamp_estimated_minutes(minutes: i32) -> i32 {
    minutes.clamp(1, MAX_ESTIMATED_MINUTES)
}

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub command_id: String,
    pub success: bool,
    /// Affected order ID (new ID for PlaceOrder)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Present when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, order_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            order_id,
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            order_id: None,
            error: Some(error),
        }
    }

    /// Redelivered command: acknowledged with the order it originally touched
    pub fn duplicate(command_id: String, order_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            order_id,
            error: None,
        }
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Command error codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    OrderNotFound,
    ItemNotFound,
    EmptyCart,
    IllegalTransition,
    InvalidAmount,
    InvalidOperation,
    InternalError,
    // 94xx on the HTTP side
    StorageFull,
    OutOfMemory,
    StorageCorrupted,
    SystemBusy,
}

/// Sent by a dashboard after (re)connecting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    /// Highest sequence the client has applied, 0 when it has nothing
    pub since_sequence: u64,
}

/// Catch-up answer for a [`SyncRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Missed events, ascending; empty on a full sync
    pub events: Vec<super::event::OrderEvent>,
    /// Whole ledger, newest first (full sync only)
    pub orders: Vec<super::record::OrderRecord>,
    pub server_sequence: u64,
    /// Set when the gap was too large and `orders` holds the whole ledger
    pub requires_full_sync: bool,
    /// Changes on every server start
    pub server_epoch: String,
}

impl SyncResponse {
    pub fn full_sync(
        orders: Vec<super::record::OrderRecord>,
        server_sequence: u64,
        epoch: String,
    ) -> Self {
        Self {
            events: vec![],
            orders,
            server_sequence,
            requires_full_sync: true,
            server_epoch: epoch,
        }
    }

    pub fn incremental(
        events: Vec<super::event::OrderEvent>,
        server_sequence: u64,
        epoch: String,
    ) -> Self {
        Self {
            events,
            orders: vec![],
            server_sequence,
            requires_full_sync: false,
            server_epoch: epoch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Online).unwrap(),
            "\"online\""
        );
        let m: PaymentMethod = serde_json::from_str("\"cash\"").unwrap();
        assert_eq!(m, PaymentMethod::Cash);
        assert!(serde_json::from_str::<PaymentMethod>("\"card\"").is_err());
        assert_eq!(PaymentMethod::Cash.label(), "Cash at Counter");
    }

    #[test]
    fn test_clamp_estimated_minutes() {
        assert_eq!(clamp_estimated_minutes(-5), 1);
        assert_eq!(clamp_estimated_minutes(0), 1);
        assert_eq!(clamp_estimated_minutes(20), 20);
        assert_eq!(clamp_estimated_minutes(10_000), MAX_ESTIMATED_MINUTES);
    }

    #[test]
    fn test_order_item_from_line() {
        let line = OrderLineInput {
            menu_item_id: "naan".to_string(),
            name: "Butter Naan".to_string(),
            price: 40.0,
            quantity: 2,
            notes: Some("extra butter".to_string()),
        };
        let item = OrderItem::from(&line);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.notes.as_deref(), Some("extra butter"));
        assert_eq!(item.estimated_time, None);
    }

    #[test]
    fn test_command_response_skips_empty_fields() {
        let json =
            serde_json::to_string(&CommandResponse::duplicate("cmd-1".to_string(), None)).unwrap();
        assert!(!json.contains("error"));
        assert!(!json.contains("order_id"));
    }
}
