//! Order record - the ledger entry computed from the event stream
//!
//! The record includes a `state_checksum` field for drift detection.
//! Replicas compare their locally computed checksum with the server's
//! to detect if their applier logic has diverged.

use super::types::{OrderItem, PaymentMethod};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Order status
///
/// Legal transitions:
///
/// ```text
/// pending ──► approved ──► cooking ──► ready
///    │
///    └──────► served   (reject path)
/// ```
///
/// `ready → served` is not part of the table; once ready the order stays
/// ready until picked up outside the system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Cooking,
    Ready,
    Served,
}

impl OrderStatus {
    /// All statuses in lifecycle order
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Approved,
        OrderStatus::Cooking,
        OrderStatus::Ready,
        OrderStatus::Served,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
        }
    }

    /// Whether `self → target` is in the transition table
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        matches!(
            (self, target),
            (OrderStatus::Pending, OrderStatus::Approved)
                | (OrderStatus::Pending, OrderStatus::Served)
                | (OrderStatus::Approved, OrderStatus::Cooking)
                | (OrderStatus::Cooking, OrderStatus::Ready)
        )
    }

    /// Whether some legal transition ends in this status
    ///
    /// Re-applying a transition into such a status is a no-op.
    pub fn is_transition_target(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    /// Pending, approved or cooking
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Approved | OrderStatus::Cooking
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "approved" => Ok(OrderStatus::Approved),
            "cooking" => Ok(OrderStatus::Cooking),
            "ready" => Ok(OrderStatus::Ready),
            "served" => Ok(OrderStatus::Served),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// Order record - computed from the event stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    /// Order ID (assigned by server, never reused)
    pub order_id: String,
    /// Table the order was placed from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Item snapshots, in cart order
    pub items: Vec<OrderItem>,
    /// Sum of line totals before tax
    pub subtotal: f64,
    pub tax: f64,
    /// Fixed at creation; never recomputed
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Order-level ETA in minutes (≥ 1 once set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<i32>,
    /// Last update timestamp
    pub updated_at: i64,
    /// Last applied event sequence (for incremental updates)
    pub last_sequence: u64,
    /// State checksum for drift detection (hex string)
    #[serde(default)]
    pub state_checksum: String,
}

impl OrderRecord {
    /// Create an empty pending record
    ///
    /// Appliers fill it in from the `OrderPlaced` event.
    pub fn new(order_id: String) -> Self {
        let mut record = Self {
            order_id,
            table_id: None,
            customer_name: None,
            items: Vec::new(),
            subtotal: 0.0,
            tax: 0.0,
            total: 0.0,
            payment_method: PaymentMethod::Online,
            status: OrderStatus::Pending,
            created_at: 0,
            estimated_time: None,
            updated_at: 0,
            last_sequence: 0,
            state_checksum: String::new(),
        };
        record.update_checksum();
        record
    }

    /// Sum of item quantities
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Compute state checksum for drift detection
    ///
    /// Returns a 16-character hex string over: item count, total (cents),
    /// status, order ETA, per-item ETAs and last sequence.
    pub fn compute_checksum(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher as _;

        let mut hasher = DefaultHasher::new();

        self.items.len().hash(&mut hasher);
        ((self.total * 100.0).round() as i64).hash(&mut hasher);
        self.status.hash(&mut hasher);
        self.estimated_time.hash(&mut hasher);
        for item in &self.items {
            item.estimated_time.hash(&mut hasher);
        }
        self.last_sequence.hash(&mut hasher);

        format!("{:016x}", hasher.finish())
    }

    /// Update the state_checksum field based on current state
    pub fn update_checksum(&mut self) {
        self.state_checksum = self.compute_checksum();
    }

    /// Returns true if checksum matches, false if drift detected
    pub fn verify_checksum(&self) -> bool {
        self.state_checksum == self.compute_checksum()
    }
}
