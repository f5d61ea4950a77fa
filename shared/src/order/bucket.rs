//! Kitchen dashboard buckets

use super::record::{OrderRecord, OrderStatus};
use serde::{Deserialize, Serialize};

/// Column of the kitchen dashboard an order is shown in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum KitchenBucket {
    Pending,
    /// approved + cooking
    InProgress,
    Ready,
    Served,
}

impl KitchenBucket {
    pub fn for_status(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => KitchenBucket::Pending,
            OrderStatus::Approved | OrderStatus::Cooking => KitchenBucket::InProgress,
            OrderStatus::Ready => KitchenBucket::Ready,
            OrderStatus::Served => KitchenBucket::Served,
        }
    }

    pub fn contains(&self, status: OrderStatus) -> bool {
        Self::for_status(status) == *self
    }
}

/// Orders in `bucket`, preserving ledger order
pub fn filter_bucket<'a>(
    orders: &'a [OrderRecord],
    bucket: KitchenBucket,
) -> impl Iterator<Item = &'a OrderRecord> + 'a {
    orders.iter().filter(move |o| bucket.contains(o.status))
}

/// Pending + approved + cooking
pub fn active_count(orders: &[OrderRecord]) -> usize {
    orders.iter().filter(|o| o.status.is_active()).count()
}
