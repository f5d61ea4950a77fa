//! EstimatedTimeSet / ItemEstimatedTimeSet event appliers
//!
//! ETA edits never touch prices or status.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderRecord};

/// EstimatedTimeSet applier
pub struct EstimatedTimeSetApplier;

impl EventApplier for EstimatedTimeSetApplier {
    fn apply(&self, record: &mut OrderRecord, event: &OrderEvent) {
        if let EventPayload::EstimatedTimeSet { minutes, .. } = &event.payload {
            record.estimated_time = Some(*minutes);
            super::finish(record, event);
        }
    }
}

/// ItemEstimatedTimeSet applier
pub struct ItemEstimatedTimeSetApplier;

impl EventApplier for ItemEstimatedTimeSetApplier {
    fn apply(&self, record: &mut OrderRecord, event: &OrderEvent) {
        if let EventPayload::ItemEstimatedTimeSet {
            item_index,
            minutes,
            ..
        } = &event.payload
        {
            match record.items.get_mut(*item_index) {
                Some(item) => item.estimated_time = Some(*minutes),
                None => tracing::warn!(
                    order_id = %record.order_id,
                    item_index = *item_index,
                    "ETA event for unknown item ignored"
                ),
            }
            super::finish(record, event);
        }
    }
}
