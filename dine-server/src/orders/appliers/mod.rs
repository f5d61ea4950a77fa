//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles
//! one specific event type. Appliers are PURE functions.

use enum_dispatch::enum_dispatch;

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderRecord};

mod estimated_time_set;
mod order_placed;
mod status_changed;

pub use estimated_time_set::{EstimatedTimeSetApplier, ItemEstimatedTimeSetApplier};
pub use order_placed::OrderPlacedApplier;
pub use status_changed::StatusChangedApplier;

/// EventAction enum - dispatches to concrete applier implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    OrderPlaced(OrderPlacedApplier),
    StatusChanged(StatusChangedApplier),
    EstimatedTimeSet(EstimatedTimeSetApplier),
    ItemEstimatedTimeSet(ItemEstimatedTimeSetApplier),
}

/// Convert OrderEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&OrderEvent> for EventAction {
    fn from(event: &OrderEvent) -> Self {
        match &event.payload {
            EventPayload::OrderPlaced { .. } => EventAction::OrderPlaced(OrderPlacedApplier),
            EventPayload::StatusChanged { .. } => EventAction::StatusChanged(StatusChangedApplier),
            EventPayload::EstimatedTimeSet { .. } => {
                EventAction::EstimatedTimeSet(EstimatedTimeSetApplier)
            }
            EventPayload::ItemEstimatedTimeSet { .. } => {
                EventAction::ItemEstimatedTimeSet(ItemEstimatedTimeSetApplier)
            }
        }
    }
}

/// Fold `event` into `record` with the matching applier
pub fn apply_event(record: &mut OrderRecord, event: &OrderEvent) {
    let applier: EventAction = event.into();
    applier.apply(record, event);
}

/// Stamp bookkeeping shared by every applier
fn finish(record: &mut OrderRecord, event: &OrderEvent) {
    record.last_sequence = event.sequence;
    record.updated_at = event.timestamp;
    record.update_checksum();
}
