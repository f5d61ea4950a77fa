//! StatusChanged event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderRecord};

/// StatusChanged applier
///
/// Only `status` changes; legality was checked by the action.
pub struct StatusChangedApplier;

impl EventApplier for StatusChangedApplier {
    fn apply(&self, record: &mut OrderRecord, event: &OrderEvent) {
        if let EventPayload::StatusChanged { to, .. } = &event.payload {
            record.status = *to;
            super::finish(record, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{Actor, OrderEventType, OrderStatus};

    #[test]
    fn test_status_changed_only_touches_status() {
        let mut record = OrderRecord::new("ORD-1".to_string());
        record.total = 451.5;
        record.estimated_time = Some(20);
        let before = record.clone();

        let event = OrderEvent::new(
            2,
            "ORD-1".to_string(),
            Actor::Kitchen,
            "cmd-2".to_string(),
            None,
            OrderEventType::StatusChanged,
            EventPayload::StatusChanged {
                from: OrderStatus::Pending,
                to: OrderStatus::Approved,
            },
        );
        StatusChangedApplier.apply(&mut record, &event);

        assert_eq!(record.status, OrderStatus::Approved);
        assert_eq!(record.total, before.total);
        assert_eq!(record.estimated_time, before.estimated_time);
        assert_eq!(record.last_sequence, 2);
        assert_ne!(record.state_checksum, before.state_checksum);
    }
}
