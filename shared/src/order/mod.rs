//! Order Event Sourcing Module
//!
//! Types for the order lifecycle shared by the server and its clients:
//! - Commands: Requests from the customer or kitchen to modify orders
//! - Events: Immutable facts recorded after command processing
//! - Records: Order state computed from the event stream
//! - Tracking: Pure derivations for the customer tracker and kitchen board

pub mod bucket;
pub mod command;
pub mod event;
pub mod money;
pub mod receipt;
pub mod record;
pub mod tracking;
pub mod types;

// Re-exports
pub use bucket::{KitchenBucket, active_count, filter_bucket};
pub use command::{OrderCommand, OrderCommandPayload};
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use receipt::render_receipt;
pub use record::{OrderRecord, OrderStatus};
pub use tracking::{
    DEFAULT_ESTIMATED_MINUTES, TrackerDisplay, TrackerStep, aggregate_eta_minutes, derive_display,
};
pub use types::*;
