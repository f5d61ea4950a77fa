//! Order Event Sourcing Module
//!
//! The Lifecycle Coordinator and its Order Ledger:
//!
//! - **manager**: `OrdersManager`, command processing and event generation
//! - **storage**: redb persistence for events, records and indices
//! - **actions** / **appliers**: command → event, event → record
//! - **sync**: reconnection protocol
//! - **replica**: client-side copy of the ledger
//!
//! # Architecture
//!
//! ```text
//! Command → OrdersManager → Event → Storage (redb)
//!                 ↓                      ↓
//!              Broadcast           Record Update
//!                 ↓
//!     Kitchen / Tracker subscribers (LedgerReplica)
//! ```

pub mod actions;
pub mod appliers;
pub mod manager;
pub mod replica;
pub mod storage;
pub mod sync;
pub mod traits;

// Re-exports
pub use manager::{ManagerError, ManagerResult, OrdersManager};
pub use replica::LedgerReplica;
pub use storage::{OrderStorage, StorageError};
pub use sync::SyncService;

pub use shared::order::{
    CommandError, CommandErrorCode, CommandResponse, EventPayload, OrderCommand,
    OrderCommandPayload, OrderEvent, OrderEventType, OrderRecord, OrderStatus, SyncRequest,
    SyncResponse,
};
