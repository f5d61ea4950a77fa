//! Shared types for QR Dine
//!
//! Domain types used by dine-server and by every client of the order ledger:
//! unified error codes, the order record and its event stream, tracker
//! derivations, and the customer's cart/table session.

pub mod error;
pub mod models;
pub mod order;
pub mod session;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
