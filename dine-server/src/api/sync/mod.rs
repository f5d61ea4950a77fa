//! Command and sync protocol
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /api/commands | POST | raw `OrderCommand`, answered with a `CommandResponse` |
//! | /api/sync | POST | reconnection catch-up |
//! | /api/sync/verify | GET | replay every active order and compare |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub use handler::VerifyEntry;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/commands", post(handler::command))
        .route("/api/sync", post(handler::sync))
        .route("/api/sync/verify", get(handler::verify))
}
