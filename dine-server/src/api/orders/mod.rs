//! Order API
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /api/orders | POST | checkout |
//! | /api/orders?bucket= | GET | ledger, newest first |
//! | /api/orders/events | GET | live events (SSE) |
//! | /api/orders/{id} | GET | one order |
//! | /api/orders/{id}/tracker | GET | customer tracker view |
//! | /api/orders/{id}/receipt | GET | plain-text receipt |
//! | /api/orders/{id}/status | POST | kitchen status change |
//! | /api/orders/{id}/eta | PUT | order ETA |
//! | /api/orders/{id}/items/{index}/eta | PUT | item ETA |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub use handler::{BucketFilter, CheckoutRequest, TrackerResponse};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(handler::list).post(handler::checkout))
        .route("/api/orders/events", get(handler::events))
        .route("/api/orders/{id}", get(handler::get_by_id))
        .route("/api/orders/{id}/tracker", get(handler::tracker))
        .route("/api/orders/{id}/receipt", get(handler::receipt))
        .route("/api/orders/{id}/status", post(handler::transition_status))
        .route("/api/orders/{id}/eta", put(handler::set_estimated_time))
        .route(
            "/api/orders/{id}/items/{index}/eta",
            put(handler::set_item_estimated_time),
        )
}
