//! Health check
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /health | GET | liveness, version and server epoch |
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "epoch": "6f1c...",
//!   "uptime_seconds": 42,
//!   "active_orders": 3
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use shared::ApiResponse;
use std::time::SystemTime;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    /// Changes on every restart
    epoch: String,
    uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_orders: Option<usize>,
}

static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

async fn health(State(state): State<ServerState>) -> Json<ApiResponse<HealthResponse>> {
    let active_orders = match state.orders.get_active_orders() {
        Ok(orders) => Some(orders.len()),
        Err(e) => {
            tracing::error!(error = %e, "Health check could not read the ledger");
            None
        }
    };

    super::ok(HealthResponse {
        status: if active_orders.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        epoch: state.epoch().to_string(),
        uptime_seconds: get_uptime_seconds(),
        active_orders,
    })
}
