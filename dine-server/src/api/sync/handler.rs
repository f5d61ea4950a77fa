//! Command and sync handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::order::{CommandResponse, OrderCommand, OrderCommandPayload, SyncRequest, SyncResponse};
use shared::{ApiResponse, AppResult};

use super::super::ok;
use crate::core::ServerState;
use crate::utils::validation::validate_checkout;

/// POST /api/commands - kitchen and replica clients speaking the command protocol
///
/// Domain failures come back inside the `CommandResponse`, with storage
/// trouble classified into the 94xx codes. Only malformed checkout input is
/// refused at the HTTP level.
pub async fn command(
    State(state): State<ServerState>,
    Json(cmd): Json<OrderCommand>,
) -> AppResult<Json<ApiResponse<CommandResponse>>> {
    if let OrderCommandPayload::PlaceOrder {
        table_id,
        customer_name,
        lines,
        ..
    } = &cmd.payload
    {
        validate_checkout(table_id, customer_name, lines)?;
    }
    Ok(ok(state.orders.execute_command(cmd)))
}

/// POST /api/sync - catch up after a reconnect
///
/// Incremental events when the client is close behind, otherwise the whole
/// ledger. `server_epoch` tells the client whether the server restarted.
pub async fn sync(
    State(state): State<ServerState>,
    Json(request): Json<SyncRequest>,
) -> AppResult<Json<ApiResponse<SyncResponse>>> {
    let response = state.sync.sync(request)?;
    Ok(ok(response))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEntry {
    pub order_id: String,
    /// Stored record equals the replay of its events
    pub consistent: bool,
}

/// GET /api/sync/verify
pub async fn verify(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<VerifyEntry>>>> {
    let entries = state
        .sync
        .verify_active_records()?
        .into_iter()
        .map(|(order_id, consistent)| {
            if !consistent {
                tracing::warn!(order_id = %order_id, "Stored record drifted from its events");
            }
            VerifyEntry {
                order_id,
                consistent,
            }
        })
        .collect();
    Ok(ok(entries))
}
