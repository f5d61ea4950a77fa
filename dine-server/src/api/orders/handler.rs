//! Order API Handlers

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, header},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use shared::order::tracking::{
    TimelineEntry, format_countdown, format_minutes, status_headline, time_ago, timeline,
};
use shared::order::{
    Actor, KitchenBucket, OrderCommand, OrderCommandPayload, OrderEvent, OrderRecord,
    OrderStatus, PaymentMethod, TrackerDisplay, aggregate_eta_minutes, derive_display,
    render_receipt,
};
use shared::session::Cart;
use shared::util::{elapsed_seconds, now_millis};
use shared::{ApiResponse, AppResult};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use super::super::ok;
use crate::core::ServerState;
use crate::utils::validation::validate_checkout;

// ========== Checkout ==========

/// Checkout request from the customer device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Client-generated id; resending the same id never creates a second order
    #[serde(default)]
    pub command_id: Option<String>,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    pub payment_method: PaymentMethod,
    pub cart: Cart,
}

/// POST /api/orders
pub async fn checkout(
    State(state): State<ServerState>,
    Json(req): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<OrderRecord>>> {
    let lines = req.cart.to_order_lines();
    validate_checkout(&req.table_id, &req.customer_name, &lines)?;

    let mut cmd = OrderCommand::new(
        Actor::Customer,
        OrderCommandPayload::PlaceOrder {
            table_id: req.table_id,
            customer_name: req.customer_name,
            payment_method: req.payment_method,
            lines,
        },
    );
    if let Some(command_id) = req.command_id {
        cmd.command_id = command_id;
    }

    let order = state.orders.submit(cmd)?;
    Ok(ok(order))
}

// ========== Ledger ==========

/// Kitchen dashboard filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BucketFilter {
    Pending,
    InProgress,
    Ready,
    Served,
    /// pending + approved + cooking
    Active,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub bucket: Option<BucketFilter>,
}

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<OrderRecord>>>> {
    let orders = match query.bucket {
        None => state.orders.list_orders()?,
        Some(BucketFilter::Active) => state.orders.get_active_orders()?,
        Some(BucketFilter::Pending) => state.orders.list_bucket(KitchenBucket::Pending)?,
        Some(BucketFilter::InProgress) => state.orders.list_bucket(KitchenBucket::InProgress)?,
        Some(BucketFilter::Ready) => state.orders.list_bucket(KitchenBucket::Ready)?,
        Some(BucketFilter::Served) => state.orders.list_bucket(KitchenBucket::Served)?,
    };
    Ok(ok(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderRecord>>> {
    Ok(ok(state.orders.require_order(&id)?))
}

// ========== Tracker ==========

/// Everything the customer tracker renders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerResponse {
    pub order: OrderRecord,
    pub display: TrackerDisplay,
    pub headline: String,
    /// Still waiting for the chef to approve
    pub awaiting_confirmation: bool,
    /// `m:ss`
    pub countdown: String,
    pub eta_minutes: i32,
    /// `1h 5m` / `25m`
    pub eta_label: String,
    /// `Just now` / `5m ago`
    pub placed: String,
    pub timeline: Vec<TimelineEntry>,
}

/// GET /api/orders/{id}/tracker
pub async fn tracker(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<TrackerResponse>>> {
    let order = state.orders.require_order(&id)?;
    let now = now_millis();
    let default_minutes = state.config.default_eta_minutes;

    let display = derive_display(
        &order,
        elapsed_seconds(order.created_at, now),
        default_minutes,
    );
    let eta_minutes = aggregate_eta_minutes(&order, default_minutes);

    Ok(ok(TrackerResponse {
        display,
        headline: status_headline(&order).to_string(),
        awaiting_confirmation: order.status == OrderStatus::Pending,
        countdown: format_countdown(display.remaining_seconds),
        eta_minutes,
        eta_label: format_minutes(i64::from(eta_minutes)),
        placed: time_ago(order.created_at, now),
        timeline: timeline(&order),
        order,
    }))
}

/// GET /api/orders/{id}/receipt
pub async fn receipt(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let order = state.orders.require_order(&id)?;
    let body = render_receipt(&order);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"receipt-{}.txt\"", order.order_id))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((headers, body).into_response())
}

// ========== Kitchen ==========

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// POST /api/orders/{id}/status
pub async fn transition_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> AppResult<Json<ApiResponse<OrderRecord>>> {
    Ok(ok(state.orders.transition_status(&id, req.status)?))
}

#[derive(Debug, Deserialize)]
pub struct EtaRequest {
    pub minutes: i32,
}

/// PUT /api/orders/{id}/eta
pub async fn set_estimated_time(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<EtaRequest>,
) -> AppResult<Json<ApiResponse<OrderRecord>>> {
    Ok(ok(state.orders.set_estimated_time(&id, req.minutes)?))
}

/// PUT /api/orders/{id}/items/{index}/eta
pub async fn set_item_estimated_time(
    State(state): State<ServerState>,
    Path((id, index)): Path<(String, usize)>,
    Json(req): Json<EtaRequest>,
) -> AppResult<Json<ApiResponse<OrderRecord>>> {
    Ok(ok(state
        .orders
        .set_item_estimated_time(&id, index, req.minutes)?))
}

// ========== Live events ==========

/// GET /api/orders/events - committed events as server-sent events
///
/// A client that falls behind loses events silently; it should call
/// `/api/sync` when it notices a sequence gap.
pub async fn events(State(state): State<ServerState>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    let rx = state.orders.subscribe();
    let events = broadcast_to_sse(rx);

    (headers, Sse::new(events).keep_alive(KeepAlive::new())).into_response()
}

fn broadcast_to_sse(
    rx: broadcast::Receiver<OrderEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(event) => {
                let data = serde_json::to_string(&event).ok()?;
                Some(Ok(Event::default()
                    .event(event.event_type.to_string())
                    .id(event.sequence.to_string())
                    .data(data)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "SSE subscriber lagged");
                None
            }
        }
    })
}
