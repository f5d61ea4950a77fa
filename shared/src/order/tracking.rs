//! Customer tracker derivation
//!
//! Everything in here is a pure function of an [`OrderRecord`] plus the
//! caller-supplied elapsed time, so the tracker can recompute on every tick
//! without touching the ledger.

use super::record::{OrderRecord, OrderStatus};
use serde::{Deserialize, Serialize};

/// ETA used when neither the order nor any item carries one
pub const DEFAULT_ESTIMATED_MINUTES: i32 = 25;

/// Tracker timeline step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrackerStep {
    /// Synthetic first step; always completed once the order exists
    Ordered,
    Approved,
    Cooking,
    Ready,
    Served,
}

impl TrackerStep {
    pub const ALL: [TrackerStep; 5] = [
        TrackerStep::Ordered,
        TrackerStep::Approved,
        TrackerStep::Cooking,
        TrackerStep::Ready,
        TrackerStep::Served,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrackerStep::Ordered => "Order Placed",
            TrackerStep::Approved => "Chef Approved",
            TrackerStep::Cooking => "Cooking",
            TrackerStep::Ready => "Ready for Pickup",
            TrackerStep::Served => "Served",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TrackerStep::Ordered => "Your order has been received",
            TrackerStep::Approved => "Kitchen is preparing your order",
            TrackerStep::Cooking => "Your food is being prepared",
            TrackerStep::Ready => "Your order is ready!",
            TrackerStep::Served => "Enjoy your meal!",
        }
    }

    /// Step reached by an order in `status`
    ///
    /// Pending orders sit on the synthetic `Ordered` step.
    pub fn for_status(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => TrackerStep::Ordered,
            OrderStatus::Approved => TrackerStep::Approved,
            OrderStatus::Cooking => TrackerStep::Cooking,
            OrderStatus::Ready => TrackerStep::Ready,
            OrderStatus::Served => TrackerStep::Served,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Derived tracker values for one order at one instant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrackerDisplay {
    pub progress_percent: f64,
    pub remaining_seconds: i64,
    pub current_step_index: usize,
}

/// Effective ETA in minutes
///
/// Order-level ETA wins. Otherwise items cook in parallel, so the slowest
/// item decides. Otherwise `default_minutes`.
pub fn aggregate_eta_minutes(order: &OrderRecord, default_minutes: i32) -> i32 {
    order
        .estimated_time
        .or_else(|| order.items.iter().filter_map(|i| i.estimated_time).max())
        .unwrap_or(default_minutes)
}

/// Compute progress, remaining time and current step
///
/// `elapsed_seconds` is supplied by the caller (usually `now - created_at`).
pub fn derive_display(
    order: &OrderRecord,
    elapsed_seconds: i64,
    default_minutes: i32,
) -> TrackerDisplay {
    let step = TrackerStep::for_status(order.status);
    let current_step_index = step.index();
    let total_steps = TrackerStep::ALL.len();
    let progress_percent = (current_step_index + 1) as f64 / total_steps as f64 * 100.0;

    let eta_seconds = i64::from(aggregate_eta_minutes(order, default_minutes)) * 60;
    let remaining_seconds = (eta_seconds - elapsed_seconds).max(0);

    TrackerDisplay {
        progress_percent,
        remaining_seconds,
        current_step_index,
    }
}

/// One row of the tracker timeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelineEntry {
    pub step: TrackerStep,
    pub label: String,
    pub description: String,
    pub completed: bool,
    pub current: bool,
}

/// Timeline rows for an order, completed up to and including the current step
pub fn timeline(order: &OrderRecord) -> Vec<TimelineEntry> {
    let current = TrackerStep::for_status(order.status).index();
    TrackerStep::ALL
        .iter()
        .map(|step| TimelineEntry {
            step: *step,
            label: step.label().to_string(),
            description: step.description().to_string(),
            completed: step.index() <= current,
            current: step.index() == current,
        })
        .collect()
}

/// Headline shown above the tracker
pub fn status_headline(order: &OrderRecord) -> &'static str {
    if order.status == OrderStatus::Pending {
        "Your order is placed. Waiting for chef confirmation…"
    } else {
        "Track your order in real-time"
    }
}

// ========== Formatting ==========

/// Seconds as a `m:ss` countdown
pub fn format_countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Minutes as `1h 5m` or `5m`
pub fn format_minutes(minutes: i64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Age of an order as `Just now`, `5m ago` or `1h 5m ago`
pub fn time_ago(created_at_millis: i64, now_millis: i64) -> String {
    let minutes = crate::util::elapsed_seconds(created_at_millis, now_millis) / 60;
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else {
        format!("{}h {}m ago", minutes / 60, minutes % 60)
    }
}
