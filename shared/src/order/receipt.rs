//! Plain-text customer receipt

use super::money::{line_total, to_f64};
use super::record::OrderRecord;
use std::fmt::Write as _;

/// Render the downloadable receipt for an order
///
/// Figures come from the record itself; nothing is re-priced.
pub fn render_receipt(order: &OrderRecord) -> String {
    let placed = chrono::DateTime::from_timestamp_millis(order.created_at)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "QR DINE - DIGITAL RECEIPT");
    let _ = writeln!(out, "Order Number: {}", order.order_id);
    let _ = writeln!(out, "Placed: {}", placed);
    if let Some(table) = &order.table_id {
        let _ = writeln!(out, "Table: {}", table);
    }
    if let Some(name) = &order.customer_name {
        let _ = writeln!(out, "Customer: {}", name);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "ITEMS:");
    for item in &order.items {
        let _ = writeln!(
            out,
            "{}x {} - ₹{:.2}",
            item.quantity,
            item.name,
            to_f64(line_total(item.price, item.quantity))
        );
        if let Some(notes) = &item.notes {
            let _ = writeln!(out, "   note: {}", notes);
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Subtotal: ₹{:.2}", order.subtotal);
    let _ = writeln!(out, "Tax (5%): ₹{:.2}", order.tax);
    let _ = writeln!(out, "Total: ₹{:.2}", order.total);
    let _ = writeln!(out);
    let _ = writeln!(out, "Payment Method: {}", order.payment_method.label());
    let _ = writeln!(out);
    let _ = write!(out, "Thank you for dining with us!");
    out
}
