//! Cart aggregate - the customer's in-progress selection
//!
//! Pure local state. Persistence goes through [`super::SessionStore`], never
//! through the cart itself.

use crate::models::MenuItemRef;
use crate::order::OrderLineInput;
use crate::order::money::{line_total, to_f64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One menu item and how many of it
///
/// The line's notes live on the item snapshot (`item.note`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub item: MenuItemRef,
    /// Always ≥ 1 while the line exists
    pub quantity: i32,
}

/// Cart aggregate
///
/// At most one line per menu item id. Lines keep insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, item_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.item.id == item_id)
    }

    fn line_mut(&mut self, item_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.item.id == item_id)
    }

    /// Add `quantity` of `item`
    ///
    /// An existing line gains `quantity`; its notes change only when `notes`
    /// is `Some`. Non-positive quantities are ignored.
    pub fn add_item(&mut self, mut item: MenuItemRef, quantity: i32, notes: Option<String>) {
        if quantity <= 0 {
            return;
        }
        if let Some(line) = self.line_mut(&item.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            if notes.is_some() {
                line.item.note = notes;
            }
            return;
        }
        if notes.is_some() {
            item.note = notes;
        }
        self.lines.push(CartLine { item, quantity });
    }

    /// Remove the line for `item_id` (no-op when absent)
    pub fn remove_item(&mut self, item_id: &str) {
        self.lines.retain(|l| l.item.id != item_id);
    }

    /// Set the quantity exactly; `<= 0` removes the line
    pub fn update_quantity(&mut self, item_id: &str, quantity: i32) {
        if quantity <= 0 {
            self.remove_item(item_id);
        } else if let Some(line) = self.line_mut(item_id) {
            line.quantity = quantity;
        }
    }

    /// Replace the notes on an existing line (no-op when absent)
    pub fn update_notes(&mut self, item_id: &str, notes: Option<String>) {
        if let Some(line) = self.line_mut(item_id) {
            line.item.note = notes;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of quantities
    pub fn total_item_count(&self) -> i32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ unit price × quantity, before tax
    pub fn total_price(&self) -> f64 {
        let total: Decimal = self
            .lines
            .iter()
            .map(|l| line_total(l.item.price, l.quantity))
            .sum();
        to_f64(total)
    }

    /// Snapshot the lines for a PlaceOrder command
    pub fn to_order_lines(&self) -> Vec<OrderLineInput> {
        self.lines
            .iter()
            .map(|l| OrderLineInput {
                menu_item_id: l.item.id.clone(),
                name: l.item.name.clone(),
                price: l.item.price,
                quantity: l.quantity,
                notes: l.item.note.clone(),
            })
            .collect()
    }
}
