//! Input validation helpers
//!
//! Length and range limits for JSON arriving over HTTP. The ledger itself
//! only refuses what the order lifecycle forbids; these limits guard the
//! public checkout endpoint.

use shared::AppError;
use shared::order::OrderLineInput;

// ── Limits ──────────────────────────────────────────────────────────

/// Customer names and item names
pub const MAX_NAME_LEN: usize = 200;

/// Item notes ("no onions", "extra spicy")
pub const MAX_NOTE_LEN: usize = 500;

/// Table identifiers printed on the QR stand
pub const MAX_TABLE_ID_LEN: usize = 100;

/// Per-line quantity ceiling
pub const MAX_QUANTITY: i32 = 9999;

/// Per-unit price ceiling
pub const MAX_PRICE: f64 = 1_000_000.0;

// ── Validation helpers (HTTP handlers) ──────────────────────────────

/// Required string: non-blank and at most `max_len` characters.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")).with_detail("field", field));
    }
    validate_len(value, field, max_len)
}

/// Optional string: at most `max_len` characters when present.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(
            AppError::validation(format!("{field} is too long ({len} chars, max {max_len})"))
                .with_detail("field", field),
        );
    }
    Ok(())
}

/// Unit price: finite, non-negative, at most [`MAX_PRICE`].
pub fn validate_price(price: f64, field: &str) -> Result<(), AppError> {
    if !price.is_finite() || !(0.0..=MAX_PRICE).contains(&price) {
        return Err(
            AppError::validation(format!("{field} must be between 0 and {MAX_PRICE}"))
                .with_detail("field", field),
        );
    }
    Ok(())
}

/// Line quantity: 1..=[`MAX_QUANTITY`].
pub fn validate_quantity(quantity: i32, field: &str) -> Result<(), AppError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(
            AppError::validation(format!("{field} must be between 1 and {MAX_QUANTITY}"))
                .with_detail("field", field),
        );
    }
    Ok(())
}

/// Everything a checkout body carries besides the payment method
///
/// An empty `lines` passes; the ledger answers that one with its own
/// empty-cart error.
pub fn validate_checkout(
    table_id: &Option<String>,
    customer_name: &Option<String>,
    lines: &[OrderLineInput],
) -> Result<(), AppError> {
    if let Some(table_id) = table_id {
        validate_required_text(table_id, "table_id", MAX_TABLE_ID_LEN)?;
    }
    validate_optional_text(customer_name, "customer_name", MAX_NAME_LEN)?;
    for line in lines {
        validate_required_text(&line.name, "item name", MAX_NAME_LEN)?;
        validate_optional_text(&line.notes, "notes", MAX_NOTE_LEN)?;
        validate_quantity(line.quantity, "quantity")?;
        validate_price(line.price, "price")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    fn line(name: &str, price: f64, quantity: i32) -> OrderLineInput {
        OrderLineInput {
            menu_item_id: "naan".to_string(),
            name: name.to_string(),
            price,
            quantity,
            notes: None,
        }
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("12", "table_id", MAX_TABLE_ID_LEN).is_ok());
        let err = validate_required_text("   ", "table_id", MAX_TABLE_ID_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.unwrap()["field"], "table_id");
        let long = "x".repeat(MAX_TABLE_ID_LEN + 1);
        assert!(validate_required_text(&long, "table_id", MAX_TABLE_ID_LEN).is_err());
    }

    #[test]
    fn test_optional_text_counts_chars() {
        // Multi-byte text is measured in characters, not bytes
        let note = Some("मसाला".repeat(100));
        assert!(validate_optional_text(&note, "notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
        let long = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert!(validate_optional_text(&long, "notes", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_price_and_quantity() {
        assert!(validate_price(40.0, "price").is_ok());
        assert!(validate_price(0.0, "price").is_ok());
        assert!(validate_price(-1.0, "price").is_err());
        assert!(validate_price(f64::NAN, "price").is_err());
        assert!(validate_price(f64::INFINITY, "price").is_err());
        assert!(validate_price(MAX_PRICE + 1.0, "price").is_err());

        assert!(validate_quantity(1, "quantity").is_ok());
        assert!(validate_quantity(MAX_QUANTITY, "quantity").is_ok());
        assert!(validate_quantity(0, "quantity").is_err());
        assert!(validate_quantity(MAX_QUANTITY + 1, "quantity").is_err());
    }

    #[test]
    fn test_checkout_body() {
        let table = Some("12".to_string());
        assert!(validate_checkout(&table, &None, &[line("Naan", 40.0, 2)]).is_ok());
        assert!(validate_checkout(&table, &None, &[]).is_ok());
        assert!(validate_checkout(&table, &None, &[line(" ", 40.0, 2)]).is_err());
        assert!(validate_checkout(&table, &None, &[line("Naan", 40.0, 10_000)]).is_err());
        assert!(validate_checkout(&Some(String::new()), &None, &[line("Naan", 40.0, 1)]).is_err());
    }
}
