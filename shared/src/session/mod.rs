//! Customer session: cart + table binding
//!
//! The session is owned by the caller and persisted through an injected
//! [`SessionStore`]. It gates cart edits and checkout on a bound table.

pub mod cart;
pub mod store;
pub mod table;

pub use cart::{Cart, CartLine};
pub use store::{JsonFileStore, MemoryStore, SessionStore};
pub use table::TableBinding;

use crate::error::{AppError, ErrorCode};
use crate::models::MenuItemRef;
use crate::order::{Actor, OrderCommand, OrderCommandPayload, PaymentMethod};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please select your table first")]
    MissingTableBinding,

    #[error("Session I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingTableBinding => AppError::new(ErrorCode::TableNotSelected),
            other => AppError::internal(other.to_string()),
        }
    }
}

/// Everything the customer device remembers between reloads
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerSession {
    pub cart: Cart,
    pub table: TableBinding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl CustomerSession {
    /// Restore from `store`, or start empty
    pub fn restore(store: &dyn SessionStore) -> Result<Self, SessionError> {
        Ok(store.load()?.unwrap_or_default())
    }

    pub fn persist(&self, store: &dyn SessionStore) -> Result<(), SessionError> {
        store.save(self)
    }

    pub fn bind_table(&mut self, table_id: Option<String>) {
        self.table.set(table_id);
    }

    /// Add to the cart; refused while no table is bound
    pub fn add_item(
        &mut self,
        item: MenuItemRef,
        quantity: i32,
        notes: Option<String>,
    ) -> Result<(), SessionError> {
        if !self.table.is_bound() {
            return Err(SessionError::MissingTableBinding);
        }
        self.cart.add_item(item, quantity, notes);
        Ok(())
    }

    /// Build the PlaceOrder command for the current cart
    ///
    /// Refused while no table is bound. An empty cart is left for the
    /// coordinator to reject.
    pub fn checkout_command(
        &self,
        payment_method: PaymentMethod,
    ) -> Result<OrderCommand, SessionError> {
        let table_id = self
            .table
            .get()
            .ok_or(SessionError::MissingTableBinding)?
            .to_string();
        Ok(OrderCommand::new(
            Actor::Customer,
            OrderCommandPayload::PlaceOrder {
                table_id: Some(table_id),
                customer_name: self.customer_name.clone(),
                payment_method,
                lines: self.cart.to_order_lines(),
            },
        ))
    }

    /// Clear the cart after the coordinator accepted the order
    pub fn complete_checkout(&mut self) {
        self.cart.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_requires_table() {
        let mut session = CustomerSession::default();
        let err = session
            .add_item(MenuItemRef::new("naan", "Naan", 40.0), 1, None)
            .unwrap_err();
        assert!(matches!(err, SessionError::MissingTableBinding));
        assert!(session.cart.is_empty());

        session.bind_table(Some("12".to_string()));
        session
            .add_item(MenuItemRef::new("naan", "Naan", 40.0), 1, None)
            .unwrap();
        assert_eq!(session.cart.total_item_count(), 1);
    }

    #[test]
    fn test_checkout_requires_table() {
        let session = CustomerSession::default();
        assert!(matches!(
            session.checkout_command(PaymentMethod::Cash),
            Err(SessionError::MissingTableBinding)
        ));
    }

    #[test]
    fn test_checkout_command_snapshots_cart() {
        let mut session = CustomerSession::default();
        session.bind_table(Some("12".to_string()));
        session.customer_name = Some("Asha".to_string());
        session
            .add_item(MenuItemRef::new("naan", "Naan", 40.0), 2, None)
            .unwrap();

        let cmd = session.checkout_command(PaymentMethod::Online).unwrap();
        assert_eq!(cmd.actor, Actor::Customer);
        match cmd.payload {
            OrderCommandPayload::PlaceOrder {
                table_id,
                customer_name,
                payment_method,
                lines,
            } => {
                assert_eq!(table_id.as_deref(), Some("12"));
                assert_eq!(customer_name.as_deref(), Some("Asha"));
                assert_eq!(payment_method, PaymentMethod::Online);
                assert_eq!(lines.len(), 1);
                assert_eq!(lines[0].quantity, 2);
            }
            other => panic!("unexpected payload: {:?}", other),
        }

        session.complete_checkout();
        assert!(session.cart.is_empty());
        assert!(session.table.is_bound());
    }

    #[test]
    fn test_restore_defaults_when_empty() {
        let store = MemoryStore::new();
        let session = CustomerSession::restore(&store).unwrap();
        assert_eq!(session, CustomerSession::default());
    }

    #[test]
    fn test_missing_table_maps_to_error_code() {
        let err: AppError = SessionError::MissingTableBinding.into();
        assert_eq!(err.code, ErrorCode::TableNotSelected);
    }
}
