use super::super::storage::StorageError;
use super::super::traits::OrderError;
use shared::error::{AppError, ErrorCode};
use shared::order::{CommandError, CommandErrorCode, OrderStatus};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Item {index} not found on order {order_id}")]
    ItemNotFound { order_id: String, index: usize },

    #[error("Cannot place an order with an empty cart")]
    EmptyCart,

    #[error("Cannot move order from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Map a storage failure onto an error code clients can act on
fn classify_storage_error(e: &StorageError) -> CommandErrorCode {
    if let StorageError::Serialization(_) = e {
        return CommandErrorCode::InternalError;
    }

    // redb errors carry no stable kind, so classify by message
    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return CommandErrorCode::StorageFull;
    }

    if err_str.contains("out of memory") || err_str.contains("cannot allocate") {
        return CommandErrorCode::OutOfMemory;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return CommandErrorCode::StorageCorrupted;
    }

    CommandErrorCode::SystemBusy
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let (code, message) = match err {
            ManagerError::Storage(e) => {
                let code = classify_storage_error(&e);
                let message = e.to_string();
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
                (code, message)
            }
            ManagerError::OrderNotFound(id) => (
                CommandErrorCode::OrderNotFound,
                format!("Order not found: {}", id),
            ),
            err @ ManagerError::ItemNotFound { .. } => {
                (CommandErrorCode::ItemNotFound, err.to_string())
            }
            ManagerError::EmptyCart => (
                CommandErrorCode::EmptyCart,
                "Cannot place an order with an empty cart".to_string(),
            ),
            err @ ManagerError::IllegalTransition { .. } => {
                (CommandErrorCode::IllegalTransition, err.to_string())
            }
            ManagerError::InvalidAmount(msg) => (CommandErrorCode::InvalidAmount, msg),
            ManagerError::InvalidOperation(msg) => (CommandErrorCode::InvalidOperation, msg),
            ManagerError::Internal(msg) => (CommandErrorCode::InternalError, msg),
        };
        CommandError::new(code, message)
    }
}

impl From<OrderError> for ManagerError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => ManagerError::OrderNotFound(id),
            OrderError::ItemNotFound { order_id, index } => {
                ManagerError::ItemNotFound { order_id, index }
            }
            OrderError::EmptyCart => ManagerError::EmptyCart,
            OrderError::IllegalTransition { from, to } => {
                ManagerError::IllegalTransition { from, to }
            }
            OrderError::InvalidAmount(msg) => ManagerError::InvalidAmount(msg),
            OrderError::InvalidOperation(CommandErrorCode::InternalError, msg) => {
                ManagerError::Internal(msg)
            }
            OrderError::InvalidOperation(_, msg) => ManagerError::InvalidOperation(msg),
            OrderError::Storage(msg) => ManagerError::Internal(msg),
        }
    }
}

/// HTTP boundary: one human-readable message per failure
impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Storage(e) => AppError::database(e.to_string()),
            ManagerError::OrderNotFound(id) => AppError::order_not_found(id),
            ManagerError::ItemNotFound { order_id, index } => {
                AppError::with_message(
                    ErrorCode::OrderItemNotFound,
                    format!("Item {} not found on order {}", index, order_id),
                )
                .with_detail("order_id", order_id)
                .with_detail("item_index", index)
            }
            ManagerError::EmptyCart => AppError::empty_cart(),
            ManagerError::IllegalTransition { from, to } => {
                AppError::illegal_transition(from.as_str(), to.as_str())
            }
            ManagerError::InvalidAmount(msg) => {
                AppError::with_message(ErrorCode::ValueOutOfRange, msg)
            }
            ManagerError::InvalidOperation(msg) => AppError::validation(msg),
            ManagerError::Internal(msg) => AppError::internal(msg),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_error_mapping() {
        let err: ManagerError = OrderError::IllegalTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Cooking,
        }
        .into();
        let cmd: CommandError = err.into();
        assert_eq!(cmd.code, CommandErrorCode::IllegalTransition);
        assert_eq!(cmd.message, "Cannot move order from pending to cooking");

        let err: ManagerError = OrderError::InvalidOperation(
            CommandErrorCode::InternalError,
            "order id clash".to_string(),
        )
        .into();
        assert!(matches!(err, ManagerError::Internal(_)));
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = ManagerError::EmptyCart.into();
        assert_eq!(app.code, ErrorCode::OrderEmpty);
        assert_eq!(app.http_status(), http::StatusCode::BAD_REQUEST);

        let app: AppError = ManagerError::IllegalTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Cooking,
        }
        .into();
        assert_eq!(app.code, ErrorCode::IllegalStatusTransition);
        assert_eq!(app.http_status(), http::StatusCode::CONFLICT);

        let app: AppError = ManagerError::OrderNotFound("ORD-1".to_string()).into();
        assert_eq!(app.http_status(), http::StatusCode::NOT_FOUND);

        let app: AppError = ManagerError::ItemNotFound {
            order_id: "ORD-1".to_string(),
            index: 4,
        }
        .into();
        assert_eq!(app.code, ErrorCode::OrderItemNotFound);
        assert_eq!(app.http_status(), http::StatusCode::NOT_FOUND);
    }
}
