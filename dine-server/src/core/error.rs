use thiserror::Error;

use crate::orders::ManagerError;

/// Startup and serving failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Order ledger error: {0}")]
    Orders(#[from] ManagerError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
