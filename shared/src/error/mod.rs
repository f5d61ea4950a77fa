//! Error codes and the JSON envelope shared by the server and its clients
//!
//! ```
//! use shared::error::{ApiResponse, AppError};
//!
//! let err = AppError::validation("notes too long").with_detail("field", "notes");
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(2));
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, ErrorDetails};
