//! Numeric error codes
//!
//! The thousands digit selects the domain: `0xxx` request-level problems,
//! `4xxx` the order ledger, `7xxx` the customer's table session and `9xxx`
//! the server itself. Values are part of the wire contract with the
//! kitchen dashboard and the tracker page; never renumber an existing code.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! error_codes {
    ($(
        $(#[$meta:meta])*
        $name:ident = $value:literal => $status:ident, $message:literal;
    )+) => {
        /// Stable error code carried in every failed [`ApiResponse`](super::ApiResponse)
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$meta])* $name = $value, )+
        }

        impl ErrorCode {
            /// Default message shown to customers and kitchen staff
            pub const fn message(&self) -> &'static str {
                match self {
                    $( Self::$name => $message, )+
                }
            }

            /// Status used when this code is the whole HTTP answer
            pub fn http_status(&self) -> StatusCode {
                match self {
                    $( Self::$name => StatusCode::$status, )+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(Self::$name), )+
                    other => Err(InvalidErrorCode(other)),
                }
            }
        }
    };
}

error_codes! {
    Success = 0 => OK, "OK";
    ValidationFailed = 2 => BAD_REQUEST, "Validation failed";
    NotFound = 3 => NOT_FOUND, "Resource not found";
    InvalidRequest = 5 => BAD_REQUEST, "Invalid request";
    ValueOutOfRange = 8 => BAD_REQUEST, "Value is out of range";

    OrderNotFound = 4001 => NOT_FOUND, "No such order";
    /// Item index past the end of the order
    OrderItemNotFound = 4006 => NOT_FOUND, "No such item in this order";
    OrderEmpty = 4007 => BAD_REQUEST, "Your cart is empty";
    /// Status change outside the lifecycle table
    IllegalStatusTransition = 4008 => CONFLICT, "This status change is not allowed";

    /// Checkout without a table bound to the session
    TableNotSelected = 7005 => BAD_REQUEST, "Please select your table first";

    InternalError = 9001 => INTERNAL_SERVER_ERROR, "Internal server error";
    DatabaseError = 9002 => INTERNAL_SERVER_ERROR, "Database error";
    StorageFull = 9401 => INTERNAL_SERVER_ERROR, "Disk is full";
    OutOfMemory = 9402 => INTERNAL_SERVER_ERROR, "Out of memory";
    StorageCorrupted = 9403 => INTERNAL_SERVER_ERROR, "Order database is damaged";
    /// Transient, the client may retry
    SystemBusy = 9404 => SERVICE_UNAVAILABLE, "Server busy, please retry";
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A number on the wire that names no [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code {0}")]
pub struct InvalidErrorCode(pub u16);
