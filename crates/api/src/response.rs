//! Shared response envelope types for API handlers.
//!
//! Successful payloads use a `{ "data": ... }` envelope; mutations that
//! return only an acknowledgement use [`MessageResponse`].

use orders_core::types::Timestamp;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Acknowledgement payload with a message, status code, and timestamp.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub status: u16,
    pub timestamp: Timestamp,
}

impl MessageResponse {
    /// Build an OK acknowledgement stamped with the current time.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: 200,
            timestamp: chrono::Utc::now(),
        }
    }
}
