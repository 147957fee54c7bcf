use serde::{Deserialize, Serialize};

pub mod auth;
pub mod complaint;

pub use auth::{LoginRequest, Role};
pub use complaint::ComplaintListResponse;

// Shared models for the smoke runner and anything else talking to the hostel API

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiErrorBody {
    /// Try to read an error body out of an arbitrary JSON value
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({})", self.error, details),
            None => write!(f, "{}", self.error),
        }
    }
}
