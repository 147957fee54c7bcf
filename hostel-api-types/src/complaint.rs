use serde::{Deserialize, Serialize};

// ============ Complaints ============

/// Body of `GET /api/complaints`.
///
/// Records are kept as raw JSON: only the envelope is part of the contract
/// the smoke runner relies on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplaintListResponse {
    pub count: u64,
    pub data: Vec<serde_json::Value>,
    /// Informational message the server attaches to empty listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComplaintListResponse {
    /// Whether `count` agrees with the number of returned records
    pub fn count_matches_data(&self) -> bool {
        usize::try_from(self.count).map_or(false, |count| count == self.data.len())
    }

    /// Index of the first record that is not a JSON object
    pub fn first_non_object(&self) -> Option<usize> {
        self.data.iter().position(|record| !record.is_object())
    }
}
