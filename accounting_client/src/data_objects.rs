use serde::{Deserialize, Serialize};

/// The flattened order representation the accounting API expects.
///
/// `items` is a single human-readable string with one entry per product; the accounting side
/// treats it as an opaque description and never parses it back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub total: f64,
    pub date: String,
    pub email: String,
    pub id: String,
    pub items: String,
}
