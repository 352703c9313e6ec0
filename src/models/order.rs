use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A medicine delivery request as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub drugs: Vec<String>,
    pub patient_name: String,
    pub location: String,
    pub mobile_number: String, // fixed 10-digit pattern
}

/// Lifecycle status of an order.
///
/// Orders are created as Processing and never transition out of it; no
/// fulfillment state machine exists in this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Processing,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
        }
    }
}

/// An order record, immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub patient_name: String,
    pub drugs: Vec<String>,
    pub location: String,
    pub mobile_number: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Acknowledgement returned when an order is placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order_id: String,
    pub status: String, // "Order placed"
}
