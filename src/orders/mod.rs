//! In-memory order tracker.
//!
//! Orders live only for the lifetime of the process: entries are inserted
//! once at placement and only ever read afterwards, never updated or
//! deleted. `DashMap` gives atomic single-key insert/read under concurrent
//! access, which is all the insert-and-read discipline needs.

use chrono::Utc;
use dashmap::DashMap;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::{Order, OrderRequest, OrderStatus, PlacedOrder};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("invalid mobile number: expected exactly 10 digits")]
    InvalidMobileNumber,
}

fn is_valid_mobile(number: &str) -> bool {
    number.len() == 10 && number.chars().all(|c| c.is_ascii_digit())
}

#[derive(Debug, Default)]
pub struct OrderBook {
    orders: DashMap<String, Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an order. The id is a random v4 UUID, so concurrent placements
    /// never collide. Status starts (and stays) at Processing.
    pub fn place(&self, request: OrderRequest) -> Result<PlacedOrder, OrderError> {
        if !is_valid_mobile(&request.mobile_number) {
            return Err(OrderError::InvalidMobileNumber);
        }

        let order_id = Uuid::new_v4().to_string();
        let order = Order {
            order_id: order_id.clone(),
            patient_name: request.patient_name,
            drugs: request.drugs,
            location: request.location,
            mobile_number: request.mobile_number,
            status: OrderStatus::Processing,
            created_at: Utc::now(),
        };

        self.orders.insert(order_id.clone(), order);
        info!(%order_id, "order placed");

        Ok(PlacedOrder {
            order_id,
            status: "Order placed".to_string(),
        })
    }

    /// Look up an order by id. Unknown ids are a normal `None`, not an
    /// error.
    pub fn status(&self, order_id: &str) -> Option<Order> {
        self.orders.get(order_id).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
