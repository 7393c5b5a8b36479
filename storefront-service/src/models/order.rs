//! Order models.
//!
//! Order items are snapshots: `item_name` and `unit_price` are copied
//! from the cart at order-creation time and never recomputed from the
//! live menu afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Order lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    PaymentPending,
    Paid,
    Processing,
    ReadyForPickup,
    Dispatched,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::PaymentPending => "payment_pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Processing => "processing",
            OrderStatus::ReadyForPickup => "ready_for_pickup",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "payment_pending" => Some(OrderStatus::PaymentPending),
            "paid" => Some(OrderStatus::Paid),
            "processing" => Some(OrderStatus::Processing),
            "ready_for_pickup" => Some(OrderStatus::ReadyForPickup),
            "dispatched" => Some(OrderStatus::Dispatched),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// What kind of purchase an order represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Single,
    Subscription,
    Catering,
    Shipping,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Single => "single",
            OrderType::Subscription => "subscription",
            OrderType::Catering => "catering",
            OrderType::Shipping => "shipping",
        }
    }
}

/// Payment settlement state carried on the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl OrderPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPaymentStatus::Pending => "pending",
            OrderPaymentStatus::Paid => "paid",
            OrderPaymentStatus::Failed => "failed",
            OrderPaymentStatus::Refunded => "refunded",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: Uuid,
    pub order_number: String,
    pub order_type: String,
    pub status: String,
    pub cart_id: Option<Uuid>,

    // Totals
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,

    // Shipping contact
    pub shipping_name: String,
    pub shipping_email: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_country: String,
    pub shipping_zip: String,
    pub delivery_date: Option<NaiveDate>,
    pub special_instructions: String,

    // Payment
    pub payment_method: String,
    pub payment_status: String,
    pub payment_reference: String,
    pub paid_utc: Option<DateTime<Utc>>,

    // Tracking
    pub tracking_number: String,
    pub notes: String,

    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Snapshotted order line.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_item_id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Option<Uuid>,
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub special_instructions: String,
}

/// Order with its lines, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Generate an order number: `ORD-{unix_ts}-{8 hex chars}`.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "ORD-{}-{}",
        now.timestamp(),
        suffix[..8].to_ascii_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_number_shape() {
        let number = generate_order_number(Utc::now());
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn status_round_trips() {
        for s in [
            "pending",
            "payment_pending",
            "paid",
            "processing",
            "ready_for_pickup",
            "dispatched",
            "delivered",
            "cancelled",
        ] {
            assert_eq!(OrderStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(OrderStatus::parse("shipped").is_none());
    }
}
