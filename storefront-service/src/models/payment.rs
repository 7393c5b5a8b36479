//! Payment and webhook-log models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

/// A payment attempt against an order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub payment_id: Uuid,
    pub order_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub gateway: String,
    pub reference: String,
    pub authorization_url: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub completed_utc: Option<DateTime<Utc>>,
}

/// Log row for an inbound gateway webhook. `(reference, event)` is
/// unique so replayed deliveries are detected instead of reprocessed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WebhookLog {
    pub webhook_id: Uuid,
    pub reference: String,
    pub event: String,
    pub status: String,
    pub payload: serde_json::Value,
    pub processed: bool,
    pub created_utc: DateTime<Utc>,
}

/// Generate a payment reference: `PAY_{12 hex chars}`.
pub fn generate_payment_reference() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("PAY_{}", hex[..12].to_ascii_uppercase())
}
