//! Shipping destinations, quotes and shipping orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationType {
    Domestic,
    International,
}

impl DestinationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationType::Domestic => "domestic",
            DestinationType::International => "international",
        }
    }

    pub fn zone_label(s: &str) -> &'static str {
        if s == "international" {
            "International"
        } else {
            "Nigeria-wide"
        }
    }
}

/// A destination the kitchen ships to: a Nigerian state or an
/// international country. All fees are stored in NGN.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShippingDestination {
    pub destination_id: Uuid,
    pub name: String,
    pub destination_type: String,
    /// Flat fee, commonly used for Nigeria-wide shipping.
    pub shipping_fee: Decimal,
    /// Base fee, often used for international shipping.
    pub base_fee: Decimal,
    pub per_kg_fee: Decimal,
    pub estimated_days: i32,
    pub delivery_time_description: String,
    pub allowed_items: String,
    pub packaging_standards: String,
    pub customs_notice: String,
    pub is_pickup_available: bool,
    pub pickup_location: String,
    pub pickup_schedule: String,
    pub is_active: bool,
}

impl ShippingDestination {
    /// Quote pricing: base (base_fee when set, flat shipping_fee
    /// otherwise) plus per-kg fee times the weight.
    pub fn quote(&self, weight_kg: Decimal) -> ShippingQuote {
        let base_fee = if self.base_fee > Decimal::ZERO {
            self.base_fee
        } else {
            self.shipping_fee
        };
        let weight_fee = weight_kg * self.per_kg_fee;
        ShippingQuote {
            destination_id: self.destination_id,
            destination_name: self.name.clone(),
            zone: DestinationType::zone_label(&self.destination_type).to_string(),
            weight_kg,
            base_fee,
            weight_fee,
            total_fee: base_fee + weight_fee,
            delivery_time_days: self.estimated_days,
            allowed_items: self.allowed_items.clone(),
            packaging_standards: self.packaging_standards.clone(),
            customs_notice: self.customs_notice.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShippingQuote {
    pub destination_id: Uuid,
    pub destination_name: String,
    pub zone: String,
    pub weight_kg: Decimal,
    pub base_fee: Decimal,
    pub weight_fee: Decimal,
    pub total_fee: Decimal,
    pub delivery_time_days: i32,
    pub allowed_items: String,
    pub packaging_standards: String,
    pub customs_notice: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingOrderStatus {
    Pending,
    Packed,
    Shipped,
    Delivered,
}

impl ShippingOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingOrderStatus::Pending => "pending",
            ShippingOrderStatus::Packed => "packed",
            ShippingOrderStatus::Shipped => "shipped",
            ShippingOrderStatus::Delivered => "delivered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ShippingOrderStatus::Pending),
            "packed" => Some(ShippingOrderStatus::Packed),
            "shipped" => Some(ShippingOrderStatus::Shipped),
            "delivered" => Some(ShippingOrderStatus::Delivered),
            _ => None,
        }
    }
}

/// A food shipping order against a destination.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShippingOrder {
    pub shipping_order_id: Uuid,
    pub destination_id: Uuid,
    pub contact_email: String,
    pub items: serde_json::Value,
    pub weight_kg: Decimal,
    pub weight_fee: Decimal,
    pub shipping_fee: Decimal,
    pub customs_info: String,
    pub status: String,
    pub tracking_number: String,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a shipping order. Fees are computed server-side
/// from the destination's pricing, never trusted from the client.
#[derive(Debug, Clone)]
pub struct CreateShippingOrder {
    pub destination_id: Uuid,
    pub contact_email: String,
    pub items: serde_json::Value,
    pub weight_kg: Decimal,
    pub customs_info: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(base: Decimal, flat: Decimal, per_kg: Decimal, kind: &str) -> ShippingDestination {
        ShippingDestination {
            destination_id: Uuid::new_v4(),
            name: "Lagos".to_string(),
            destination_type: kind.to_string(),
            shipping_fee: flat,
            base_fee: base,
            per_kg_fee: per_kg,
            estimated_days: 3,
            delivery_time_description: String::new(),
            allowed_items: String::new(),
            packaging_standards: String::new(),
            customs_notice: String::new(),
            is_pickup_available: false,
            pickup_location: String::new(),
            pickup_schedule: String::new(),
            is_active: true,
        }
    }

    #[test]
    fn international_quote_uses_base_plus_per_kg() {
        let dest = destination(
            Decimal::new(25_000_00, 2),
            Decimal::ZERO,
            Decimal::new(8_000_00, 2),
            "international",
        );
        let quote = dest.quote(Decimal::new(25, 1)); // 2.5 kg
        assert_eq!(quote.base_fee, Decimal::new(25_000_00, 2));
        assert_eq!(quote.weight_fee, Decimal::new(20_000_00, 2));
        assert_eq!(quote.total_fee, Decimal::new(45_000_00, 2));
        assert_eq!(quote.zone, "International");
    }

    #[test]
    fn domestic_quote_falls_back_to_flat_fee() {
        let dest = destination(
            Decimal::ZERO,
            Decimal::new(3_500_00, 2),
            Decimal::ZERO,
            "domestic",
        );
        let quote = dest.quote(Decimal::new(10, 0));
        assert_eq!(quote.base_fee, Decimal::new(3_500_00, 2));
        assert_eq!(quote.weight_fee, Decimal::ZERO);
        assert_eq!(quote.total_fee, Decimal::new(3_500_00, 2));
        assert_eq!(quote.zone, "Nigeria-wide");
    }
}
