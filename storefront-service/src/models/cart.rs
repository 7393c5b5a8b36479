//! Shopping cart models.
//!
//! Carts are anonymous-capable: each cart is identified by an opaque
//! token the client presents in the `x-cart-token` header.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cart {
    pub cart_id: Uuid,
    pub cart_token: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// A line in a cart. `price_at_add` is the menu price captured when the
/// line was created, so cart totals do not move under the customer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartItem {
    pub cart_item_id: Uuid,
    pub cart_id: Uuid,
    pub menu_item_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
    pub price_at_add: Decimal,
    pub special_instructions: String,
    pub added_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl CartItem {
    pub fn line_subtotal(&self) -> Decimal {
        self.price_at_add * Decimal::from(self.quantity)
    }
}

/// Cart with its lines and derived totals, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub cart_token: String,
    pub items: Vec<CartItem>,
    pub item_count: i64,
    pub subtotal: Decimal,
}

impl CartView {
    pub fn new(cart: &Cart, items: Vec<CartItem>) -> Self {
        let item_count = items.iter().map(|i| i.quantity as i64).sum();
        let subtotal = items.iter().map(CartItem::line_subtotal).sum();
        Self {
            cart_token: cart.cart_token.clone(),
            items,
            item_count,
            subtotal,
        }
    }
}
