//! Checkout and order handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::handlers::cart::CartToken;
use crate::models::{
    generate_order_number, generate_payment_reference, Order, OrderItem, OrderPaymentStatus,
    OrderStatus, OrderType, OrderView,
};
use crate::services::metrics::record_order_created;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 30))]
    pub phone: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub zip: String,
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub special_instructions: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_country() -> String {
    "Nigeria".to_string()
}

fn default_payment_method() -> String {
    "paystack".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetTrackingRequest {
    #[validate(length(min = 1, max = 100))]
    pub tracking_number: String,
}

/// Convert the caller's cart into an order.
///
/// Totals are computed server-side: flat delivery fee plus VAT on the
/// item subtotal. The cart is left intact until payment settles, so an
/// abandoned checkout costs the customer nothing.
pub async fn checkout(
    State(state): State<AppState>,
    token: CartToken,
    Json(payload): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderView>), AppError> {
    payload.validate()?;

    let cart = state
        .db
        .get_cart(&token.0)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Cart not found")))?;

    let cart_items = state.db.list_cart_items(cart.cart_id).await?;
    if cart_items.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("Cart is empty")));
    }

    let subtotal: Decimal = cart_items.iter().map(|i| i.line_subtotal()).sum();
    let shipping_fee = state.config.checkout.flat_shipping_fee;
    let tax = (subtotal * state.config.checkout.tax_rate).round_dp(2);
    let discount = Decimal::ZERO;
    let total = subtotal + shipping_fee + tax - discount;

    let now = Utc::now();
    let order_id = Uuid::new_v4();
    let order = Order {
        order_id,
        order_number: generate_order_number(now),
        order_type: OrderType::Single.as_str().to_string(),
        status: OrderStatus::PaymentPending.as_str().to_string(),
        cart_id: Some(cart.cart_id),
        subtotal,
        shipping_fee,
        tax,
        discount,
        total,
        shipping_name: payload.name,
        shipping_email: payload.email,
        shipping_phone: payload.phone,
        shipping_address: payload.address,
        shipping_city: payload.city,
        shipping_state: payload.state,
        shipping_country: payload.country,
        shipping_zip: payload.zip,
        delivery_date: payload.delivery_date,
        special_instructions: payload.special_instructions,
        payment_method: payload.payment_method,
        payment_status: OrderPaymentStatus::Pending.as_str().to_string(),
        payment_reference: generate_payment_reference(),
        paid_utc: None,
        tracking_number: String::new(),
        notes: String::new(),
        created_utc: now,
        updated_utc: now,
    };

    let items: Vec<OrderItem> = cart_items
        .iter()
        .map(|line| OrderItem {
            order_item_id: Uuid::new_v4(),
            order_id,
            menu_item_id: Some(line.menu_item_id),
            item_name: line.item_name.clone(),
            quantity: line.quantity,
            unit_price: line.price_at_add,
            subtotal: line.line_subtotal(),
            special_instructions: line.special_instructions.clone(),
        })
        .collect();

    state.db.create_order(&order, &items).await?;
    record_order_created(&order.order_type);

    let mailer = state.mailer.clone();
    let order_for_mail = order.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_order_confirmation(&order_for_mail).await {
            tracing::warn!(error = %e, order_number = %order_for_mail.order_number, "Order confirmation email failed");
        }
    });

    Ok((StatusCode::CREATED, Json(OrderView { order, items })))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.db.list_orders_by_email(&query.email).await?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<OrderView>, AppError> {
    let order = state
        .db
        .get_order_by_number(&order_number)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;
    let items = state.db.list_order_items(order.order_id).await?;
    Ok(Json(OrderView { order, items }))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    let status = OrderStatus::parse(&payload.status).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("Unknown order status: {}", payload.status))
    })?;

    let order = state
        .db
        .update_order_status(&order_number, status)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;
    Ok(Json(order))
}

/// Record a dispatch tracking number and move the order to dispatched.
pub async fn set_tracking(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
    Json(payload): Json<SetTrackingRequest>,
) -> Result<Json<Order>, AppError> {
    payload.validate()?;

    let order = state
        .db
        .set_order_tracking_number(&order_number, &payload.tracking_number)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;
    Ok(Json(order))
}
