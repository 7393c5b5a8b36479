//! Shipping destination, quote and shipping order handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    CreateShippingOrder, ShippingDestination, ShippingOrder, ShippingOrderStatus, ShippingQuote,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListDestinationsQuery {
    /// `domestic` or `international`.
    pub destination_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub destination_id: Uuid,
    pub weight_kg: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateShippingOrderRequest {
    pub destination_id: Uuid,
    #[validate(email)]
    pub contact_email: String,
    /// Free-form item manifest, e.g. `[{"name": "Egusi soup", "qty": 4}]`.
    pub items: serde_json::Value,
    pub weight_kg: Decimal,
    #[serde(default)]
    pub customs_info: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateShippingStatusRequest {
    pub status: String,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListShippingOrdersQuery {
    pub email: String,
}

/// Customer-facing tracking summary for a shipping order.
#[derive(Debug, Serialize)]
pub struct ShippingTrackingView {
    pub shipping_order_id: Uuid,
    pub status: String,
    pub tracking_number: String,
    pub weight_kg: Decimal,
    pub created_utc: DateTime<Utc>,
}

pub async fn list_destinations(
    State(state): State<AppState>,
    Query(query): Query<ListDestinationsQuery>,
) -> Result<Json<Vec<ShippingDestination>>, AppError> {
    let destinations = state
        .db
        .list_shipping_destinations(query.destination_type.as_deref())
        .await?;
    Ok(Json(destinations))
}

pub async fn get_destination(
    State(state): State<AppState>,
    Path(destination_id): Path<Uuid>,
) -> Result<Json<ShippingDestination>, AppError> {
    let destination = state
        .db
        .get_shipping_destination(destination_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Destination not found")))?;
    Ok(Json(destination))
}

/// Price a shipment without creating anything.
pub async fn quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<ShippingQuote>, AppError> {
    if payload.weight_kg <= Decimal::ZERO {
        return Err(AppError::Unprocessable(anyhow::anyhow!(
            "Weight must be positive"
        )));
    }

    let destination = state
        .db
        .get_shipping_destination(payload.destination_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Destination not found")))?;

    Ok(Json(destination.quote(payload.weight_kg)))
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateShippingOrderRequest>,
) -> Result<(StatusCode, Json<ShippingOrder>), AppError> {
    payload.validate()?;

    if payload.weight_kg <= Decimal::ZERO {
        return Err(AppError::Unprocessable(anyhow::anyhow!(
            "Weight must be positive"
        )));
    }

    let destination = state
        .db
        .get_shipping_destination(payload.destination_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Destination not found")))?;

    // Fees come from the destination's pricing, not the request.
    let quote = destination.quote(payload.weight_kg);

    let input = CreateShippingOrder {
        destination_id: payload.destination_id,
        contact_email: payload.contact_email,
        items: payload.items,
        weight_kg: payload.weight_kg,
        customs_info: payload.customs_info,
    };

    let order = state
        .db
        .create_shipping_order(&input, quote.weight_fee, quote.total_fee)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListShippingOrdersQuery>,
) -> Result<Json<Vec<ShippingOrder>>, AppError> {
    let orders = state
        .db
        .list_shipping_orders_by_email(&query.email)
        .await?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(shipping_order_id): Path<Uuid>,
) -> Result<Json<ShippingOrder>, AppError> {
    let order = state
        .db
        .get_shipping_order(shipping_order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Shipping order not found")))?;
    Ok(Json(order))
}

pub async fn track_order(
    State(state): State<AppState>,
    Path(shipping_order_id): Path<Uuid>,
) -> Result<Json<ShippingTrackingView>, AppError> {
    let order = state
        .db
        .get_shipping_order(shipping_order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Shipping order not found")))?;
    Ok(Json(ShippingTrackingView {
        shipping_order_id: order.shipping_order_id,
        status: order.status,
        tracking_number: order.tracking_number,
        weight_kg: order.weight_kg,
        created_utc: order.created_utc,
    }))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(shipping_order_id): Path<Uuid>,
    Json(payload): Json<UpdateShippingStatusRequest>,
) -> Result<Json<ShippingOrder>, AppError> {
    let status = ShippingOrderStatus::parse(&payload.status).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "Unknown shipping status: {}",
            payload.status
        ))
    })?;

    let order = state
        .db
        .update_shipping_order_status(
            shipping_order_id,
            status,
            payload.tracking_number.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Shipping order not found")))?;
    Ok(Json(order))
}
