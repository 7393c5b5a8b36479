//! Payment handlers: checkout initialization, verification and the
//! Paystack webhook.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use service_core::error::AppError;
use validator::Validate;

use crate::models::{Order, OrderPaymentStatus, Payment, PaymentStatus};
use crate::services::metrics::{record_payment_initialized, record_webhook_event};
use crate::services::paystack::SIGNATURE_HEADER;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct InitializePaymentRequest {
    #[validate(length(min = 1))]
    pub order_number: String,
}

#[derive(Debug, Serialize)]
pub struct InitializePaymentResponse {
    pub reference: String,
    pub authorization_url: String,
    pub access_code: String,
    pub amount: Decimal,
    pub currency: String,
    pub public_key: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub reference: String,
    pub payment_status: String,
    pub order_status: String,
    pub order_number: String,
}

/// Start a Paystack checkout for an order.
///
/// The gateway wants the amount in kobo; the order total is converted
/// here and never taken from the client.
pub async fn initialize(
    State(state): State<AppState>,
    Json(payload): Json<InitializePaymentRequest>,
) -> Result<(StatusCode, Json<InitializePaymentResponse>), AppError> {
    payload.validate()?;

    let order = state
        .db
        .get_order_by_number(&payload.order_number)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;

    if order.payment_status == OrderPaymentStatus::Paid.as_str() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Order is already paid"
        )));
    }

    let amount_kobo = (order.total * Decimal::from(100))
        .round_dp(0)
        .to_i64()
        .ok_or_else(|| AppError::InternalError(anyhow::anyhow!("Order total out of range")))?;

    let callback_url = format!(
        "{}/orders/{}",
        state.config.paystack.callback_base_url, order.order_number
    );

    // A retried checkout reuses the open payment attempt; only the
    // first initialize creates one.
    let pending = state
        .db
        .get_pending_payment_for_order(order.order_id)
        .await?;
    let reference = pending
        .as_ref()
        .map(|p| p.reference.clone())
        .unwrap_or_else(|| order.payment_reference.clone());

    let currency = state.config.checkout.currency.clone();
    let initialized = state
        .paystack
        .initialize_transaction(
            &reference,
            amount_kobo,
            &order.shipping_email,
            &currency,
            Some(&callback_url),
        )
        .await
        .map_err(|e| {
            record_payment_initialized("paystack", "error");
            AppError::BadGateway(format!("Payment gateway error: {}", e))
        })?;

    let status = if pending.is_some() {
        state
            .db
            .set_payment_authorization_url(&initialized.reference, &initialized.authorization_url)
            .await?;
        StatusCode::OK
    } else {
        state
            .db
            .create_payment(
                order.order_id,
                order.total,
                &currency,
                "paystack",
                &initialized.reference,
                Some(&initialized.authorization_url),
            )
            .await?;
        StatusCode::CREATED
    };

    record_payment_initialized("paystack", "ok");

    Ok((
        status,
        Json(InitializePaymentResponse {
            reference: initialized.reference,
            authorization_url: initialized.authorization_url,
            access_code: initialized.access_code,
            amount: order.total,
            currency,
            public_key: state.paystack.public_key().to_string(),
        }),
    ))
}

/// Verify a payment against the gateway and settle the order if the
/// charge went through. Covers customers whose webhook was delayed.
pub async fn verify(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    let payment = state
        .db
        .get_payment_by_reference(&reference)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Payment not found")))?;

    let verified = state
        .paystack
        .verify_transaction(&reference)
        .await
        .map_err(|e| AppError::BadGateway(format!("Payment gateway error: {}", e)))?;

    let order = if verified.status == "success" {
        settle_successful_charge(&state, &reference).await?
    } else {
        // Only the payment attempt fails; the order stays open so the
        // customer can retry with a fresh initialize.
        state
            .db
            .update_payment_status(&reference, PaymentStatus::Failed)
            .await?;
        state.db.get_order(payment.order_id).await?
    };

    let order =
        order.ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;

    Ok(Json(VerifyPaymentResponse {
        reference,
        payment_status: order.payment_status.clone(),
        order_status: order.status.clone(),
        order_number: order.order_number,
    }))
}

pub async fn list_for_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let order = state
        .db
        .get_order_by_number(&order_number)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;
    let payments = state.db.list_payments_for_order(order.order_id).await?;
    Ok(Json(payments))
}

/// Inbound Paystack webhook.
///
/// The HMAC signature is checked against the raw body before anything
/// is parsed; a bad or missing signature is a 401. Deliveries are
/// deduplicated on `(reference, event)` so Paystack's retries cannot
/// settle an order twice.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            record_webhook_event("unknown", "rejected");
            AppError::Unauthorized(anyhow::anyhow!("Missing webhook signature"))
        })?;

    let valid = state
        .paystack
        .verify_webhook_signature(&body, signature)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Signature check failed: {}", e)))?;

    if !valid {
        record_webhook_event("unknown", "rejected");
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Invalid webhook signature"
        )));
    }

    let event = state
        .paystack
        .parse_webhook_event(&body)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Malformed webhook payload: {}", e)))?;

    let Some(reference) = event.data.reference.clone() else {
        tracing::warn!(event = %event.event, "Webhook without reference, acknowledging");
        record_webhook_event(&event.event, "ignored");
        return Ok(Json(json!({ "received": true })));
    };

    let payload: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Malformed webhook payload: {}", e)))?;

    let charge_status = event.data.status.clone().unwrap_or_default();
    let log = state
        .db
        .log_webhook_event(&reference, &event.event, &charge_status, &payload)
        .await?;

    let Some(log) = log else {
        tracing::info!(reference = %reference, event = %event.event, "Duplicate webhook delivery");
        record_webhook_event(&event.event, "duplicate");
        return Ok(Json(json!({ "received": true, "duplicate": true })));
    };

    match event.event.as_str() {
        "charge.success" => {
            settle_successful_charge(&state, &reference).await?;
            state.db.mark_webhook_processed(log.webhook_id).await?;
            record_webhook_event(&event.event, "processed");
        }
        "charge.failed" => {
            // The order is left untouched; a failed charge only closes
            // the payment attempt.
            state
                .db
                .update_payment_status(&reference, PaymentStatus::Failed)
                .await?;
            state.db.mark_webhook_processed(log.webhook_id).await?;
            record_webhook_event(&event.event, "processed");
        }
        other => {
            tracing::debug!(event = %other, "Unhandled webhook event");
            record_webhook_event(other, "ignored");
        }
    }

    Ok(Json(json!({ "received": true })))
}

/// Settle a successful charge: complete the payment, mark the order
/// paid and clear the cart it came from.
async fn settle_successful_charge(
    state: &AppState,
    reference: &str,
) -> Result<Option<Order>, AppError> {
    state
        .db
        .update_payment_status(reference, PaymentStatus::Completed)
        .await?;

    let order = state.db.mark_order_paid(reference).await?;

    if let Some(order) = &order {
        if let Some(cart_id) = order.cart_id {
            let cleared = state.db.clear_cart(cart_id).await?;
            tracing::info!(
                order_number = %order.order_number,
                lines_cleared = cleared,
                "Cart cleared after settlement"
            );
        }
    }

    Ok(order)
}
