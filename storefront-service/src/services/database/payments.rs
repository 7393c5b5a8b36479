//! Payment and webhook-log persistence.

use super::Database;
use crate::models::{Payment, PaymentStatus, WebhookLog};
use crate::services::metrics::DB_QUERY_DURATION;
use rust_decimal::Decimal;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

const PAYMENT_COLUMNS: &str = "payment_id, order_id, amount, currency, status, gateway, reference, authorization_url, created_utc, completed_utc";

impl Database {
    /// Record a payment attempt against an order.
    #[instrument(skip(self), fields(order_id = %order_id, reference = %reference))]
    pub async fn create_payment(
        &self,
        order_id: Uuid,
        amount: Decimal,
        currency: &str,
        gateway: &str,
        reference: &str,
        authorization_url: Option<&str>,
    ) -> Result<Payment, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_payment"])
            .start_timer();

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            INSERT INTO payments (payment_id, order_id, amount, currency, status, gateway, reference, authorization_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(amount)
        .bind(currency)
        .bind(PaymentStatus::Pending.as_str())
        .bind(gateway)
        .bind(reference)
        .bind(authorization_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Payment reference already used"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create payment: {}", e)),
        })?;

        timer.observe_duration();

        Ok(payment)
    }

    /// Find the open payment attempt for an order, if one exists. A
    /// retried initialize reuses this row instead of minting a second
    /// reference.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_pending_payment_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Option<Payment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_pending_payment_for_order"])
            .start_timer();

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            SELECT {}
            FROM payments
            WHERE order_id = $1 AND status = 'pending'
            ORDER BY created_utc DESC
            LIMIT 1
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get pending payment: {}", e))
        })?;

        timer.observe_duration();

        Ok(payment)
    }

    /// Refresh the checkout URL on an existing payment attempt.
    #[instrument(skip(self, authorization_url), fields(reference = %reference))]
    pub async fn set_payment_authorization_url(
        &self,
        reference: &str,
        authorization_url: &str,
    ) -> Result<Option<Payment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["set_payment_authorization_url"])
            .start_timer();

        let payment = sqlx::query_as::<_, Payment>(&format!(
            "UPDATE payments SET authorization_url = $2 WHERE reference = $1 RETURNING {}",
            PAYMENT_COLUMNS
        ))
        .bind(reference)
        .bind(authorization_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update payment: {}", e))
        })?;

        timer.observe_duration();

        Ok(payment)
    }

    /// Look up a payment by gateway reference.
    #[instrument(skip(self))]
    pub async fn get_payment_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Payment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_payment_by_reference"])
            .start_timer();

        let payment = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {} FROM payments WHERE reference = $1",
            PAYMENT_COLUMNS
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get payment: {}", e)))?;

        timer.observe_duration();

        Ok(payment)
    }

    /// List payment attempts for an order, newest first.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn list_payments_for_order(&self, order_id: Uuid) -> Result<Vec<Payment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_payments_for_order"])
            .start_timer();

        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {} FROM payments WHERE order_id = $1 ORDER BY created_utc DESC",
            PAYMENT_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list payments: {}", e)))?;

        timer.observe_duration();

        Ok(payments)
    }

    /// Move a payment to a terminal status. Completed payments get a
    /// settlement timestamp.
    #[instrument(skip(self), fields(reference = %reference, status = status.as_str()))]
    pub async fn update_payment_status(
        &self,
        reference: &str,
        status: PaymentStatus,
    ) -> Result<Option<Payment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_payment_status"])
            .start_timer();

        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            UPDATE payments
            SET status = $2,
                completed_utc = CASE WHEN $2 = 'completed' THEN NOW() ELSE completed_utc END
            WHERE reference = $1
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(reference)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update payment: {}", e))
        })?;

        timer.observe_duration();

        if let Some(p) = &payment {
            info!(payment_id = %p.payment_id, status = %p.status, "Payment updated");
        }

        Ok(payment)
    }

    /// Log an inbound webhook delivery. Returns `None` when the same
    /// `(reference, event)` pair was already recorded, which marks the
    /// delivery as a replay.
    #[instrument(skip(self, payload), fields(reference = %reference, event = %event))]
    pub async fn log_webhook_event(
        &self,
        reference: &str,
        event: &str,
        status: &str,
        payload: &serde_json::Value,
    ) -> Result<Option<WebhookLog>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["log_webhook_event"])
            .start_timer();

        let log = sqlx::query_as::<_, WebhookLog>(
            r#"
            INSERT INTO webhook_log (webhook_id, reference, event, status, payload)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (reference, event) DO NOTHING
            RETURNING webhook_id, reference, event, status, payload, processed, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reference)
        .bind(event)
        .bind(status)
        .bind(payload)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to log webhook: {}", e)))?;

        timer.observe_duration();

        Ok(log)
    }

    /// Mark a logged webhook as fully processed.
    #[instrument(skip(self), fields(webhook_id = %webhook_id))]
    pub async fn mark_webhook_processed(&self, webhook_id: Uuid) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["mark_webhook_processed"])
            .start_timer();

        sqlx::query("UPDATE webhook_log SET processed = TRUE WHERE webhook_id = $1")
            .bind(webhook_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to mark webhook processed: {}", e))
            })?;

        timer.observe_duration();

        Ok(())
    }
}
