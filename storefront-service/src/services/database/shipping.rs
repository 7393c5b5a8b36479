//! Shipping destination and shipping order persistence.

use super::Database;
use crate::models::{CreateShippingOrder, ShippingDestination, ShippingOrder, ShippingOrderStatus};
use crate::services::metrics::DB_QUERY_DURATION;
use rust_decimal::Decimal;
use service_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

const DESTINATION_COLUMNS: &str = "destination_id, name, destination_type, shipping_fee, base_fee, per_kg_fee, estimated_days, delivery_time_description, allowed_items, packaging_standards, customs_notice, is_pickup_available, pickup_location, pickup_schedule, is_active";

const SHIPPING_ORDER_COLUMNS: &str = "shipping_order_id, destination_id, contact_email, items, weight_kg, weight_fee, shipping_fee, customs_info, status, tracking_number, created_utc";

impl Database {
    /// List active destinations, optionally filtered by type.
    #[instrument(skip(self))]
    pub async fn list_shipping_destinations(
        &self,
        destination_type: Option<&str>,
    ) -> Result<Vec<ShippingDestination>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_shipping_destinations"])
            .start_timer();

        let destinations = sqlx::query_as::<_, ShippingDestination>(&format!(
            r#"
            SELECT {}
            FROM shipping_destinations
            WHERE is_active = TRUE
              AND ($1::varchar IS NULL OR destination_type = $1)
            ORDER BY destination_type, name
            "#,
            DESTINATION_COLUMNS
        ))
        .bind(destination_type)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list destinations: {}", e))
        })?;

        timer.observe_duration();

        Ok(destinations)
    }

    /// Get one destination by id.
    #[instrument(skip(self), fields(destination_id = %destination_id))]
    pub async fn get_shipping_destination(
        &self,
        destination_id: Uuid,
    ) -> Result<Option<ShippingDestination>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_shipping_destination"])
            .start_timer();

        let destination = sqlx::query_as::<_, ShippingDestination>(&format!(
            "SELECT {} FROM shipping_destinations WHERE destination_id = $1 AND is_active = TRUE",
            DESTINATION_COLUMNS
        ))
        .bind(destination_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get destination: {}", e))
        })?;

        timer.observe_duration();

        Ok(destination)
    }

    /// Create a shipping order with server-computed fees.
    #[instrument(skip(self, input), fields(destination_id = %input.destination_id))]
    pub async fn create_shipping_order(
        &self,
        input: &CreateShippingOrder,
        weight_fee: Decimal,
        shipping_fee: Decimal,
    ) -> Result<ShippingOrder, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_shipping_order"])
            .start_timer();

        let order = sqlx::query_as::<_, ShippingOrder>(&format!(
            r#"
            INSERT INTO shipping_orders (shipping_order_id, destination_id, contact_email, items, weight_kg, weight_fee, shipping_fee, customs_info, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            SHIPPING_ORDER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(input.destination_id)
        .bind(&input.contact_email)
        .bind(&input.items)
        .bind(input.weight_kg)
        .bind(weight_fee)
        .bind(shipping_fee)
        .bind(&input.customs_info)
        .bind(ShippingOrderStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create shipping order: {}", e))
        })?;

        timer.observe_duration();

        Ok(order)
    }

    /// List a customer's shipping orders, newest first.
    #[instrument(skip(self, contact_email))]
    pub async fn list_shipping_orders_by_email(
        &self,
        contact_email: &str,
    ) -> Result<Vec<ShippingOrder>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_shipping_orders_by_email"])
            .start_timer();

        let orders = sqlx::query_as::<_, ShippingOrder>(&format!(
            "SELECT {} FROM shipping_orders WHERE contact_email = $1 ORDER BY created_utc DESC",
            SHIPPING_ORDER_COLUMNS
        ))
        .bind(contact_email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list shipping orders: {}", e))
        })?;

        timer.observe_duration();

        Ok(orders)
    }

    /// Get a shipping order by id.
    #[instrument(skip(self), fields(shipping_order_id = %shipping_order_id))]
    pub async fn get_shipping_order(
        &self,
        shipping_order_id: Uuid,
    ) -> Result<Option<ShippingOrder>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_shipping_order"])
            .start_timer();

        let order = sqlx::query_as::<_, ShippingOrder>(&format!(
            "SELECT {} FROM shipping_orders WHERE shipping_order_id = $1",
            SHIPPING_ORDER_COLUMNS
        ))
        .bind(shipping_order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get shipping order: {}", e))
        })?;

        timer.observe_duration();

        Ok(order)
    }

    /// Advance a shipping order through its fulfilment states.
    #[instrument(skip(self), fields(shipping_order_id = %shipping_order_id, status = status.as_str()))]
    pub async fn update_shipping_order_status(
        &self,
        shipping_order_id: Uuid,
        status: ShippingOrderStatus,
        tracking_number: Option<&str>,
    ) -> Result<Option<ShippingOrder>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_shipping_order_status"])
            .start_timer();

        let order = sqlx::query_as::<_, ShippingOrder>(&format!(
            r#"
            UPDATE shipping_orders
            SET status = $2, tracking_number = COALESCE($3, tracking_number)
            WHERE shipping_order_id = $1
            RETURNING {}
            "#,
            SHIPPING_ORDER_COLUMNS
        ))
        .bind(shipping_order_id)
        .bind(status.as_str())
        .bind(tracking_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update shipping order: {}", e))
        })?;

        timer.observe_duration();

        Ok(order)
    }
}
