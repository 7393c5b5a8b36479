//! Order persistence.

use super::Database;
use crate::models::{Order, OrderItem, OrderPaymentStatus, OrderStatus};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

const ORDER_COLUMNS: &str = "order_id, order_number, order_type, status, cart_id, subtotal, shipping_fee, tax, discount, total, shipping_name, shipping_email, shipping_phone, shipping_address, shipping_city, shipping_state, shipping_country, shipping_zip, delivery_date, special_instructions, payment_method, payment_status, payment_reference, paid_utc, tracking_number, notes, created_utc, updated_utc";

impl Database {
    /// Insert an order and its snapshotted lines in one transaction.
    #[instrument(skip(self, order, items), fields(order_number = %order.order_number))]
    pub async fn create_order(&self, order: &Order, items: &[OrderItem]) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_order"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO orders (order_id, order_number, order_type, status, cart_id,
                subtotal, shipping_fee, tax, discount, total,
                shipping_name, shipping_email, shipping_phone, shipping_address,
                shipping_city, shipping_state, shipping_country, shipping_zip,
                delivery_date, special_instructions,
                payment_method, payment_status, payment_reference)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23)
            "#,
        )
        .bind(order.order_id)
        .bind(&order.order_number)
        .bind(&order.order_type)
        .bind(&order.status)
        .bind(order.cart_id)
        .bind(order.subtotal)
        .bind(order.shipping_fee)
        .bind(order.tax)
        .bind(order.discount)
        .bind(order.total)
        .bind(&order.shipping_name)
        .bind(&order.shipping_email)
        .bind(&order.shipping_phone)
        .bind(&order.shipping_address)
        .bind(&order.shipping_city)
        .bind(&order.shipping_state)
        .bind(&order.shipping_country)
        .bind(&order.shipping_zip)
        .bind(order.delivery_date)
        .bind(&order.special_instructions)
        .bind(&order.payment_method)
        .bind(&order.payment_status)
        .bind(&order.payment_reference)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to insert order: {}", e)))?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_item_id, order_id, menu_item_id, item_name,
                    quantity, unit_price, subtotal, special_instructions)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(item.order_item_id)
            .bind(item.order_id)
            .bind(item.menu_item_id)
            .bind(&item.item_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.subtotal)
            .bind(&item.special_instructions)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert order item: {}", e))
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit order: {}", e))
        })?;

        timer.observe_duration();
        info!(order_id = %order.order_id, total = %order.total, "Order created");

        Ok(())
    }

    /// Get an order by its public order number.
    #[instrument(skip(self))]
    pub async fn get_order_by_number(&self, order_number: &str) -> Result<Option<Order>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_order_by_number"])
            .start_timer();

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE order_number = $1",
            ORDER_COLUMNS
        ))
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get order: {}", e)))?;

        timer.observe_duration();

        Ok(order)
    }

    /// Get an order by id.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<Order>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_order"])
            .start_timer();

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE order_id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get order: {}", e)))?;

        timer.observe_duration();

        Ok(order)
    }

    /// Get an order by the payment reference attached at checkout.
    #[instrument(skip(self))]
    pub async fn get_order_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Order>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_order_by_payment_reference"])
            .start_timer();

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE payment_reference = $1",
            ORDER_COLUMNS
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get order: {}", e)))?;

        timer.observe_duration();

        Ok(order)
    }

    /// List a customer's orders, newest first.
    #[instrument(skip(self, email))]
    pub async fn list_orders_by_email(&self, email: &str) -> Result<Vec<Order>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_orders_by_email"])
            .start_timer();

        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE shipping_email = $1 ORDER BY created_utc DESC",
            ORDER_COLUMNS
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list orders: {}", e)))?;

        timer.observe_duration();

        Ok(orders)
    }

    /// List the snapshotted lines of an order.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn list_order_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_order_items"])
            .start_timer();

        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT order_item_id, order_id, menu_item_id, item_name, quantity, unit_price, subtotal, special_instructions
            FROM order_items
            WHERE order_id = $1
            ORDER BY item_name
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list order items: {}", e))
        })?;

        timer.observe_duration();

        Ok(items)
    }

    /// Move an order to a new lifecycle status.
    #[instrument(skip(self), fields(status = status.as_str()))]
    pub async fn update_order_status(
        &self,
        order_number: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_order_status"])
            .start_timer();

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2, updated_utc = NOW() WHERE order_number = $1 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(order_number)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update order status: {}", e))
        })?;

        timer.observe_duration();

        Ok(order)
    }

    /// Settle an order after a successful charge: paid, processing, with
    /// the settlement timestamp.
    #[instrument(skip(self))]
    pub async fn mark_order_paid(&self, reference: &str) -> Result<Option<Order>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["mark_order_paid"])
            .start_timer();

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET payment_status = $2, status = $3, paid_utc = NOW(), updated_utc = NOW()
            WHERE payment_reference = $1
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(reference)
        .bind(OrderPaymentStatus::Paid.as_str())
        .bind(OrderStatus::Processing.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to mark paid: {}", e)))?;

        timer.observe_duration();

        if let Some(o) = &order {
            info!(order_number = %o.order_number, "Order settled");
        }

        Ok(order)
    }

    /// Set a dispatch tracking number.
    #[instrument(skip(self))]
    pub async fn set_order_tracking_number(
        &self,
        order_number: &str,
        tracking_number: &str,
    ) -> Result<Option<Order>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["set_order_tracking_number"])
            .start_timer();

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET tracking_number = $2, status = $3, updated_utc = NOW()
            WHERE order_number = $1
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(order_number)
        .bind(tracking_number)
        .bind(OrderStatus::Dispatched.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to set tracking number: {}", e))
        })?;

        timer.observe_duration();

        Ok(order)
    }
}
