//! Cart operations.
//!
//! Carts are keyed by an opaque token; a token with no cart row yet gets
//! one created on first use.

use super::Database;
use crate::models::{Cart, CartItem, MenuItem};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

const CART_ITEM_COLUMNS: &str = "cart_item_id, cart_id, menu_item_id, item_name, quantity, price_at_add, special_instructions, added_utc, updated_utc";

impl Database {
    /// Fetch the cart for a token, creating it if absent.
    #[instrument(skip(self, cart_token))]
    pub async fn get_or_create_cart(&self, cart_token: &str) -> Result<Cart, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_or_create_cart"])
            .start_timer();

        let cart = sqlx::query_as::<_, Cart>(
            r#"
            INSERT INTO carts (cart_id, cart_token)
            VALUES ($1, $2)
            ON CONFLICT (cart_token)
            DO UPDATE SET updated_utc = NOW()
            RETURNING cart_id, cart_token, created_utc, updated_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(cart_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get cart: {}", e)))?;

        timer.observe_duration();

        Ok(cart)
    }

    /// Fetch an existing cart by token.
    #[instrument(skip(self, cart_token))]
    pub async fn get_cart(&self, cart_token: &str) -> Result<Option<Cart>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_cart"])
            .start_timer();

        let cart = sqlx::query_as::<_, Cart>(
            "SELECT cart_id, cart_token, created_utc, updated_utc FROM carts WHERE cart_token = $1",
        )
        .bind(cart_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get cart: {}", e)))?;

        timer.observe_duration();

        Ok(cart)
    }

    /// List the lines in a cart, oldest first.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn list_cart_items(&self, cart_id: Uuid) -> Result<Vec<CartItem>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_cart_items"])
            .start_timer();

        let items = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {} FROM cart_items WHERE cart_id = $1 ORDER BY added_utc",
            CART_ITEM_COLUMNS
        ))
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list cart items: {}", e)))?;

        timer.observe_duration();

        Ok(items)
    }

    /// Add a menu item to a cart. An existing line for the same item has
    /// its quantity increased instead; the captured price is kept from
    /// the first add.
    #[instrument(skip(self, item), fields(cart_id = %cart_id, menu_item_id = %item.item_id))]
    pub async fn add_cart_item(
        &self,
        cart_id: Uuid,
        item: &MenuItem,
        quantity: i32,
        special_instructions: &str,
    ) -> Result<CartItem, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["add_cart_item"])
            .start_timer();

        let line = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            INSERT INTO cart_items (cart_item_id, cart_id, menu_item_id, item_name, quantity, price_at_add, special_instructions)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (cart_id, menu_item_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity,
                          special_instructions = EXCLUDED.special_instructions,
                          updated_utc = NOW()
            RETURNING {}
            "#,
            CART_ITEM_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(cart_id)
        .bind(item.item_id)
        .bind(&item.name)
        .bind(quantity)
        .bind(item.price)
        .bind(special_instructions)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to add cart item: {}", e)))?;

        timer.observe_duration();

        Ok(line)
    }

    /// Set the quantity of a cart line.
    #[instrument(skip(self), fields(cart_id = %cart_id, cart_item_id = %cart_item_id))]
    pub async fn update_cart_item_quantity(
        &self,
        cart_id: Uuid,
        cart_item_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartItem>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_cart_item_quantity"])
            .start_timer();

        let line = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            UPDATE cart_items
            SET quantity = $3, updated_utc = NOW()
            WHERE cart_id = $1 AND cart_item_id = $2
            RETURNING {}
            "#,
            CART_ITEM_COLUMNS
        ))
        .bind(cart_id)
        .bind(cart_item_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update cart item: {}", e))
        })?;

        timer.observe_duration();

        Ok(line)
    }

    /// Remove a line from a cart. Returns whether a row was deleted.
    #[instrument(skip(self), fields(cart_id = %cart_id, cart_item_id = %cart_item_id))]
    pub async fn remove_cart_item(
        &self,
        cart_id: Uuid,
        cart_item_id: Uuid,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["remove_cart_item"])
            .start_timer();

        let result =
            sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND cart_item_id = $2")
                .bind(cart_id)
                .bind(cart_item_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to remove cart item: {}", e))
                })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    /// Remove every line from a cart.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn clear_cart(&self, cart_id: Uuid) -> Result<u64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["clear_cart"])
            .start_timer();

        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to clear cart: {}", e)))?;

        timer.observe_duration();

        Ok(result.rows_affected())
    }
}
