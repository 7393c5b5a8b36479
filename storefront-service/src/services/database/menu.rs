//! Menu catalog operations.

use super::Database;
use crate::models::{
    CreateMenuItem, ListMenuItemsFilter, MenuCategory, MenuItem, MenuItemReview, UpdateMenuItem,
    UpsertReview,
};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

const MENU_ITEM_COLUMNS: &str = "item_id, category_id, name, slug, description, price, prep_time_minutes, servings, is_available, is_featured, stock_quantity, calories, ingredients, allergens, created_utc, updated_utc";

impl Database {
    /// List active menu categories ordered for display.
    #[instrument(skip(self))]
    pub async fn list_menu_categories(&self) -> Result<Vec<MenuCategory>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_menu_categories"])
            .start_timer();

        let categories = sqlx::query_as::<_, MenuCategory>(
            r#"
            SELECT category_id, name, slug, description, display_order, is_active, created_utc
            FROM menu_categories
            WHERE is_active = TRUE
            ORDER BY display_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list categories: {}", e)))?;

        timer.observe_duration();

        Ok(categories)
    }

    /// Create a menu category.
    #[instrument(skip(self))]
    pub async fn create_menu_category(
        &self,
        name: &str,
        slug: &str,
        description: &str,
        display_order: i32,
    ) -> Result<MenuCategory, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_menu_category"])
            .start_timer();

        let category = sqlx::query_as::<_, MenuCategory>(
            r#"
            INSERT INTO menu_categories (category_id, name, slug, description, display_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING category_id, name, slug, description, display_order, is_active, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Category already exists"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create category: {}", e)),
        })?;

        timer.observe_duration();

        Ok(category)
    }

    /// List available menu items, filtered and searched.
    #[instrument(skip(self, filter))]
    pub async fn list_menu_items(
        &self,
        filter: &ListMenuItemsFilter,
    ) -> Result<Vec<MenuItem>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_menu_items"])
            .start_timer();

        let search = filter.search.as_ref().map(|s| format!("%{}%", s));

        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT mi.item_id, mi.category_id, mi.name, mi.slug, mi.description, mi.price,
                   mi.prep_time_minutes, mi.servings, mi.is_available, mi.is_featured,
                   mi.stock_quantity, mi.calories, mi.ingredients, mi.allergens,
                   mi.created_utc, mi.updated_utc
            FROM menu_items mi
            LEFT JOIN menu_categories mc ON mi.category_id = mc.category_id
            WHERE mi.is_available = TRUE
              AND ($1::varchar IS NULL OR mc.slug = $1)
              AND ($2::bool IS NULL OR mi.is_featured = $2)
              AND ($3::varchar IS NULL OR mi.name ILIKE $3 OR mi.description ILIKE $3 OR mi.ingredients ILIKE $3)
            ORDER BY mi.is_featured DESC, mi.created_utc DESC
            "#,
        )
        .bind(&filter.category_slug)
        .bind(filter.featured)
        .bind(&search)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list menu items: {}", e)))?;

        timer.observe_duration();

        Ok(items)
    }

    /// Get a menu item by slug.
    #[instrument(skip(self))]
    pub async fn get_menu_item_by_slug(&self, slug: &str) -> Result<Option<MenuItem>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_menu_item_by_slug"])
            .start_timer();

        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {} FROM menu_items WHERE slug = $1",
            MENU_ITEM_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get menu item: {}", e)))?;

        timer.observe_duration();

        Ok(item)
    }

    /// Get a menu item by id.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn get_menu_item(&self, item_id: Uuid) -> Result<Option<MenuItem>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_menu_item"])
            .start_timer();

        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {} FROM menu_items WHERE item_id = $1",
            MENU_ITEM_COLUMNS
        ))
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get menu item: {}", e)))?;

        timer.observe_duration();

        Ok(item)
    }

    /// Create a menu item.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_menu_item(&self, input: &CreateMenuItem) -> Result<MenuItem, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_menu_item"])
            .start_timer();

        let item = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            INSERT INTO menu_items (item_id, category_id, name, slug, description, price, prep_time_minutes, servings, is_featured, stock_quantity, calories, ingredients, allergens)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            MENU_ITEM_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.prep_time_minutes)
        .bind(input.servings)
        .bind(input.is_featured)
        .bind(input.stock_quantity)
        .bind(input.calories)
        .bind(&input.ingredients)
        .bind(&input.allergens)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("A menu item with this slug already exists"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create menu item: {}", e)),
        })?;

        timer.observe_duration();
        info!(item_id = %item.item_id, name = %item.name, "Menu item created");

        Ok(item)
    }

    /// Update a menu item. `None` fields keep their current value.
    #[instrument(skip(self, input), fields(item_id = %item_id))]
    pub async fn update_menu_item(
        &self,
        item_id: Uuid,
        input: &UpdateMenuItem,
    ) -> Result<Option<MenuItem>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_menu_item"])
            .start_timer();

        let item = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            UPDATE menu_items
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                is_available = COALESCE($5, is_available),
                is_featured = COALESCE($6, is_featured),
                stock_quantity = COALESCE($7, stock_quantity),
                updated_utc = NOW()
            WHERE item_id = $1
            RETURNING {}
            "#,
            MENU_ITEM_COLUMNS
        ))
        .bind(item_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.is_available)
        .bind(input.is_featured)
        .bind(input.stock_quantity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update menu item: {}", e)))?;

        timer.observe_duration();

        Ok(item)
    }

    /// List reviews for a menu item, newest first.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn list_reviews(&self, item_id: Uuid) -> Result<Vec<MenuItemReview>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_reviews"])
            .start_timer();

        let reviews = sqlx::query_as::<_, MenuItemReview>(
            r#"
            SELECT review_id, item_id, reviewer_name, reviewer_email, rating, title, comment, created_utc, updated_utc
            FROM menu_item_reviews
            WHERE item_id = $1
            ORDER BY created_utc DESC
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list reviews: {}", e)))?;

        timer.observe_duration();

        Ok(reviews)
    }

    /// Insert a review, or replace the reviewer's previous one for the
    /// same item.
    #[instrument(skip(self, input), fields(item_id = %input.item_id))]
    pub async fn upsert_review(&self, input: &UpsertReview) -> Result<MenuItemReview, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["upsert_review"])
            .start_timer();

        let review = sqlx::query_as::<_, MenuItemReview>(
            r#"
            INSERT INTO menu_item_reviews (review_id, item_id, reviewer_name, reviewer_email, rating, title, comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (item_id, reviewer_email)
            DO UPDATE SET rating = EXCLUDED.rating,
                          reviewer_name = EXCLUDED.reviewer_name,
                          title = EXCLUDED.title,
                          comment = EXCLUDED.comment,
                          updated_utc = NOW()
            RETURNING review_id, item_id, reviewer_name, reviewer_email, rating, title, comment, created_utc, updated_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.item_id)
        .bind(&input.reviewer_name)
        .bind(&input.reviewer_email)
        .bind(input.rating)
        .bind(&input.title)
        .bind(&input.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to save review: {}", e)))?;

        timer.observe_duration();

        Ok(review)
    }
}
