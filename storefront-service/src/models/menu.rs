//! Menu catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Menu item category (soups, proteins, rice meals, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuCategory {
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
}

/// Menu item available for purchase.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    pub item_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub prep_time_minutes: i32,
    pub servings: i32,
    pub is_available: bool,
    pub is_featured: bool,
    pub stock_quantity: i32,
    pub calories: Option<i32>,
    pub ingredients: String,
    pub allergens: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Customer review for a menu item. One review per reviewer per item;
/// re-submitting replaces the previous rating and text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItemReview {
    pub review_id: Uuid,
    pub item_id: Uuid,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub rating: i32,
    pub title: String,
    pub comment: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for creating a menu item.
#[derive(Debug, Clone)]
pub struct CreateMenuItem {
    pub category_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub prep_time_minutes: i32,
    pub servings: i32,
    pub is_featured: bool,
    pub stock_quantity: i32,
    pub calories: Option<i32>,
    pub ingredients: String,
    pub allergens: String,
}

/// Input for updating a menu item. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateMenuItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
    pub stock_quantity: Option<i32>,
}

/// Input for recording a review.
#[derive(Debug, Clone)]
pub struct UpsertReview {
    pub item_id: Uuid,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub rating: i32,
    pub title: String,
    pub comment: String,
}

/// Filter parameters for listing menu items.
#[derive(Debug, Clone, Default)]
pub struct ListMenuItemsFilter {
    pub category_slug: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}
