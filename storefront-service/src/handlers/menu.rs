//! Menu catalog handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    slugify, CreateMenuItem, ListMenuItemsFilter, MenuCategory, MenuItem, MenuItemReview,
    UpdateMenuItem, UpsertReview,
};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub prep_time_minutes: i32,
    #[serde(default = "default_servings")]
    pub servings: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub stock_quantity: i32,
    pub calories: Option<i32>,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub allergens: String,
}

fn default_servings() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,
    pub stock_quantity: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitReviewRequest {
    #[validate(length(min = 1, max = 100))]
    pub reviewer_name: String,
    #[validate(email)]
    pub reviewer_email: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuCategory>>, AppError> {
    let categories = state.db.list_menu_categories().await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<MenuCategory>), AppError> {
    payload.validate()?;

    let slug = slugify(&payload.name);
    let category = state
        .db
        .create_menu_category(
            &payload.name,
            &slug,
            &payload.description,
            payload.display_order,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Vec<MenuItem>>, AppError> {
    let filter = ListMenuItemsFilter {
        category_slug: query.category,
        featured: query.featured,
        search: query.search,
    };
    let items = state.db.list_menu_items(&filter).await?;
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MenuItem>, AppError> {
    let item = state
        .db
        .get_menu_item_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Menu item not found")))?;
    Ok(Json(item))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<MenuItem>), AppError> {
    payload.validate()?;

    if payload.price <= Decimal::ZERO {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Price must be positive"
        )));
    }

    let input = CreateMenuItem {
        category_id: payload.category_id,
        slug: slugify(&payload.name),
        name: payload.name,
        description: payload.description,
        price: payload.price,
        prep_time_minutes: payload.prep_time_minutes,
        servings: payload.servings,
        is_featured: payload.is_featured,
        stock_quantity: payload.stock_quantity,
        calories: payload.calories,
        ingredients: payload.ingredients,
        allergens: payload.allergens,
    };

    let item = state.db.create_menu_item(&input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<MenuItem>, AppError> {
    if let Some(price) = payload.price {
        if price <= Decimal::ZERO {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Price must be positive"
            )));
        }
    }

    let existing = state
        .db
        .get_menu_item_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Menu item not found")))?;

    let input = UpdateMenuItem {
        name: payload.name,
        description: payload.description,
        price: payload.price,
        is_available: payload.is_available,
        is_featured: payload.is_featured,
        stock_quantity: payload.stock_quantity,
    };

    let item = state
        .db
        .update_menu_item(existing.item_id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Menu item not found")))?;
    Ok(Json(item))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<MenuItemReview>>, AppError> {
    let item = state
        .db
        .get_menu_item_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Menu item not found")))?;
    let reviews = state.db.list_reviews(item.item_id).await?;
    Ok(Json(reviews))
}

pub async fn submit_review(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<MenuItemReview>), AppError> {
    payload.validate()?;

    let item = state
        .db
        .get_menu_item_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Menu item not found")))?;

    let input = UpsertReview {
        item_id: item.item_id,
        reviewer_name: payload.reviewer_name,
        reviewer_email: payload.reviewer_email,
        rating: payload.rating,
        title: payload.title,
        comment: payload.comment,
    };

    let review = state.db.upsert_review(&input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}
