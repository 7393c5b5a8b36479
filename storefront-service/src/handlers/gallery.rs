//! Gallery handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;

use crate::models::{GalleryCategory, GalleryImage};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListImagesQuery {
    pub category: Option<String>,
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryCategory>>, AppError> {
    let categories = state.db.list_gallery_categories().await?;
    Ok(Json(categories))
}

pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ListImagesQuery>,
) -> Result<Json<Vec<GalleryImage>>, AppError> {
    let images = state
        .db
        .list_gallery_images(query.category.as_deref())
        .await?;
    Ok(Json(images))
}
