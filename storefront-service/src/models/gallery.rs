//! Gallery models. Images are stored as URLs; media upload is handled
//! outside this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GalleryCategory {
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GalleryImage {
    pub image_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub image_url: String,
    pub description: String,
    pub display_order: i32,
    pub created_utc: DateTime<Utc>,
}
