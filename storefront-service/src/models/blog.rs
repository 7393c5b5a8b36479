//! Blog posts and comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogPost {
    pub post_id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_name: String,
    pub excerpt: String,
    pub body: String,
    pub is_published: bool,
    pub publish_utc: Option<DateTime<Utc>>,
    pub view_count: i32,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Comments are visible by default and can be hidden by moderation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogComment {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub author: String,
    pub email: String,
    pub content: String,
    pub is_approved: bool,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct CreateBlogPost {
    pub title: String,
    pub slug: String,
    pub author_name: String,
    pub excerpt: String,
    pub body: String,
    pub is_published: bool,
}
