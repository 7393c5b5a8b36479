//! Blog handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::models::{slugify, BlogComment, BlogPost, CreateBlogPost};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub author_name: String,
    #[serde(default)]
    pub excerpt: String,
    #[validate(length(min = 1))]
    pub body: String,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize)]
pub struct ModerateCommentRequest {
    pub is_approved: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 100))]
    pub author: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, AppError> {
    let posts = state.db.list_blog_posts().await?;
    Ok(Json(posts))
}

/// Fetch a post. Each retrieval counts as a view.
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    let post = state
        .db
        .get_blog_post_and_count_view(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Post not found")))?;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<BlogPost>), AppError> {
    payload.validate()?;

    let input = CreateBlogPost {
        slug: slugify(&payload.title),
        title: payload.title,
        author_name: payload.author_name,
        excerpt: payload.excerpt,
        body: payload.body,
        is_published: payload.is_published,
    };

    let post = state.db.create_blog_post(&input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<BlogComment>>, AppError> {
    let post_id = state
        .db
        .get_blog_post_id(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Post not found")))?;
    let comments = state.db.list_blog_comments(post_id).await?;
    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<BlogComment>), AppError> {
    payload.validate()?;

    let post_id = state
        .db
        .get_blog_post_id(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Post not found")))?;

    let comment = state
        .db
        .create_blog_comment(post_id, &payload.author, &payload.email, &payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Approve or hide a comment. Hidden comments drop out of the public
/// listing but stay on record.
pub async fn moderate_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Json(payload): Json<ModerateCommentRequest>,
) -> Result<Json<BlogComment>, AppError> {
    let comment = state
        .db
        .set_blog_comment_approval(comment_id, payload.is_approved)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Comment not found")))?;
    Ok(Json(comment))
}
