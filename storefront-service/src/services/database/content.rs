//! Blog and gallery persistence.

use super::Database;
use crate::models::{BlogComment, BlogPost, CreateBlogPost, GalleryCategory, GalleryImage};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

const POST_COLUMNS: &str = "post_id, title, slug, author_name, excerpt, body, is_published, publish_utc, view_count, created_utc, updated_utc";

impl Database {
    /// List published posts, newest first.
    #[instrument(skip(self))]
    pub async fn list_blog_posts(&self) -> Result<Vec<BlogPost>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_blog_posts"])
            .start_timer();

        let posts = sqlx::query_as::<_, BlogPost>(&format!(
            r#"
            SELECT {}
            FROM blog_posts
            WHERE is_published = TRUE
            ORDER BY publish_utc DESC NULLS LAST, created_utc DESC
            "#,
            POST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list posts: {}", e)))?;

        timer.observe_duration();

        Ok(posts)
    }

    /// Fetch a published post by slug and bump its view count in the
    /// same statement.
    #[instrument(skip(self))]
    pub async fn get_blog_post_and_count_view(
        &self,
        slug: &str,
    ) -> Result<Option<BlogPost>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_blog_post_and_count_view"])
            .start_timer();

        let post = sqlx::query_as::<_, BlogPost>(&format!(
            r#"
            UPDATE blog_posts
            SET view_count = view_count + 1
            WHERE slug = $1 AND is_published = TRUE
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get post: {}", e)))?;

        timer.observe_duration();

        Ok(post)
    }

    /// Create a post. Publishing stamps the publish time.
    #[instrument(skip(self, input), fields(slug = %input.slug))]
    pub async fn create_blog_post(&self, input: &CreateBlogPost) -> Result<BlogPost, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_blog_post"])
            .start_timer();

        let post = sqlx::query_as::<_, BlogPost>(&format!(
            r#"
            INSERT INTO blog_posts (post_id, title, slug, author_name, excerpt, body, is_published, publish_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, CASE WHEN $7 THEN NOW() ELSE NULL END)
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.author_name)
        .bind(&input.excerpt)
        .bind(&input.body)
        .bind(input.is_published)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("A post with this slug already exists"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create post: {}", e)),
        })?;

        timer.observe_duration();

        Ok(post)
    }

    /// List visible comments on a post, oldest first.
    #[instrument(skip(self), fields(post_id = %post_id))]
    pub async fn list_blog_comments(&self, post_id: Uuid) -> Result<Vec<BlogComment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_blog_comments"])
            .start_timer();

        let comments = sqlx::query_as::<_, BlogComment>(
            r#"
            SELECT comment_id, post_id, author, email, content, is_approved, created_utc
            FROM blog_comments
            WHERE post_id = $1 AND is_approved = TRUE
            ORDER BY created_utc
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list comments: {}", e)))?;

        timer.observe_duration();

        Ok(comments)
    }

    /// Add a comment to a post.
    #[instrument(skip(self, author, email, content), fields(post_id = %post_id))]
    pub async fn create_blog_comment(
        &self,
        post_id: Uuid,
        author: &str,
        email: &str,
        content: &str,
    ) -> Result<BlogComment, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_blog_comment"])
            .start_timer();

        let comment = sqlx::query_as::<_, BlogComment>(
            r#"
            INSERT INTO blog_comments (comment_id, post_id, author, email, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING comment_id, post_id, author, email, content, is_approved, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(author)
        .bind(email)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create comment: {}", e)))?;

        timer.observe_duration();

        Ok(comment)
    }

    /// Approve or hide a comment.
    #[instrument(skip(self), fields(comment_id = %comment_id, approved = approved))]
    pub async fn set_blog_comment_approval(
        &self,
        comment_id: Uuid,
        approved: bool,
    ) -> Result<Option<BlogComment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["set_blog_comment_approval"])
            .start_timer();

        let comment = sqlx::query_as::<_, BlogComment>(
            r#"
            UPDATE blog_comments
            SET is_approved = $2
            WHERE comment_id = $1
            RETURNING comment_id, post_id, author, email, content, is_approved, created_utc
            "#,
        )
        .bind(comment_id)
        .bind(approved)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to moderate comment: {}", e))
        })?;

        timer.observe_duration();

        Ok(comment)
    }

    /// Get a published post id by slug, without counting a view.
    #[instrument(skip(self))]
    pub async fn get_blog_post_id(&self, slug: &str) -> Result<Option<Uuid>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_blog_post_id"])
            .start_timer();

        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT post_id FROM blog_posts WHERE slug = $1 AND is_published = TRUE")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to get post: {}", e))
                })?;

        timer.observe_duration();

        Ok(row.map(|(id,)| id))
    }

    /// List gallery categories.
    #[instrument(skip(self))]
    pub async fn list_gallery_categories(&self) -> Result<Vec<GalleryCategory>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_gallery_categories"])
            .start_timer();

        let categories = sqlx::query_as::<_, GalleryCategory>(
            "SELECT category_id, name, slug FROM gallery_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list gallery categories: {}", e))
        })?;

        timer.observe_duration();

        Ok(categories)
    }

    /// List gallery images, optionally narrowed to a category slug.
    #[instrument(skip(self))]
    pub async fn list_gallery_images(
        &self,
        category_slug: Option<&str>,
    ) -> Result<Vec<GalleryImage>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_gallery_images"])
            .start_timer();

        let images = sqlx::query_as::<_, GalleryImage>(
            r#"
            SELECT gi.image_id, gi.category_id, gi.title, gi.image_url, gi.description,
                   gi.display_order, gi.created_utc
            FROM gallery_images gi
            JOIN gallery_categories gc ON gi.category_id = gc.category_id
            WHERE ($1::varchar IS NULL OR gc.slug = $1)
            ORDER BY gi.display_order, gi.created_utc DESC
            "#,
        )
        .bind(category_slug)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list images: {}", e)))?;

        timer.observe_duration();

        Ok(images)
    }
}
