//! Training package and enquiry persistence.

use super::Database;
use crate::models::{EnquiryStatus, TrainingEnquiry, TrainingPackage};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

const TRAINING_PACKAGE_COLUMNS: &str = "package_id, package_type, title, slug, description, price, features, includes_certification, is_for_beginners, is_advanced, is_upgrade, is_housewife, is_active, display_order, created_utc, updated_utc";

const TRAINING_ENQUIRY_COLUMNS: &str =
    "enquiry_id, package_id, name, email, phone, message, status, created_utc";

impl Database {
    /// List active training packages in display order.
    #[instrument(skip(self))]
    pub async fn list_training_packages(
        &self,
        package_type: Option<&str>,
    ) -> Result<Vec<TrainingPackage>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_training_packages"])
            .start_timer();

        let packages = sqlx::query_as::<_, TrainingPackage>(&format!(
            r#"
            SELECT {}
            FROM training_packages
            WHERE is_active = TRUE
              AND ($1::varchar IS NULL OR package_type = $1)
            ORDER BY display_order, title
            "#,
            TRAINING_PACKAGE_COLUMNS
        ))
        .bind(package_type)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list training packages: {}", e))
        })?;

        timer.observe_duration();

        Ok(packages)
    }

    /// Get a training package by slug.
    #[instrument(skip(self))]
    pub async fn get_training_package_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<TrainingPackage>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_training_package_by_slug"])
            .start_timer();

        let package = sqlx::query_as::<_, TrainingPackage>(&format!(
            "SELECT {} FROM training_packages WHERE slug = $1 AND is_active = TRUE",
            TRAINING_PACKAGE_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get training package: {}", e))
        })?;

        timer.observe_duration();

        Ok(package)
    }

    /// Get a training package by id.
    #[instrument(skip(self), fields(package_id = %package_id))]
    pub async fn get_training_package(
        &self,
        package_id: Uuid,
    ) -> Result<Option<TrainingPackage>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_training_package"])
            .start_timer();

        let package = sqlx::query_as::<_, TrainingPackage>(&format!(
            "SELECT {} FROM training_packages WHERE package_id = $1 AND is_active = TRUE",
            TRAINING_PACKAGE_COLUMNS
        ))
        .bind(package_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get training package: {}", e))
        })?;

        timer.observe_duration();

        Ok(package)
    }

    /// Submit a training enquiry. New enquiries start `pending`.
    #[instrument(skip(self, name, email, phone, message), fields(package_id = %package_id))]
    pub async fn create_training_enquiry(
        &self,
        package_id: Uuid,
        name: &str,
        email: &str,
        phone: &str,
        message: &str,
    ) -> Result<TrainingEnquiry, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_training_enquiry"])
            .start_timer();

        let enquiry = sqlx::query_as::<_, TrainingEnquiry>(&format!(
            r#"
            INSERT INTO training_enquiries (enquiry_id, package_id, name, email, phone, message, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            TRAINING_ENQUIRY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(package_id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(message)
        .bind(EnquiryStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create training enquiry: {}", e))
        })?;

        timer.observe_duration();
        info!(enquiry_id = %enquiry.enquiry_id, "Training enquiry received");

        Ok(enquiry)
    }

    /// Get one training enquiry by id.
    #[instrument(skip(self), fields(enquiry_id = %enquiry_id))]
    pub async fn get_training_enquiry(
        &self,
        enquiry_id: Uuid,
    ) -> Result<Option<TrainingEnquiry>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_training_enquiry"])
            .start_timer();

        let enquiry = sqlx::query_as::<_, TrainingEnquiry>(&format!(
            "SELECT {} FROM training_enquiries WHERE enquiry_id = $1",
            TRAINING_ENQUIRY_COLUMNS
        ))
        .bind(enquiry_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get training enquiry: {}", e))
        })?;

        timer.observe_duration();

        Ok(enquiry)
    }

    /// Move a training enquiry through its follow-up states.
    #[instrument(skip(self), fields(enquiry_id = %enquiry_id, status = status.as_str()))]
    pub async fn update_training_enquiry_status(
        &self,
        enquiry_id: Uuid,
        status: EnquiryStatus,
    ) -> Result<Option<TrainingEnquiry>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_training_enquiry_status"])
            .start_timer();

        let enquiry = sqlx::query_as::<_, TrainingEnquiry>(&format!(
            "UPDATE training_enquiries SET status = $2 WHERE enquiry_id = $1 RETURNING {}",
            TRAINING_ENQUIRY_COLUMNS
        ))
        .bind(enquiry_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update training enquiry: {}", e))
        })?;

        timer.observe_duration();

        Ok(enquiry)
    }
}
