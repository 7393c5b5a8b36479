//! Catering package and enquiry persistence.

use super::Database;
use crate::models::{
    CateringCategory, CateringEnquiry, CateringPackage, CreateEnquiry, EnquiryStatus,
    ListPackagesFilter,
};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

const PACKAGE_COLUMNS: &str = "package_id, category_id, tier, title, description, min_guests, max_guests, price_min, price_max, price_per_head, menu_options, created_utc";

const ENQUIRY_COLUMNS: &str = "enquiry_id, package_id, name, email, phone, event_date, number_of_guests, message, tasting_session_requested, tasting_date, status, created_utc";

impl Database {
    /// List catering categories.
    #[instrument(skip(self))]
    pub async fn list_catering_categories(&self) -> Result<Vec<CateringCategory>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_catering_categories"])
            .start_timer();

        let categories = sqlx::query_as::<_, CateringCategory>(
            "SELECT category_id, name, description, created_utc FROM catering_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list catering categories: {}", e))
        })?;

        timer.observe_duration();

        Ok(categories)
    }

    /// List catering packages, filtered by category and tier.
    #[instrument(skip(self, filter))]
    pub async fn list_catering_packages(
        &self,
        filter: &ListPackagesFilter,
    ) -> Result<Vec<CateringPackage>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_catering_packages"])
            .start_timer();

        let packages = sqlx::query_as::<_, CateringPackage>(&format!(
            r#"
            SELECT {}
            FROM catering_packages
            WHERE ($1::uuid IS NULL OR category_id = $1)
              AND ($2::varchar IS NULL OR tier = $2)
            ORDER BY tier, min_guests
            "#,
            PACKAGE_COLUMNS
        ))
        .bind(filter.category_id)
        .bind(filter.tier.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list packages: {}", e)))?;

        timer.observe_duration();

        Ok(packages)
    }

    /// Get one catering package.
    #[instrument(skip(self), fields(package_id = %package_id))]
    pub async fn get_catering_package(
        &self,
        package_id: Uuid,
    ) -> Result<Option<CateringPackage>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_catering_package"])
            .start_timer();

        let package = sqlx::query_as::<_, CateringPackage>(&format!(
            "SELECT {} FROM catering_packages WHERE package_id = $1",
            PACKAGE_COLUMNS
        ))
        .bind(package_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get package: {}", e)))?;

        timer.observe_duration();

        Ok(package)
    }

    /// Submit a catering enquiry. New enquiries start `pending`.
    #[instrument(skip(self, input), fields(package_id = %input.package_id))]
    pub async fn create_catering_enquiry(
        &self,
        input: &CreateEnquiry,
    ) -> Result<CateringEnquiry, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_catering_enquiry"])
            .start_timer();

        let enquiry = sqlx::query_as::<_, CateringEnquiry>(&format!(
            r#"
            INSERT INTO catering_enquiries (enquiry_id, package_id, name, email, phone, event_date, number_of_guests, message, tasting_session_requested, tasting_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            ENQUIRY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(input.package_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.event_date)
        .bind(input.number_of_guests)
        .bind(&input.message)
        .bind(input.tasting_session_requested)
        .bind(input.tasting_date)
        .bind(EnquiryStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create enquiry: {}", e)))?;

        timer.observe_duration();
        info!(enquiry_id = %enquiry.enquiry_id, "Catering enquiry received");

        Ok(enquiry)
    }

    /// List a customer's catering enquiries, newest first.
    #[instrument(skip(self, email))]
    pub async fn list_catering_enquiries_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<CateringEnquiry>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_catering_enquiries_by_email"])
            .start_timer();

        let enquiries = sqlx::query_as::<_, CateringEnquiry>(&format!(
            "SELECT {} FROM catering_enquiries WHERE email = $1 ORDER BY created_utc DESC",
            ENQUIRY_COLUMNS
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list enquiries: {}", e)))?;

        timer.observe_duration();

        Ok(enquiries)
    }

    /// Get one enquiry by id.
    #[instrument(skip(self), fields(enquiry_id = %enquiry_id))]
    pub async fn get_catering_enquiry(
        &self,
        enquiry_id: Uuid,
    ) -> Result<Option<CateringEnquiry>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_catering_enquiry"])
            .start_timer();

        let enquiry = sqlx::query_as::<_, CateringEnquiry>(&format!(
            "SELECT {} FROM catering_enquiries WHERE enquiry_id = $1",
            ENQUIRY_COLUMNS
        ))
        .bind(enquiry_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get enquiry: {}", e)))?;

        timer.observe_duration();

        Ok(enquiry)
    }

    /// Move an enquiry through its follow-up states.
    #[instrument(skip(self), fields(enquiry_id = %enquiry_id, status = status.as_str()))]
    pub async fn update_catering_enquiry_status(
        &self,
        enquiry_id: Uuid,
        status: EnquiryStatus,
    ) -> Result<Option<CateringEnquiry>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_catering_enquiry_status"])
            .start_timer();

        let enquiry = sqlx::query_as::<_, CateringEnquiry>(&format!(
            "UPDATE catering_enquiries SET status = $2 WHERE enquiry_id = $1 RETURNING {}",
            ENQUIRY_COLUMNS
        ))
        .bind(enquiry_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update enquiry: {}", e)))?;

        timer.observe_duration();

        Ok(enquiry)
    }
}
