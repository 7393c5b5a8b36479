//! Training package and enquiry handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::models::{EnquiryStatus, TrainingEnquiry, TrainingPackage, TrainingPackageType};
use crate::services::metrics::record_enquiry;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListPackagesQuery {
    /// `six_months`, `three_months`, `one_month` or `two_weeks`.
    pub package_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTrainingEnquiryRequest {
    pub package_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 30))]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEnquiryStatusRequest {
    pub status: String,
}

pub async fn list_packages(
    State(state): State<AppState>,
    Query(query): Query<ListPackagesQuery>,
) -> Result<Json<Vec<TrainingPackage>>, AppError> {
    if let Some(raw) = query.package_type.as_deref() {
        if TrainingPackageType::parse(raw).is_none() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unknown package type: {}",
                raw
            )));
        }
    }

    let packages = state
        .db
        .list_training_packages(query.package_type.as_deref())
        .await?;
    Ok(Json(packages))
}

pub async fn get_package(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<TrainingPackage>, AppError> {
    let package = state
        .db
        .get_training_package_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Training package not found")))?;
    Ok(Json(package))
}

pub async fn create_enquiry(
    State(state): State<AppState>,
    Json(payload): Json<CreateTrainingEnquiryRequest>,
) -> Result<(StatusCode, Json<TrainingEnquiry>), AppError> {
    payload.validate()?;

    state
        .db
        .get_training_package(payload.package_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Training package not found")))?;

    let enquiry = state
        .db
        .create_training_enquiry(
            payload.package_id,
            &payload.name,
            &payload.email,
            &payload.phone,
            &payload.message,
        )
        .await?;
    record_enquiry("training");

    Ok((StatusCode::CREATED, Json(enquiry)))
}

pub async fn update_enquiry_status(
    State(state): State<AppState>,
    Path(enquiry_id): Path<Uuid>,
    Json(payload): Json<UpdateEnquiryStatusRequest>,
) -> Result<Json<TrainingEnquiry>, AppError> {
    let status = EnquiryStatus::parse(&payload.status).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "Unknown enquiry status: {}",
            payload.status
        ))
    })?;

    let existing = state
        .db
        .get_training_enquiry(enquiry_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Enquiry not found")))?;

    // Cancelled is terminal.
    if existing.status == EnquiryStatus::Cancelled.as_str() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Enquiry has been cancelled"
        )));
    }

    let enquiry = state
        .db
        .update_training_enquiry_status(enquiry_id, status)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Enquiry not found")))?;
    Ok(Json(enquiry))
}
