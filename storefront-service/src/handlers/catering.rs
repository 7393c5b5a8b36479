//! Catering package and enquiry handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    CateringCategory, CateringEnquiry, CateringPackage, CreateEnquiry, EnquiryStatus,
    ListPackagesFilter, PackageTier,
};
use crate::services::metrics::record_enquiry;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListPackagesQuery {
    pub category_id: Option<Uuid>,
    /// `bronze`, `silver` or `gold`.
    pub tier: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEnquiryRequest {
    pub package_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 30))]
    pub phone: String,
    pub event_date: NaiveDate,
    #[validate(range(min = 1))]
    pub number_of_guests: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub tasting_session_requested: bool,
    pub tasting_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ListEnquiriesQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEnquiryStatusRequest {
    pub status: String,
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CateringCategory>>, AppError> {
    let categories = state.db.list_catering_categories().await?;
    Ok(Json(categories))
}

pub async fn list_packages(
    State(state): State<AppState>,
    Query(query): Query<ListPackagesQuery>,
) -> Result<Json<Vec<CateringPackage>>, AppError> {
    let tier = match query.tier.as_deref() {
        Some(raw) => Some(PackageTier::parse(raw).ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("Unknown package tier: {}", raw))
        })?),
        None => None,
    };

    let filter = ListPackagesFilter {
        category_id: query.category_id,
        tier,
    };
    let packages = state.db.list_catering_packages(&filter).await?;
    Ok(Json(packages))
}

pub async fn get_package(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
) -> Result<Json<CateringPackage>, AppError> {
    let package = state
        .db
        .get_catering_package(package_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Catering package not found")))?;
    Ok(Json(package))
}

/// Submit a catering enquiry for a package.
///
/// The event date must be in the future and the guest count must fit
/// the package's range.
pub async fn create_enquiry(
    State(state): State<AppState>,
    Json(payload): Json<CreateEnquiryRequest>,
) -> Result<(StatusCode, Json<CateringEnquiry>), AppError> {
    payload.validate()?;

    if payload.event_date <= Utc::now().date_naive() {
        return Err(AppError::Unprocessable(anyhow::anyhow!(
            "Event date must be in the future"
        )));
    }

    let package = state
        .db
        .get_catering_package(payload.package_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Catering package not found")))?;

    if payload.number_of_guests < package.min_guests
        || payload.number_of_guests > package.max_guests
    {
        return Err(AppError::Unprocessable(anyhow::anyhow!(
            "{} caters for {} to {} guests",
            package.title,
            package.min_guests,
            package.max_guests
        )));
    }

    let input = CreateEnquiry {
        package_id: payload.package_id,
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        event_date: payload.event_date,
        number_of_guests: payload.number_of_guests,
        message: payload.message,
        tasting_session_requested: payload.tasting_session_requested,
        tasting_date: payload.tasting_date,
    };

    let enquiry = state.db.create_catering_enquiry(&input).await?;
    record_enquiry("catering");

    let mailer = state.mailer.clone();
    let enquiry_for_mail = enquiry.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_enquiry_acknowledgement(&enquiry_for_mail).await {
            tracing::warn!(error = %e, enquiry_id = %enquiry_for_mail.enquiry_id, "Enquiry acknowledgement email failed");
        }
    });

    Ok((StatusCode::CREATED, Json(enquiry)))
}

pub async fn list_enquiries(
    State(state): State<AppState>,
    Query(query): Query<ListEnquiriesQuery>,
) -> Result<Json<Vec<CateringEnquiry>>, AppError> {
    let enquiries = state
        .db
        .list_catering_enquiries_by_email(&query.email)
        .await?;
    Ok(Json(enquiries))
}

pub async fn update_enquiry_status(
    State(state): State<AppState>,
    Path(enquiry_id): Path<Uuid>,
    Json(payload): Json<UpdateEnquiryStatusRequest>,
) -> Result<Json<CateringEnquiry>, AppError> {
    let status = EnquiryStatus::parse(&payload.status).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "Unknown enquiry status: {}",
            payload.status
        ))
    })?;

    let existing = state
        .db
        .get_catering_enquiry(enquiry_id)
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
        .update_catering_enquiry_status(enquiry_id, status)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Enquiry not found")))?;
    Ok(Json(enquiry))
}
