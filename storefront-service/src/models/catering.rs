//! Catering packages and enquiries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CateringCategory {
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageTier {
    Bronze,
    Silver,
    Gold,
}

impl PackageTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageTier::Bronze => "bronze",
            PackageTier::Silver => "silver",
            PackageTier::Gold => "gold",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bronze" => Some(PackageTier::Bronze),
            "silver" => Some(PackageTier::Silver),
            "gold" => Some(PackageTier::Gold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CateringPackage {
    pub package_id: Uuid,
    pub category_id: Uuid,
    pub tier: String,
    pub title: String,
    pub description: String,
    pub min_guests: i32,
    pub max_guests: i32,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub price_per_head: Option<Decimal>,
    pub menu_options: serde_json::Value,
    pub created_utc: DateTime<Utc>,
}

/// Enquiry status vocabulary: pending -> responded/booked/cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnquiryStatus {
    Pending,
    Responded,
    Booked,
    Cancelled,
}

impl EnquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnquiryStatus::Pending => "pending",
            EnquiryStatus::Responded => "responded",
            EnquiryStatus::Booked => "booked",
            EnquiryStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(EnquiryStatus::Pending),
            "responded" => Some(EnquiryStatus::Responded),
            "booked" => Some(EnquiryStatus::Booked),
            "cancelled" => Some(EnquiryStatus::Cancelled),
            _ => None,
        }
    }
}

/// A customer enquiry against a catering package.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CateringEnquiry {
    pub enquiry_id: Uuid,
    pub package_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_date: NaiveDate,
    pub number_of_guests: i32,
    pub message: String,
    pub tasting_session_requested: bool,
    pub tasting_date: Option<NaiveDate>,
    pub status: String,
    pub created_utc: DateTime<Utc>,
}

/// Input for submitting an enquiry.
#[derive(Debug, Clone)]
pub struct CreateEnquiry {
    pub package_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_date: NaiveDate,
    pub number_of_guests: i32,
    pub message: String,
    pub tasting_session_requested: bool,
    pub tasting_date: Option<NaiveDate>,
}

/// Filter parameters for listing packages.
#[derive(Debug, Clone, Default)]
pub struct ListPackagesFilter {
    pub category_id: Option<Uuid>,
    pub tier: Option<PackageTier>,
}
