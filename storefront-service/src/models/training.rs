//! Training packages and course enquiries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPackageType {
    SixMonths,
    ThreeMonths,
    OneMonth,
    TwoWeeks,
}

impl TrainingPackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingPackageType::SixMonths => "six_months",
            TrainingPackageType::ThreeMonths => "three_months",
            TrainingPackageType::OneMonth => "one_month",
            TrainingPackageType::TwoWeeks => "two_weeks",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "six_months" => Some(TrainingPackageType::SixMonths),
            "three_months" => Some(TrainingPackageType::ThreeMonths),
            "one_month" => Some(TrainingPackageType::OneMonth),
            "two_weeks" => Some(TrainingPackageType::TwoWeeks),
            _ => None,
        }
    }
}

/// A cookery-school package. `price` is absent when pricing is
/// on-request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingPackage {
    pub package_id: Uuid,
    pub package_type: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: Option<Decimal>,
    pub features: serde_json::Value,
    pub includes_certification: bool,
    pub is_for_beginners: bool,
    pub is_advanced: bool,
    pub is_upgrade: bool,
    pub is_housewife: bool,
    pub is_active: bool,
    pub display_order: i32,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// An enquiry about a training package; shares the catering enquiry
/// status vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrainingEnquiry {
    pub enquiry_id: Uuid,
    pub package_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub status: String,
    pub created_utc: DateTime<Utc>,
}
