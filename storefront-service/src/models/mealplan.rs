//! Meal plans and subscriptions.

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanPeriod {
    Weekly,
    Monthly,
}

impl PlanPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanPeriod::Weekly => "weekly",
            PlanPeriod::Monthly => "monthly",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "weekly" => PlanPeriod::Weekly,
            _ => PlanPeriod::Monthly,
        }
    }

    /// Next billing date one period after `from`.
    pub fn next_billing_date(&self, from: NaiveDate) -> NaiveDate {
        match self {
            PlanPeriod::Weekly => from + chrono::Duration::weeks(1),
            PlanPeriod::Monthly => from + Months::new(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlan {
    pub plan_id: Uuid,
    pub title: String,
    pub slug: String,
    pub plan_type: String,
    pub period: String,
    pub price: Decimal,
    pub description: String,
    pub features: serde_json::Value,
    pub is_customizable: bool,
    pub display_order: i32,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlanSubscription {
    pub subscription_id: Uuid,
    pub plan_id: Uuid,
    pub customer_email: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub next_billing_date: NaiveDate,
    pub created_utc: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_billing_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            PlanPeriod::Weekly.next_billing_date(start),
            NaiveDate::from_ymd_opt(2025, 2, 7).unwrap()
        );
        // Month arithmetic clamps to the last day of February.
        assert_eq!(
            PlanPeriod::Monthly.next_billing_date(start),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }
}
