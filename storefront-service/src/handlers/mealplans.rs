//! Meal plan and subscription handlers.
//!
//! Subscriptions are keyed by customer email; mutating endpoints
//! require the same email so one customer cannot touch another's
//! subscription by guessing ids.

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

use crate::models::{MealPlan, MealPlanSubscription, PlanPeriod, SubscriptionStatus};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListPlansQuery {
    pub plan_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(email)]
    pub customer_email: String,
    /// Defaults to today when omitted.
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubscriptionActionRequest {
    #[validate(email)]
    pub customer_email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePlanRequest {
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 1))]
    pub plan_slug: String,
}

#[derive(Debug, Deserialize)]
pub struct ListSubscriptionsQuery {
    pub email: String,
}

pub async fn list_plans(
    State(state): State<AppState>,
    Query(query): Query<ListPlansQuery>,
) -> Result<Json<Vec<MealPlan>>, AppError> {
    let plans = state.db.list_meal_plans(query.plan_type.as_deref()).await?;
    Ok(Json(plans))
}

pub async fn get_plan(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MealPlan>, AppError> {
    let plan = state
        .db
        .get_meal_plan_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Meal plan not found")))?;
    Ok(Json(plan))
}

pub async fn subscribe(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<MealPlanSubscription>), AppError> {
    payload.validate()?;

    let plan = state
        .db
        .get_meal_plan_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Meal plan not found")))?;

    let start_date = payload.start_date.unwrap_or_else(|| Utc::now().date_naive());
    if start_date < Utc::now().date_naive() {
        return Err(AppError::Unprocessable(anyhow::anyhow!(
            "Start date cannot be in the past"
        )));
    }

    let subscription = state
        .db
        .create_subscription(&plan, &payload.customer_email, start_date)
        .await?;

    Ok((StatusCode::CREATED, Json(subscription)))
}

pub async fn list_subscriptions(
    State(state): State<AppState>,
    Query(query): Query<ListSubscriptionsQuery>,
) -> Result<Json<Vec<MealPlanSubscription>>, AppError> {
    let subscriptions = state.db.list_subscriptions_by_email(&query.email).await?;
    Ok(Json(subscriptions))
}

pub async fn pause_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<Uuid>,
    Json(payload): Json<SubscriptionActionRequest>,
) -> Result<Json<MealPlanSubscription>, AppError> {
    payload.validate()?;

    let subscription = state
        .db
        .get_subscription(subscription_id, &payload.customer_email)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Subscription not found")))?;

    if subscription.status != SubscriptionStatus::Active.as_str() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Only active subscriptions can be paused"
        )));
    }

    let updated = state
        .db
        .update_subscription_status(
            subscription_id,
            &payload.customer_email,
            SubscriptionStatus::Paused,
            None,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Subscription not found")))?;
    Ok(Json(updated))
}

/// Resume a paused subscription. Billing restarts one plan period from
/// today rather than from the missed billing date.
pub async fn resume_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<Uuid>,
    Json(payload): Json<SubscriptionActionRequest>,
) -> Result<Json<MealPlanSubscription>, AppError> {
    payload.validate()?;

    let subscription = state
        .db
        .get_subscription(subscription_id, &payload.customer_email)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Subscription not found")))?;

    if subscription.status != SubscriptionStatus::Paused.as_str() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Only paused subscriptions can be resumed"
        )));
    }

    let plan = state
        .db
        .get_meal_plan(subscription.plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Meal plan not found")))?;

    let next_billing =
        PlanPeriod::from_string(&plan.period).next_billing_date(Utc::now().date_naive());

    state
        .db
        .update_subscription_status(
            subscription_id,
            &payload.customer_email,
            SubscriptionStatus::Active,
            None,
        )
        .await?;

    let updated = state
        .db
        .advance_next_billing_date(subscription_id, &payload.customer_email, next_billing)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Subscription not found")))?;
    Ok(Json(updated))
}

/// Move a subscription onto a different plan. The next billing date is
/// recomputed from the new plan's period, anchored at today.
pub async fn change_plan(
    State(state): State<AppState>,
    Path(subscription_id): Path<Uuid>,
    Json(payload): Json<ChangePlanRequest>,
) -> Result<Json<MealPlanSubscription>, AppError> {
    payload.validate()?;

    let subscription = state
        .db
        .get_subscription(subscription_id, &payload.customer_email)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Subscription not found")))?;

    if subscription.status == SubscriptionStatus::Cancelled.as_str() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Subscription is cancelled"
        )));
    }

    let plan = state
        .db
        .get_meal_plan_by_slug(&payload.plan_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Meal plan not found")))?;

    let next_billing =
        PlanPeriod::from_string(&plan.period).next_billing_date(Utc::now().date_naive());

    let updated = state
        .db
        .change_subscription_plan(
            subscription_id,
            &payload.customer_email,
            plan.plan_id,
            next_billing,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Subscription not found")))?;
    Ok(Json(updated))
}

pub async fn cancel_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<Uuid>,
    Json(payload): Json<SubscriptionActionRequest>,
) -> Result<Json<MealPlanSubscription>, AppError> {
    payload.validate()?;

    let subscription = state
        .db
        .get_subscription(subscription_id, &payload.customer_email)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Subscription not found")))?;

    if subscription.status == SubscriptionStatus::Cancelled.as_str() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Subscription is already cancelled"
        )));
    }

    let updated = state
        .db
        .update_subscription_status(
            subscription_id,
            &payload.customer_email,
            SubscriptionStatus::Cancelled,
            Some(Utc::now().date_naive()),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Subscription not found")))?;
    Ok(Json(updated))
}
