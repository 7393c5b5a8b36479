//! Meal plan and subscription persistence.

use super::Database;
use crate::models::{MealPlan, MealPlanSubscription, PlanPeriod, SubscriptionStatus};
use crate::services::metrics::DB_QUERY_DURATION;
use chrono::NaiveDate;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

const PLAN_COLUMNS: &str = "plan_id, title, slug, plan_type, period, price, description, features, is_customizable, display_order, is_active, created_utc";

const SUBSCRIPTION_COLUMNS: &str = "subscription_id, plan_id, customer_email, status, start_date, end_date, next_billing_date, created_utc";

impl Database {
    /// List active meal plans in display order.
    #[instrument(skip(self))]
    pub async fn list_meal_plans(&self, plan_type: Option<&str>) -> Result<Vec<MealPlan>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_meal_plans"])
            .start_timer();

        let plans = sqlx::query_as::<_, MealPlan>(&format!(
            r#"
            SELECT {}
            FROM meal_plans
            WHERE is_active = TRUE
              AND ($1::varchar IS NULL OR plan_type = $1)
            ORDER BY display_order, title
            "#,
            PLAN_COLUMNS
        ))
        .bind(plan_type)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list meal plans: {}", e)))?;

        timer.observe_duration();

        Ok(plans)
    }

    /// Get a meal plan by slug.
    #[instrument(skip(self))]
    pub async fn get_meal_plan_by_slug(&self, slug: &str) -> Result<Option<MealPlan>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_meal_plan_by_slug"])
            .start_timer();

        let plan = sqlx::query_as::<_, MealPlan>(&format!(
            "SELECT {} FROM meal_plans WHERE slug = $1 AND is_active = TRUE",
            PLAN_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get meal plan: {}", e)))?;

        timer.observe_duration();

        Ok(plan)
    }

    /// Get a meal plan by id.
    #[instrument(skip(self), fields(plan_id = %plan_id))]
    pub async fn get_meal_plan(&self, plan_id: Uuid) -> Result<Option<MealPlan>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_meal_plan"])
            .start_timer();

        let plan = sqlx::query_as::<_, MealPlan>(&format!(
            "SELECT {} FROM meal_plans WHERE plan_id = $1 AND is_active = TRUE",
            PLAN_COLUMNS
        ))
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get meal plan: {}", e)))?;

        timer.observe_duration();

        Ok(plan)
    }

    /// Subscribe a customer to a plan. The first billing date is one
    /// plan period after the start date. A customer can hold at most one
    /// non-cancelled subscription per plan.
    #[instrument(skip(self, customer_email), fields(plan_id = %plan.plan_id))]
    pub async fn create_subscription(
        &self,
        plan: &MealPlan,
        customer_email: &str,
        start_date: NaiveDate,
    ) -> Result<MealPlanSubscription, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_subscription"])
            .start_timer();

        let existing: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT subscription_id FROM meal_plan_subscriptions
            WHERE plan_id = $1 AND customer_email = $2 AND status <> 'cancelled'
            "#,
        )
        .bind(plan.plan_id)
        .bind(customer_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to check subscription: {}", e))
        })?;

        if existing.is_some() {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "An active subscription to this plan already exists"
            )));
        }

        let next_billing = PlanPeriod::from_string(&plan.period).next_billing_date(start_date);

        let subscription = sqlx::query_as::<_, MealPlanSubscription>(&format!(
            r#"
            INSERT INTO meal_plan_subscriptions (subscription_id, plan_id, customer_email, status, start_date, next_billing_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SUBSCRIPTION_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(plan.plan_id)
        .bind(customer_email)
        .bind(SubscriptionStatus::Active.as_str())
        .bind(start_date)
        .bind(next_billing)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create subscription: {}", e))
        })?;

        timer.observe_duration();
        info!(subscription_id = %subscription.subscription_id, "Subscription created");

        Ok(subscription)
    }

    /// List a customer's subscriptions, newest first.
    #[instrument(skip(self, customer_email))]
    pub async fn list_subscriptions_by_email(
        &self,
        customer_email: &str,
    ) -> Result<Vec<MealPlanSubscription>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_subscriptions_by_email"])
            .start_timer();

        let subscriptions = sqlx::query_as::<_, MealPlanSubscription>(&format!(
            "SELECT {} FROM meal_plan_subscriptions WHERE customer_email = $1 ORDER BY created_utc DESC",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(customer_email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list subscriptions: {}", e))
        })?;

        timer.observe_duration();

        Ok(subscriptions)
    }

    /// Get a subscription owned by a customer.
    #[instrument(skip(self, customer_email), fields(subscription_id = %subscription_id))]
    pub async fn get_subscription(
        &self,
        subscription_id: Uuid,
        customer_email: &str,
    ) -> Result<Option<MealPlanSubscription>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_subscription"])
            .start_timer();

        let subscription = sqlx::query_as::<_, MealPlanSubscription>(&format!(
            "SELECT {} FROM meal_plan_subscriptions WHERE subscription_id = $1 AND customer_email = $2",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(subscription_id)
        .bind(customer_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get subscription: {}", e))
        })?;

        timer.observe_duration();

        Ok(subscription)
    }

    /// Set a subscription's status. Cancelling closes the subscription
    /// with an end date.
    #[instrument(skip(self, customer_email), fields(subscription_id = %subscription_id, status = status.as_str()))]
    pub async fn update_subscription_status(
        &self,
        subscription_id: Uuid,
        customer_email: &str,
        status: SubscriptionStatus,
        end_date: Option<NaiveDate>,
    ) -> Result<Option<MealPlanSubscription>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_subscription_status"])
            .start_timer();

        let subscription = sqlx::query_as::<_, MealPlanSubscription>(&format!(
            r#"
            UPDATE meal_plan_subscriptions
            SET status = $3, end_date = COALESCE($4, end_date)
            WHERE subscription_id = $1 AND customer_email = $2
            RETURNING {}
            "#,
            SUBSCRIPTION_COLUMNS
        ))
        .bind(subscription_id)
        .bind(customer_email)
        .bind(status.as_str())
        .bind(end_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update subscription: {}", e))
        })?;

        timer.observe_duration();

        Ok(subscription)
    }

    /// Move a subscription onto a different plan. The next billing date
    /// is recomputed from the new plan's period by the caller.
    #[instrument(skip(self, customer_email), fields(subscription_id = %subscription_id, plan_id = %plan_id))]
    pub async fn change_subscription_plan(
        &self,
        subscription_id: Uuid,
        customer_email: &str,
        plan_id: Uuid,
        next_billing_date: NaiveDate,
    ) -> Result<Option<MealPlanSubscription>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["change_subscription_plan"])
            .start_timer();

        let subscription = sqlx::query_as::<_, MealPlanSubscription>(&format!(
            r#"
            UPDATE meal_plan_subscriptions
            SET plan_id = $3, next_billing_date = $4
            WHERE subscription_id = $1 AND customer_email = $2
            RETURNING {}
            "#,
            SUBSCRIPTION_COLUMNS
        ))
        .bind(subscription_id)
        .bind(customer_email)
        .bind(plan_id)
        .bind(next_billing_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to change subscription plan: {}", e))
        })?;

        timer.observe_duration();

        if let Some(s) = &subscription {
            info!(subscription_id = %s.subscription_id, "Subscription moved to new plan");
        }

        Ok(subscription)
    }

    /// Push a resumed subscription's next billing date forward one plan
    /// period from `from`.
    #[instrument(skip(self, customer_email), fields(subscription_id = %subscription_id))]
    pub async fn advance_next_billing_date(
        &self,
        subscription_id: Uuid,
        customer_email: &str,
        next_billing_date: NaiveDate,
    ) -> Result<Option<MealPlanSubscription>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["advance_next_billing_date"])
            .start_timer();

        let subscription = sqlx::query_as::<_, MealPlanSubscription>(&format!(
            r#"
            UPDATE meal_plan_subscriptions
            SET next_billing_date = $3
            WHERE subscription_id = $1 AND customer_email = $2
            RETURNING {}
            "#,
            SUBSCRIPTION_COLUMNS
        ))
        .bind(subscription_id)
        .bind(customer_email)
        .bind(next_billing_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to advance billing date: {}", e))
        })?;

        timer.observe_duration();

        Ok(subscription)
    }
}
