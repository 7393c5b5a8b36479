pub mod config;
pub mod handlers;
pub mod models;
pub mod services;

use axum::middleware::from_fn;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::Config;
use services::{init_metrics, Database, Mailer, PaystackClient};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub paystack: PaystackClient,
    pub mailer: Mailer,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        init_metrics();

        let db = Database::new(
            config.database.url.expose_secret(),
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;
        db.run_migrations().await?;

        let paystack = PaystackClient::new(config.paystack.clone());
        if paystack.is_configured() {
            tracing::info!("Paystack client initialized");
        } else {
            tracing::warn!("Paystack credentials not configured - checkout will be limited");
        }

        let mailer = Mailer::new(config.smtp.clone())?;
        if !mailer.is_enabled() {
            tracing::info!("SMTP disabled, transactional email will be skipped");
        }

        let state = AppState {
            db,
            config: config.clone(),
            paystack,
            mailer,
        };

        let router = Self::router(state);

        // Port 0 binds a random port, used by the integration tests.
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics))
            // Menu catalog
            .route("/menu/categories", get(handlers::menu::list_categories))
            .route("/menu/categories", post(handlers::menu::create_category))
            .route("/menu/items", get(handlers::menu::list_items))
            .route("/menu/items", post(handlers::menu::create_item))
            .route("/menu/items/:slug", get(handlers::menu::get_item))
            .route("/menu/items/:slug", patch(handlers::menu::update_item))
            .route("/menu/items/:slug/reviews", get(handlers::menu::list_reviews))
            .route("/menu/items/:slug/reviews", post(handlers::menu::submit_review))
            // Cart
            .route("/cart", get(handlers::cart::get_cart))
            .route("/cart", delete(handlers::cart::clear_cart))
            .route("/cart/items", post(handlers::cart::add_item))
            .route("/cart/items/:id", patch(handlers::cart::update_item_quantity))
            .route("/cart/items/:id", delete(handlers::cart::remove_item))
            // Orders
            .route("/orders/checkout", post(handlers::orders::checkout))
            .route("/orders", get(handlers::orders::list_orders))
            .route("/orders/:order_number", get(handlers::orders::get_order))
            .route(
                "/orders/:order_number/status",
                patch(handlers::orders::update_status),
            )
            .route(
                "/orders/:order_number/tracking",
                post(handlers::orders::set_tracking),
            )
            .route(
                "/orders/:order_number/payments",
                get(handlers::payments::list_for_order),
            )
            // Payments
            .route("/payments/initialize", post(handlers::payments::initialize))
            .route("/payments/verify/:reference", get(handlers::payments::verify))
            .route("/webhooks/paystack", post(handlers::payments::webhook))
            // Shipping
            .route(
                "/shipping/destinations",
                get(handlers::shipping::list_destinations),
            )
            .route(
                "/shipping/destinations/:id",
                get(handlers::shipping::get_destination),
            )
            .route("/shipping/quote", post(handlers::shipping::quote))
            .route("/shipping/orders", post(handlers::shipping::create_order))
            .route("/shipping/orders", get(handlers::shipping::list_orders))
            .route("/shipping/orders/:id", get(handlers::shipping::get_order))
            .route(
                "/shipping/orders/:id/tracking",
                get(handlers::shipping::track_order),
            )
            .route(
                "/shipping/orders/:id/status",
                patch(handlers::shipping::update_order_status),
            )
            // Catering
            .route(
                "/catering/categories",
                get(handlers::catering::list_categories),
            )
            .route("/catering/packages", get(handlers::catering::list_packages))
            .route(
                "/catering/packages/:id",
                get(handlers::catering::get_package),
            )
            .route(
                "/catering/enquiries",
                post(handlers::catering::create_enquiry),
            )
            .route(
                "/catering/enquiries",
                get(handlers::catering::list_enquiries),
            )
            .route(
                "/catering/enquiries/:id/status",
                patch(handlers::catering::update_enquiry_status),
            )
            // Meal plans
            .route("/mealplans", get(handlers::mealplans::list_plans))
            .route("/mealplans/:slug", get(handlers::mealplans::get_plan))
            .route(
                "/mealplans/:slug/subscribe",
                post(handlers::mealplans::subscribe),
            )
            .route(
                "/subscriptions",
                get(handlers::mealplans::list_subscriptions),
            )
            .route(
                "/subscriptions/:id/pause",
                post(handlers::mealplans::pause_subscription),
            )
            .route(
                "/subscriptions/:id/resume",
                post(handlers::mealplans::resume_subscription),
            )
            .route(
                "/subscriptions/:id/cancel",
                post(handlers::mealplans::cancel_subscription),
            )
            .route(
                "/subscriptions/:id/change-plan",
                post(handlers::mealplans::change_plan),
            )
            // Training
            .route(
                "/training/packages",
                get(handlers::training::list_packages),
            )
            .route(
                "/training/packages/:slug",
                get(handlers::training::get_package),
            )
            .route(
                "/training/enquiries",
                post(handlers::training::create_enquiry),
            )
            .route(
                "/training/enquiries/:id/status",
                patch(handlers::training::update_enquiry_status),
            )
            // Blog
            .route("/blog/posts", get(handlers::blog::list_posts))
            .route("/blog/posts", post(handlers::blog::create_post))
            .route("/blog/posts/:slug", get(handlers::blog::get_post))
            .route(
                "/blog/posts/:slug/comments",
                get(handlers::blog::list_comments),
            )
            .route(
                "/blog/posts/:slug/comments",
                post(handlers::blog::create_comment),
            )
            .route(
                "/blog/comments/:id",
                patch(handlers::blog::moderate_comment),
            )
            // Gallery
            .route(
                "/gallery/categories",
                get(handlers::gallery::list_categories),
            )
            .route("/gallery/images", get(handlers::gallery::list_images))
            .layer(CorsLayer::permissive())
            .layer(from_fn(request_id_middleware))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                }),
            )
            .with_state(state)
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        tracing::info!("Listening on port {}", self.port);
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
