//! Prometheus metrics for the storefront.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec,
    IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Database query duration histogram
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "storefront_db_query_duration_seconds",
            "Database query duration"
        ),
        &["operation"]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Orders created counter
pub static ORDERS_CREATED_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Payment initializations counter
pub static PAYMENTS_INITIALIZED_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Inbound webhook events counter
pub static WEBHOOK_EVENTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Enquiries submitted counter
pub static ENQUIRIES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Call once at startup.
pub fn init_metrics() {
    ORDERS_CREATED_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "storefront_orders_created_total",
                "Orders created by order type"
            ),
            &["order_type"]
        )
        .expect("Failed to register ORDERS_CREATED_TOTAL")
    });

    PAYMENTS_INITIALIZED_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "storefront_payments_initialized_total",
                "Payment initializations by gateway and outcome"
            ),
            &["gateway", "outcome"]
        )
        .expect("Failed to register PAYMENTS_INITIALIZED_TOTAL")
    });

    WEBHOOK_EVENTS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "storefront_webhook_events_total",
                "Inbound gateway webhooks by event and outcome"
            ),
            &["event", "outcome"]
        )
        .expect("Failed to register WEBHOOK_EVENTS_TOTAL")
    });

    ENQUIRIES_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "storefront_enquiries_total",
                "Enquiries submitted by kind"
            ),
            &["kind"]
        )
        .expect("Failed to register ENQUIRIES_TOTAL")
    });

    // Force initialization of lazy statics
    let _ = &*DB_QUERY_DURATION;
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Failed to convert metrics to string")
}

pub fn record_order_created(order_type: &str) {
    if let Some(counter) = ORDERS_CREATED_TOTAL.get() {
        counter.with_label_values(&[order_type]).inc();
    }
}

pub fn record_payment_initialized(gateway: &str, outcome: &str) {
    if let Some(counter) = PAYMENTS_INITIALIZED_TOTAL.get() {
        counter.with_label_values(&[gateway, outcome]).inc();
    }
}

pub fn record_webhook_event(event: &str, outcome: &str) {
    if let Some(counter) = WEBHOOK_EVENTS_TOTAL.get() {
        counter.with_label_values(&[event, outcome]).inc();
    }
}

pub fn record_enquiry(kind: &str) {
    if let Some(counter) = ENQUIRIES_TOTAL.get() {
        counter.with_label_values(&[kind]).inc();
    }
}
