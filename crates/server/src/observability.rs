use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, register_int_gauge, Encoder, IntCounterVec, IntGauge, TextEncoder};

use crate::errors::ApiError;

// Prometheus metrics (default registry)
pub static OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "items_api_operations_total",
        "Item operations by name and outcome",
        &["operation", "outcome"]
    )
    .expect("register operations_total")
});

pub static ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "items_api_items",
        "Number of items currently stored"
    )
    .expect("register items gauge")
});

/// Count one call of `operation`, labelled `ok`, `invalid_argument` or `not_found`.
pub fn record<T>(operation: &str, result: &Result<T, ApiError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(ApiError::BadRequest(_)) => "invalid_argument",
        Err(ApiError::NotFound(_)) => "not_found",
    };
    OPERATIONS_TOTAL.with_label_values(&[operation, outcome]).inc();
}

pub fn set_item_count(len: usize) {
    ITEMS.set(i64::try_from(len).unwrap_or(i64::MAX));
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
