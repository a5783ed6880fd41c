use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "gh_client_requests_total",
        "GitHub REST requests grouped by endpoint kind and status class",
        &["endpoint", "status"]
    )
    .expect("requests total metric")
});

pub static LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "gh_client_request_latency_seconds",
        "GitHub REST request latency per endpoint kind",
        &["endpoint"]
    )
    .expect("latency metric")
});

pub fn status_class(status: http::StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}
