use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

pub static FETCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "profile_fetches_total",
        "Profile fetch sequences grouped by outcome",
        &["outcome"]
    )
    .expect("profile fetches total")
});

pub static FETCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "profile_fetch_duration_seconds",
        "Wall time of a full profile fetch sequence grouped by outcome",
        &["outcome"]
    )
    .expect("profile fetch duration")
});

pub static REPOSITORY_PAGES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "profile_repository_pages_total",
        "Repository listing pages requested from GitHub"
    )
    .expect("profile repository pages")
});

pub static REPOSITORIES_FETCHED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "profile_repositories_fetched_total",
        "Repositories accepted into successful fetch results"
    )
    .expect("profile repositories fetched")
});
