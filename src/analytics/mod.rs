pub mod client;
pub mod fetcher;
pub mod models;

pub use client::AnalyticsClient;
pub use fetcher::{MetricFetcher, ReportWindow};
