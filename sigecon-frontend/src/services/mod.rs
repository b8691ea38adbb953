pub mod api_client;
pub mod extractor_client;
pub mod metrics;
