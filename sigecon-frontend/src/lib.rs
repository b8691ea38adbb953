pub mod config;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use services::{api_client::ApiClient, extractor_client::ExtractorClient};
use std::sync::Arc;

/// Shared application state containing service clients
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<ApiClient>,
    pub extractor: Arc<ExtractorClient>,
}

impl AppState {
    pub fn new(api: Arc<ApiClient>, extractor: Arc<ExtractorClient>) -> Self {
        Self { api, extractor }
    }
}
