use crate::config::ExtractorSettings;
use crate::models::contract::ExtractResult;
use crate::services::api_client::{upstream_error, ApiError};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use sigecon_core::observability::TracedClientExt;

/// Client for the PDF extraction service. The uploaded PDF comes back as
/// tabular rows ready for POST /contracts/import.
pub struct ExtractorClient {
    client: Client,
    settings: ExtractorSettings,
}

impl ExtractorClient {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    pub async fn extract(&self, file_name: &str, bytes: Vec<u8>) -> Result<ExtractResult, ApiError> {
        // the extraction service expects the upload under the "file" field
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let url = format!("{}/extract", self.settings.url);
        let response = self.client.traced_post(&url).multipart(form).send().await?;

        if response.status().is_success() {
            Ok(response.json::<ExtractResult>().await?)
        } else {
            Err(upstream_error(response, "Não foi possível processar o PDF enviado.").await)
        }
    }
}
