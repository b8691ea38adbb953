use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub extractor: ExtractorSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub session_secret: Secret<String>,
}

#[derive(Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the contract/order REST API (e.g. http://backend:8080/api).
    pub url: String,
}

#[derive(Deserialize, Clone)]
pub struct ExtractorSettings {
    /// Base URL of the PDF extraction service.
    pub url: String,
}

#[derive(Deserialize, Clone, Default)]
pub struct TelemetrySettings {
    /// OTLP collector endpoint; tracing export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("failed to determine the current directory: {}", e))
    })?;

    // Works both from the workspace root and from inside the crate directory
    let configuration_directory = if base_path.ends_with("sigecon-frontend") {
        base_path.join("config")
    } else {
        base_path.join("sigecon-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
