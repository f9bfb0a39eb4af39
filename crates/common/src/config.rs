use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Path to the mock address dataset (JSON array of records)
    pub data_file: String,

    /// Directory holding the built frontend bundle
    pub static_dir: String,

    /// HTTP listen port (default: 8000)
    pub port: u16,

    /// Address-intelligence provider API key
    pub address_intel_api_key: Option<String>,

    /// Address-intelligence endpoint URL template; `{address}` is substituted
    pub address_intel_api_url: Option<String>,

    /// Classification provider API key
    pub classifier_api_key: Option<String>,

    /// Classification endpoint URL
    pub classifier_api_url: Option<String>,

    /// Request timeout for address-intelligence lookups in seconds (default: 10)
    pub address_intel_timeout_secs: u64,

    /// Request timeout for classification lookups in seconds (default: 15)
    pub classifier_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Provider key/URL pairs are optional; leaving either unset disables
    /// that enrichment provider without error.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            data_file: std::env::var("DATA_FILE")
                .unwrap_or_else(|_| "data/addresses.json".to_string()),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid u16"))?,
            address_intel_api_key: std::env::var("ADDRESS_INTEL_API_KEY").ok(),
            address_intel_api_url: std::env::var("ADDRESS_INTEL_API_URL").ok(),
            classifier_api_key: std::env::var("CLASSIFIER_API_KEY").ok(),
            classifier_api_url: std::env::var("CLASSIFIER_API_URL").ok(),
            address_intel_timeout_secs: std::env::var("ADDRESS_INTEL_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("ADDRESS_INTEL_TIMEOUT_SECS must be a valid u64"))?,
            classifier_timeout_secs: std::env::var("CLASSIFIER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("CLASSIFIER_TIMEOUT_SECS must be a valid u64"))?,
        })
    }
}
