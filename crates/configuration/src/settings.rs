use serde::Deserialize;

/// Default Azure OpenAI REST API version, used when neither the config file
/// nor the environment provides one.
pub const DEFAULT_API_VERSION: &str = "2025-01-01-preview";

/// Environment variable names recognized as fallbacks for the credential
/// fields. Each maps to the identically named field in `AzureOpenAiConfig`.
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_DEPLOYMENT_NAME: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub azure_openai: AzureOpenAiConfig,
    pub workflow: WorkflowConfig,
}

/// Credentials and routing for the Azure OpenAI chat-completions deployment.
///
/// Values from `config.toml` take precedence; any field left empty there is
/// filled from the matching `AZURE_OPENAI_*` environment variable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AzureOpenAiConfig {
    pub api_key: String,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    /// Must not include the `/openai` path segment.
    pub endpoint: String,
    /// The customer-chosen deployment alias (e.g. "gpt-4o-mini").
    pub deployment_name: String,
    pub api_version: String,
}

// All fields default to empty so the environment fallback can tell "unset"
// from "configured"; validation supplies DEFAULT_API_VERSION at the end.
impl Default for AzureOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            deployment_name: String::new(),
            api_version: String::new(),
        }
    }
}

/// Tunables for the analysis pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Sampling temperature passed on every chat-completion call.
    pub temperature: f64,
    /// Extraction confidence below which a human review is requested.
    pub confidence_threshold: f64,
    /// Ticker used when extraction cannot resolve any asset.
    pub fallback_ticker: String,
    /// Per-request HTTP timeout for the chat-completion calls.
    pub request_timeout_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            confidence_threshold: 0.85,
            fallback_ticker: "BTC".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Renders a secret for logging: the first four characters followed by `...`.
///
/// Counts characters, not bytes; keys are arbitrary strings until the HTTP
/// client validates them, so byte slicing could split a multibyte character.
pub fn redact(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        let prefix: String = secret.chars().take(4).collect();
        format!("{prefix}...")
    }
}
