use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    redact, AzureOpenAiConfig, Config, WorkflowConfig, DEFAULT_API_VERSION, ENV_API_KEY,
    ENV_API_VERSION, ENV_DEPLOYMENT_NAME, ENV_ENDPOINT,
};

/// Loads the application configuration from `config.toml`.
///
/// The file is optional: any credential field it leaves unset is filled from
/// the matching `AZURE_OPENAI_*` environment variable, and the result is
/// validated before being returned.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from("config.toml")
}

/// Loads configuration from a specific file path (missing files are fine).
pub fn load_config_from(path: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .build()?;

    let mut config = builder.try_deserialize::<Config>()?;

    // Config file values win; the environment only fills the gaps.
    apply_env_fallbacks(&mut config, |name| std::env::var(name).ok());
    validate(&mut config)?;

    Ok(config)
}

/// Fills empty credential fields from an environment lookup.
///
/// The lookup is injected so tests can supply a fixed map instead of
/// mutating the process environment.
pub fn apply_env_fallbacks<F>(config: &mut Config, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let azure = &mut config.azure_openai;
    for (field, var) in [
        (&mut azure.api_key, ENV_API_KEY),
        (&mut azure.endpoint, ENV_ENDPOINT),
        (&mut azure.deployment_name, ENV_DEPLOYMENT_NAME),
        (&mut azure.api_version, ENV_API_VERSION),
    ] {
        if field.trim().is_empty() {
            if let Some(value) = env(var) {
                *field = value;
            }
        }
    }
}

/// Checks the resolved credentials and normalizes the endpoint.
pub fn validate(config: &mut Config) -> Result<(), ConfigError> {
    let azure = &mut config.azure_openai;

    if azure.api_key.trim().is_empty() {
        return Err(ConfigError::MissingCredential(ENV_API_KEY));
    }
    if azure.endpoint.trim().is_empty() {
        return Err(ConfigError::MissingCredential(ENV_ENDPOINT));
    }
    if azure.deployment_name.trim().is_empty() {
        return Err(ConfigError::MissingCredential(ENV_DEPLOYMENT_NAME));
    }
    if azure.api_version.trim().is_empty() {
        azure.api_version = DEFAULT_API_VERSION.to_string();
    }

    if !azure.endpoint.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "endpoint must be an https:// URL, got '{}'",
            azure.endpoint
        )));
    }
    azure.endpoint = azure.endpoint.trim_end_matches('/').to_string();
    if azure.endpoint.ends_with("/openai") {
        return Err(ConfigError::ValidationError(
            "endpoint must not include the /openai path segment; the client appends it"
                .to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env_map(&[
            (ENV_API_KEY, "env-key-123"),
            (ENV_ENDPOINT, "https://env.openai.azure.com"),
            (ENV_DEPLOYMENT_NAME, "gpt-4o-mini"),
            (ENV_API_VERSION, "2024-06-01"),
        ])
    }

    #[test]
    fn env_fills_all_missing_fields() {
        let env = full_env();
        let mut config = Config::default();
        apply_env_fallbacks(&mut config, |name| env.get(name).cloned());

        assert_eq!(config.azure_openai.api_key, "env-key-123");
        assert_eq!(config.azure_openai.endpoint, "https://env.openai.azure.com");
        assert_eq!(config.azure_openai.deployment_name, "gpt-4o-mini");
        assert_eq!(config.azure_openai.api_version, "2024-06-01");
    }

    #[test]
    fn file_value_wins_over_env() {
        let env = full_env();
        let mut config = Config::default();
        config.azure_openai.api_key = "file-key".to_string();
        apply_env_fallbacks(&mut config, |name| env.get(name).cloned());

        assert_eq!(config.azure_openai.api_key, "file-key");
        // The rest still falls back.
        assert_eq!(config.azure_openai.deployment_name, "gpt-4o-mini");
    }

    #[test]
    fn default_api_version_applies_when_unset() {
        let mut config = Config::default();
        config.azure_openai.api_key = "k".into();
        config.azure_openai.endpoint = "https://res.openai.azure.com".into();
        config.azure_openai.deployment_name = "d".into();

        apply_env_fallbacks(&mut config, |_| None);
        validate(&mut config).unwrap();
        assert_eq!(config.azure_openai.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn validate_reports_first_missing_credential() {
        let mut config = Config::default();
        match validate(&mut config) {
            Err(ConfigError::MissingCredential(var)) => assert_eq!(var, ENV_API_KEY),
            other => panic!("expected MissingCredential, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_openai_suffix_and_plain_http() {
        let mut config = Config::default();
        config.azure_openai.api_key = "k".into();
        config.azure_openai.deployment_name = "d".into();

        config.azure_openai.endpoint = "http://insecure.example.com".into();
        assert!(matches!(
            validate(&mut config),
            Err(ConfigError::ValidationError(_))
        ));

        config.azure_openai.endpoint = "https://res.openai.azure.com/openai".into();
        assert!(matches!(
            validate(&mut config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn validate_trims_trailing_slash() {
        let mut config = Config::default();
        config.azure_openai.api_key = "k".into();
        config.azure_openai.deployment_name = "d".into();
        config.azure_openai.endpoint = "https://res.openai.azure.com/".into();

        validate(&mut config).unwrap();
        assert_eq!(config.azure_openai.endpoint, "https://res.openai.azure.com");
    }

    #[test]
    fn loads_workflow_section_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[azure_openai]
api_key = "file-key"
endpoint = "https://res.openai.azure.com"
deployment_name = "gpt-4o"

[workflow]
temperature = 0.2
fallback_ticker = "ETH"
"#
        )
        .unwrap();

        let config = load_config_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.azure_openai.api_key, "file-key");
        assert_eq!(config.workflow.temperature, 0.2);
        assert_eq!(config.workflow.fallback_ticker, "ETH");
        // Unset workflow fields keep their defaults.
        assert_eq!(config.workflow.confidence_threshold, 0.85);
    }

    #[test]
    fn redact_keeps_a_short_prefix() {
        assert_eq!(redact("abcdef123456"), "abcd...");
        assert_eq!(redact("abc"), "****");
    }

    #[test]
    fn redact_handles_multibyte_keys() {
        // A key whose fourth byte falls inside a multibyte character must
        // not split it.
        assert_eq!(redact("aaaключ"), "aaaк...");
        assert_eq!(redact("ключ"), "****");
    }
}
