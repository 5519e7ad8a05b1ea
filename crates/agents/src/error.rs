use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Chat model error: {0}")]
    Llm(#[from] llm_client::LlmError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("State error: {0}")]
    Core(#[from] core_types::CoreError),

    #[error("Data source error: {0}")]
    Source(String),

    #[error("Failed to parse model output: {0}")]
    Parse(String),
}
