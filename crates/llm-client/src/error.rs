use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(
        "Azure OpenAI returned 401 Unauthorized: {detail}. Check that (1) the API key matches \
         Key 1/Key 2 under Keys and Endpoint in the portal, (2) the endpoint URL points at your \
         resource, (3) the resource is active, and (4) the deployment name matches an existing \
         deployment"
    )]
    Unauthorized { detail: String },

    #[error("Azure OpenAI returned {status}: [{code}] {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("The completion response contained no choices")]
    EmptyCompletion,
}
