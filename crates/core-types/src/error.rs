use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("No data available for ticker '{0}'")]
    MissingTicker(String),
}
