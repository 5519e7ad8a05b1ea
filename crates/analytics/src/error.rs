use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("Invalid data for calculation: {0}")]
    InvalidData(String),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
