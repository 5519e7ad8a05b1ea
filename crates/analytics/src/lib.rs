//! # CryptoAnalyst Analytics
//!
//! Stateless technical-analysis and risk math. This is a pure logic crate:
//! it takes price history and sentiment as input and produces the
//! `IndicatorSet` and `RiskProfile` consumed by the reporting stage. It has
//! no knowledge of models, HTTP, or the pipeline.

pub mod error;
pub mod indicators;
pub mod risk;

// Re-export the key components to create a clean, public-facing API.
pub use error::AnalyticsError;
pub use indicators::IndicatorEngine;
pub use risk::RiskEngine;
