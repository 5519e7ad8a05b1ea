pub mod enums;
pub mod error;
pub mod state;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{AnalysisMode, MessageRole, Recommendation, RiskLevel};
pub use error::CoreError;
pub use state::AnalysisState;
pub use structs::{
    AgentMessage, ExtractedAsset, IndicatorSet, NewsArticle, PricePoint, RiskProfile,
    SentimentReport,
};
