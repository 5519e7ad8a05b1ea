use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message in the session log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
}

/// The shape of an analysis request, as classified during asset extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// One or more explicitly named assets (e.g., "analyze Bitcoin").
    AssetSpecific,
    /// A whole sector (e.g., "how are AI coins doing?").
    Sector,
    /// A broad market question with no concrete asset.
    Market,
}

impl Default for AnalysisMode {
    fn default() -> Self {
        AnalysisMode::AssetSpecific
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::AssetSpecific => write!(f, "asset_specific"),
            AnalysisMode::Sector => write!(f, "sector"),
            AnalysisMode::Market => write!(f, "market"),
        }
    }
}

/// Coarse risk classification produced by the risk assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Moderate => write!(f, "moderate"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// The final position recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy => write!(f, "buy"),
            Recommendation::Hold => write!(f, "hold"),
            Recommendation::Sell => write!(f, "sell"),
        }
    }
}
