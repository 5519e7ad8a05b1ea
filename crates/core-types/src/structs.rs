use crate::enums::{MessageRole, Recommendation, RiskLevel};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single observation in an asset's price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
    pub volume: Decimal,
}

/// A news article gathered for sentiment analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub content: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
}

/// The set of technical indicators reported for one asset.
///
/// Values are `f64` because the indicator math (the `ta` crate) operates on
/// floats; prices are only converted at that boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub rsi: f64,
    pub macd: f64,
    pub bollinger_upper: f64,
    pub bollinger_lower: f64,
    pub sma_20: f64,
    pub ema_12: f64,
}

/// The structured result of sentiment analysis over a batch of news articles.
///
/// `overall_sentiment` is in [-1, 1]; the three ratios and `confidence` are
/// in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub overall_sentiment: f64,
    pub positive_ratio: f64,
    pub negative_ratio: f64,
    pub neutral_ratio: f64,
    pub confidence: f64,
    #[serde(default)]
    pub key_sentiment_drivers: Vec<String>,
}

/// The risk assessment derived from indicators and sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub volatility_score: f64,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub confidence: f64,
}

/// One asset pulled out of the user's request, with the extractor's
/// confidence in the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedAsset {
    pub ticker: String,
    pub name: String,
    pub confidence: f64,
}

/// An entry in the session's append-only message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub role: MessageRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl AgentMessage {
    /// Creates a message authored by the end user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            agent: None,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a message authored by a named pipeline agent.
    pub fn agent(agent: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Agent,
            agent: Some(agent.into()),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
