use crate::enums::AnalysisMode;
use crate::error::CoreError;
use crate::structs::{
    AgentMessage, ExtractedAsset, IndicatorSet, NewsArticle, PricePoint, RiskProfile,
    SentimentReport,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The shared state threaded through every agent in the analysis pipeline.
///
/// Each agent reads the fields produced upstream, writes its own, and appends
/// exactly one entry to the message log. The log is append-only; nothing in
/// the pipeline rewrites history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisState {
    pub session_id: Uuid,

    /// The raw user request that started the session.
    pub request: String,

    /// The primary ticker the analysis is centered on.
    pub ticker: String,
    pub analysis_mode: AnalysisMode,
    pub extracted_assets: Vec<ExtractedAsset>,
    pub parse_notes: Option<String>,

    /// Whether the extraction asked for a human review, and why.
    pub review_required: bool,
    pub review_reason: Option<String>,
    pub asset_warnings: Vec<String>,

    /// Per-ticker data produced by the retrieval and analysis stages.
    pub price_history: HashMap<String, Vec<PricePoint>>,
    pub indicators: HashMap<String, IndicatorSet>,
    pub news: HashMap<String, Vec<NewsArticle>>,
    pub sentiment: HashMap<String, SentimentReport>,

    pub risk_profile: Option<RiskProfile>,
    pub report: Option<String>,

    pub messages: Vec<AgentMessage>,
}

impl AnalysisState {
    /// Creates a fresh session state seeded with the user's request.
    pub fn new(request: impl Into<String>) -> Self {
        let request = request.into();
        Self {
            session_id: Uuid::new_v4(),
            ticker: String::new(),
            analysis_mode: AnalysisMode::default(),
            extracted_assets: Vec::new(),
            parse_notes: None,
            review_required: false,
            review_reason: None,
            asset_warnings: Vec::new(),
            price_history: HashMap::new(),
            indicators: HashMap::new(),
            news: HashMap::new(),
            sentiment: HashMap::new(),
            risk_profile: None,
            report: None,
            messages: vec![AgentMessage::user(&request)],
            request,
        }
    }

    /// Appends an agent-authored entry to the message log.
    pub fn log_agent(&mut self, agent: &str, content: impl Into<String>) {
        self.messages.push(AgentMessage::agent(agent, content));
    }

    /// The tickers the pipeline is operating on, primary first.
    pub fn tickers(&self) -> Vec<String> {
        self.extracted_assets
            .iter()
            .map(|a| a.ticker.clone())
            .collect()
    }

    /// Price history for the primary ticker.
    pub fn primary_prices(&self) -> Result<&[PricePoint], CoreError> {
        self.price_history
            .get(&self.ticker)
            .map(Vec::as_slice)
            .ok_or_else(|| CoreError::MissingTicker(self.ticker.clone()))
    }

    /// Indicator set for the primary ticker.
    pub fn primary_indicators(&self) -> Result<&IndicatorSet, CoreError> {
        self.indicators
            .get(&self.ticker)
            .ok_or_else(|| CoreError::MissingTicker(self.ticker.clone()))
    }

    /// Sentiment report for the primary ticker.
    pub fn primary_sentiment(&self) -> Result<&SentimentReport, CoreError> {
        self.sentiment
            .get(&self.ticker)
            .ok_or_else(|| CoreError::MissingTicker(self.ticker.clone()))
    }
}
