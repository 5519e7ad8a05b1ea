//! # CryptoAnalyst Agents
//!
//! This crate contains the analysis pipeline: a universal `Agent` trait, the
//! sequential `Pipeline` that threads `AnalysisState` through the stages,
//! and the concrete agents (extraction, validation, the human-review gate,
//! price/news retrieval, technical analysis, sentiment, reporting).
//!
//! ## Architectural Principles
//!
//! - **Strategy-agnostic orchestration:** The pipeline only knows the
//!   `Agent` trait; stages can be reordered or swapped without touching it.
//! - **Injected effects:** Anything that talks to the outside world (the
//!   chat model, market data, news) comes in through a trait object, so the
//!   whole pipeline runs deterministically under test.
//! - **Fail soft where the original did:** extraction, sentiment, and report
//!   generation degrade to fallbacks on model failure; data and math stages
//!   fail hard.

use async_trait::async_trait;
use configuration::WorkflowConfig;
use core_types::AnalysisState;
use llm_client::ChatModel;
use std::sync::Arc;

pub mod error;
pub mod extraction;
pub mod market;
pub mod news;
pub mod prompts;
pub mod reporter;
pub mod sources;
pub mod validation;

// Re-export the key components to create a clean, public-facing API.
pub use error::AgentError;
pub use extraction::AssetExtraction;
pub use market::{PriceRetrieval, TechnicalAnalysis};
pub use news::{NewsRetrieval, SentimentAnalysis};
pub use reporter::Reporter;
pub use sources::{MarketDataSource, NewsSource, SampleMarketData, SampleNews};
pub use validation::{AssetValidation, HumanReview};

/// The core trait every pipeline stage implements.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The stage name used in logs and the session message log.
    fn name(&self) -> &'static str;

    /// Runs the stage against the shared state.
    async fn run(&self, state: &mut AnalysisState) -> Result<(), AgentError>;
}

/// An ordered sequence of agents executed against one `AnalysisState`.
pub struct Pipeline {
    agents: Vec<Box<dyn Agent>>,
}

impl Pipeline {
    pub fn new(agents: Vec<Box<dyn Agent>>) -> Self {
        Self { agents }
    }

    /// Builds the standard analysis pipeline in the canonical stage order.
    pub fn standard(
        model: Arc<dyn ChatModel>,
        market: Arc<dyn MarketDataSource>,
        news: Arc<dyn NewsSource>,
        config: &WorkflowConfig,
    ) -> Self {
        Self::new(vec![
            Box::new(AssetExtraction::new(model.clone(), config)),
            Box::new(AssetValidation::new(config)),
            Box::new(HumanReview::new()),
            Box::new(PriceRetrieval::new(market)),
            Box::new(TechnicalAnalysis::new()),
            Box::new(NewsRetrieval::new(news)),
            Box::new(SentimentAnalysis::new(model.clone())),
            Box::new(Reporter::new(model)),
        ])
    }

    /// The stage names in execution order.
    pub fn stages(&self) -> Vec<&'static str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    /// Runs every stage in order.
    pub async fn run(&self, state: &mut AnalysisState) -> Result<(), AgentError> {
        self.run_with(state, |_| {}).await
    }

    /// Runs every stage in order, invoking `on_stage` with each stage's name
    /// before it executes (used for CLI progress reporting).
    pub async fn run_with<F>(
        &self,
        state: &mut AnalysisState,
        mut on_stage: F,
    ) -> Result<(), AgentError>
    where
        F: FnMut(&'static str),
    {
        for agent in &self.agents {
            on_stage(agent.name());
            tracing::info!(stage = agent.name(), session = %state.session_id, "running stage");
            agent.run(state).await?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedModel;
    use core_types::{Recommendation, RiskLevel};

    fn extraction_json(ticker: &str) -> String {
        format!(
            r#"{{"extracted_assets": [{{"ticker": "{ticker}", "confidence": 0.99}}],
                 "mode": "asset_specific", "hitl_required": false}}"#
        )
    }

    fn sentiment_json() -> String {
        r#"{"overall_sentiment": 0.4, "positive_ratio": 0.5, "negative_ratio": 0.2,
            "neutral_ratio": 0.3, "confidence": 0.9, "key_sentiment_drivers": ["etf inflows"]}"#
            .to_string()
    }

    #[tokio::test]
    async fn standard_pipeline_end_to_end() {
        let model = Arc::new(ScriptedModel::replying(vec![
            extraction_json("BTC"),
            sentiment_json(),
            "# BTC Report\nAll good.".to_string(),
        ]));
        let pipeline = Pipeline::standard(
            model,
            Arc::new(SampleMarketData::new()),
            Arc::new(SampleNews::new()),
            &WorkflowConfig::default(),
        );

        let mut state = AnalysisState::new("Analyze Bitcoin for me");
        pipeline.run(&mut state).await.unwrap();

        assert_eq!(state.ticker, "BTC");
        assert!(state.primary_indicators().is_ok());
        assert_eq!(state.primary_sentiment().unwrap().overall_sentiment, 0.4);
        assert_eq!(state.report.as_deref(), Some("# BTC Report\nAll good."));
        let profile = state.risk_profile.unwrap();
        assert!(matches!(
            profile.risk_level,
            RiskLevel::Low | RiskLevel::Moderate | RiskLevel::High
        ));
        // User message + one message per stage.
        assert_eq!(state.messages.len(), 1 + pipeline.stages().len());
    }

    #[tokio::test]
    async fn pipeline_survives_a_dead_model() {
        // Every model call fails: extraction resolves lexically, sentiment
        // and the report fall back, and the run still completes.
        let pipeline = Pipeline::standard(
            Arc::new(ScriptedModel::failing()),
            Arc::new(SampleMarketData::new()),
            Arc::new(SampleNews::new()),
            &WorkflowConfig::default(),
        );

        let mut state = AnalysisState::new("How is Ethereum doing?");
        pipeline.run(&mut state).await.unwrap();

        assert_eq!(state.ticker, "ETH");
        let report = state.report.unwrap();
        assert!(report.contains("# ETH Comprehensive Analysis Report"));
        let profile = state.risk_profile.unwrap();
        assert!(matches!(
            profile.recommendation,
            Recommendation::Buy | Recommendation::Hold | Recommendation::Sell
        ));
    }

    #[tokio::test]
    async fn progress_callback_sees_every_stage() {
        let pipeline = Pipeline::standard(
            Arc::new(ScriptedModel::failing()),
            Arc::new(SampleMarketData::new()),
            Arc::new(SampleNews::new()),
            &WorkflowConfig::default(),
        );

        let mut seen = Vec::new();
        let mut state = AnalysisState::new("bitcoin");
        pipeline
            .run_with(&mut state, |stage| seen.push(stage))
            .await
            .unwrap();

        assert_eq!(seen, pipeline.stages());
        assert_eq!(seen[0], "asset_extraction");
        assert_eq!(*seen.last().unwrap(), "reporter");
    }
}
