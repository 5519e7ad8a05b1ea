use crate::error::AgentError;
use crate::prompts;
use crate::Agent;
use analytics::RiskEngine;
use async_trait::async_trait;
use core_types::{AnalysisState, IndicatorSet, RiskProfile, SentimentReport};
use llm_client::{ChatMessage, ChatModel};
use std::sync::Arc;

/// The final stage: derives the risk profile and produces the markdown
/// report, preferring the model's prose and falling back to a fixed template
/// when the call fails.
pub struct Reporter {
    model: Arc<dyn ChatModel>,
    risk: RiskEngine,
}

impl Reporter {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            risk: RiskEngine::new(),
        }
    }

    async fn generate(
        &self,
        state: &AnalysisState,
        risk_profile: &RiskProfile,
    ) -> Result<String, AgentError> {
        let indicators = state.primary_indicators()?;
        let sentiment = state.primary_sentiment()?;
        let article_count: usize = state.news.values().map(Vec::len).sum();

        let prompt = prompts::render_report(
            &state.ticker,
            &to_pretty_json(indicators)?,
            &to_pretty_json(sentiment)?,
            &to_pretty_json(risk_profile)?,
            &format!("Retrieved {article_count} relevant articles"),
        );
        Ok(self.model.complete(&[ChatMessage::user(prompt)]).await?)
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, AgentError> {
    serde_json::to_string_pretty(value).map_err(|e| AgentError::Parse(e.to_string()))
}

/// The template used when the model cannot write the report.
fn template_report(
    state: &AnalysisState,
    indicators: &IndicatorSet,
    sentiment: &SentimentReport,
    risk_profile: &RiskProfile,
) -> String {
    let mut report = format!("# {} Comprehensive Analysis Report\n\n", state.ticker);

    if !state.asset_warnings.is_empty() {
        report.push_str("## Warnings\n");
        for warning in &state.asset_warnings {
            report.push_str(&format!("- {warning}\n"));
        }
        report.push('\n');
    }

    report.push_str(&format!(
        "## Technical Analysis\n\
         - RSI: {:.1}\n\
         - MACD: {:.4}\n\
         - Bollinger Bands: {:.2} - {:.2}\n\n",
        indicators.rsi, indicators.macd, indicators.bollinger_lower, indicators.bollinger_upper
    ));

    report.push_str(&format!(
        "## Sentiment Analysis\n\
         - Overall Sentiment: {:.2}\n\
         - Confidence: {:.2}\n\n",
        sentiment.overall_sentiment, sentiment.confidence
    ));

    report.push_str(&format!(
        "## Risk Assessment\n\
         - Risk Level: {}\n\
         - Recommendation: {}\n\
         - Stop Loss: ${}\n\
         - Take Profit: ${}\n\n",
        risk_profile.risk_level,
        risk_profile.recommendation,
        risk_profile.stop_loss,
        risk_profile.take_profit
    ));

    let article_count: usize = state.news.values().map(Vec::len).sum();
    report.push_str(&format!(
        "## News Summary\nRetrieved {article_count} relevant articles.\n\n"
    ));

    report.push_str(&format!(
        "## Final Recommendation\nBased on technical indicators, sentiment analysis, and market \
         conditions, the recommendation is to {} {}.",
        risk_profile.recommendation, state.ticker
    ));

    report
}

#[async_trait]
impl Agent for Reporter {
    fn name(&self) -> &'static str {
        "reporter"
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<(), AgentError> {
        let risk_profile = self.risk.assess(
            state.primary_indicators()?,
            state.primary_sentiment()?,
            state.primary_prices()?,
        )?;

        let report = match self.generate(state, &risk_profile).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, "model report generation failed, using template");
                template_report(
                    state,
                    state.primary_indicators()?,
                    state.primary_sentiment()?,
                    &risk_profile,
                )
            }
        };

        state.risk_profile = Some(risk_profile);
        state.report = Some(report.clone());
        state.log_agent(self.name(), report);
        Ok(())
    }
}
