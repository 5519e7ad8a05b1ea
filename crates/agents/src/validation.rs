use crate::error::AgentError;
use crate::Agent;
use assets::{asset_by_ticker, is_stablecoin, Sector};
use async_trait::async_trait;
use configuration::WorkflowConfig;
use core_types::AnalysisState;

/// Checks the extracted assets and records warnings the reporter surfaces:
/// stablecoins (indicator math says little about a peg), low-confidence
/// matches, and meme coins.
pub struct AssetValidation {
    confidence_threshold: f64,
}

impl AssetValidation {
    pub fn new(config: &WorkflowConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
        }
    }
}

#[async_trait]
impl Agent for AssetValidation {
    fn name(&self) -> &'static str {
        "asset_validation"
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<(), AgentError> {
        let mut warnings = Vec::new();

        for asset in &state.extracted_assets {
            if is_stablecoin(&asset.ticker) {
                warnings.push(format!(
                    "Stablecoin detected: {} - technical analysis may not be meaningful",
                    asset.ticker
                ));
            }
            if asset.confidence < self.confidence_threshold {
                warnings.push(format!(
                    "Low confidence in {}: {:.2}",
                    asset.ticker, asset.confidence
                ));
            }
            if asset_by_ticker(&asset.ticker)
                .is_some_and(|info| info.sectors.contains(&Sector::Meme))
            {
                warnings.push(format!(
                    "Meme coin detected: {} - high volatility expected",
                    asset.ticker
                ));
            }
        }

        let summary = format!("Asset validation complete. Warnings: {}", warnings.len());
        state.asset_warnings = warnings;
        state.log_agent(self.name(), summary);
        Ok(())
    }
}

/// The human-in-the-loop gate.
///
/// When a review was requested this records the reason-specific notice and
/// continues; the pipeline runs unattended, so the gate documents rather
/// than blocks, mirroring how operators see it in the session log.
#[derive(Debug, Default)]
pub struct HumanReview {}

impl HumanReview {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Agent for HumanReview {
    fn name(&self) -> &'static str {
        "human_review"
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<(), AgentError> {
        if !state.review_required {
            state.log_agent(
                self.name(),
                "No human intervention required, proceeding with analysis",
            );
            return Ok(());
        }

        let tickers: Vec<&str> = state
            .extracted_assets
            .iter()
            .map(|a| a.ticker.as_str())
            .collect();
        let message = match state.review_reason.as_deref() {
            Some("confidence_low") => format!(
                "Low confidence in asset extraction. Extracted: {tickers:?}. Proceeding with analysis."
            ),
            Some("ambiguous_asset") => format!(
                "Ambiguous asset detected. Extracted: {tickers:?}. Proceeding with analysis."
            ),
            Some("sector_request") => format!(
                "Sector request detected. Representative assets: {tickers:?}. Proceeding with analysis."
            ),
            other => format!(
                "Human review required for: {}. Proceeding with analysis.",
                other.unwrap_or("unknown")
            ),
        };

        tracing::info!(reason = ?state.review_reason, "human review requested");
        state.log_agent(self.name(), message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ExtractedAsset;

    fn state_with(ticker: &str, confidence: f64) -> AnalysisState {
        let mut state = AnalysisState::new("test");
        state.ticker = ticker.to_string();
        state.extracted_assets = vec![ExtractedAsset {
            ticker: ticker.to_string(),
            name: ticker.to_string(),
            confidence,
        }];
        state
    }

    #[tokio::test]
    async fn stablecoins_and_memes_get_warnings() {
        let agent = AssetValidation::new(&WorkflowConfig::default());

        let mut state = state_with("USDT", 0.96);
        agent.run(&mut state).await.unwrap();
        assert_eq!(state.asset_warnings.len(), 1);
        assert!(state.asset_warnings[0].contains("Stablecoin"));

        let mut state = state_with("DOGE", 0.9);
        agent.run(&mut state).await.unwrap();
        assert!(state.asset_warnings[0].contains("Meme coin"));
    }

    #[tokio::test]
    async fn confident_majors_pass_clean() {
        let agent = AssetValidation::new(&WorkflowConfig::default());
        let mut state = state_with("BTC", 0.99);
        agent.run(&mut state).await.unwrap();
        assert!(state.asset_warnings.is_empty());
    }

    #[tokio::test]
    async fn review_gate_records_the_reason() {
        let agent = HumanReview::new();

        let mut state = state_with("FET", 0.6);
        state.review_required = true;
        state.review_reason = Some("confidence_low".to_string());
        agent.run(&mut state).await.unwrap();
        let last = state.messages.last().unwrap();
        assert!(last.content.contains("Low confidence"));

        let mut state = state_with("BTC", 0.99);
        agent.run(&mut state).await.unwrap();
        let last = state.messages.last().unwrap();
        assert!(last.content.contains("No human intervention"));
    }
}
