use crate::error::AgentError;
use crate::prompts;
use crate::Agent;
use assets::{
    asset_by_ticker, assets_in_sector, database_json, needs_review, resolve,
    sector_mappings_json, Sector,
};
use async_trait::async_trait;
use configuration::WorkflowConfig;
use core_types::{AnalysisMode, AnalysisState, ExtractedAsset};
use llm_client::{ChatMessage, ChatModel};
use serde::Deserialize;
use std::sync::Arc;

/// Extracts the assets a request is about.
///
/// The model is asked for a structured JSON answer against the inlined asset
/// database; if the call or the parse fails, extraction falls back to the
/// lexical resolver and finally to the configured default ticker, so the
/// pipeline always has something to analyze.
pub struct AssetExtraction {
    model: Arc<dyn ChatModel>,
    fallback_ticker: String,
    confidence_threshold: f64,
}

impl AssetExtraction {
    pub fn new(model: Arc<dyn ChatModel>, config: &WorkflowConfig) -> Self {
        Self {
            model,
            fallback_ticker: config.fallback_ticker.clone(),
            confidence_threshold: config.confidence_threshold,
        }
    }

    async fn extract_with_model(&self, request: &str) -> Result<Extraction, AgentError> {
        let prompt =
            prompts::render_asset_extraction(request, &database_json(), &sector_mappings_json());
        let response = self
            .model
            .complete(&[ChatMessage::user(prompt)])
            .await?;
        parse_extraction(&response)
    }

    /// The fallback chain when the model call or the parse fails: a lexical
    /// asset match, then a sector-name match, then the configured default.
    fn fallback_extraction(&self, request: &str) -> Extraction {
        if let Some(info) = resolve(request) {
            return Extraction {
                assets: vec![ExtractedAsset {
                    ticker: info.ticker.to_string(),
                    name: info.name.to_string(),
                    confidence: info.base_confidence,
                }],
                mode: AnalysisMode::AssetSpecific,
                parse_notes: Some("resolved lexically after model failure".to_string()),
                review_requested: false,
                review_reason: None,
            };
        }

        if let Some(sector) = resolve_sector(request) {
            let assets: Vec<ExtractedAsset> = assets_in_sector(sector)
                .into_iter()
                .map(|info| ExtractedAsset {
                    ticker: info.ticker.to_string(),
                    name: info.name.to_string(),
                    confidence: info.base_confidence,
                })
                .collect();
            if !assets.is_empty() {
                return Extraction {
                    assets,
                    mode: AnalysisMode::Sector,
                    parse_notes: Some(format!("resolved sector {sector:?} lexically")),
                    review_requested: true,
                    review_reason: Some("sector_request".to_string()),
                };
            }
        }

        Extraction {
            assets: vec![ExtractedAsset {
                ticker: self.fallback_ticker.clone(),
                name: asset_by_ticker(&self.fallback_ticker)
                    .map(|a| a.name.to_string())
                    .unwrap_or_else(|| self.fallback_ticker.clone()),
                confidence: 0.5,
            }],
            mode: AnalysisMode::AssetSpecific,
            parse_notes: None,
            review_requested: true,
            review_reason: Some("extraction_error".to_string()),
        }
    }
}

/// Finds a sector name mentioned on a word boundary in the request.
fn resolve_sector(text: &str) -> Option<Sector> {
    text.split(|c: char| !c.is_alphanumeric())
        .find_map(Sector::parse)
}

/// The JSON contract the extraction prompt pins down.
#[derive(Debug, Deserialize)]
struct RawExtraction {
    #[serde(default)]
    extracted_assets: Vec<RawAsset>,
    #[serde(default)]
    mode: Option<AnalysisMode>,
    #[serde(default)]
    parse_notes: Option<String>,
    #[serde(default)]
    hitl_required: bool,
    #[serde(default)]
    hitl_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAsset {
    ticker: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    confidence: f64,
}

/// A normalized extraction result, ready to apply to the state.
#[derive(Debug)]
struct Extraction {
    assets: Vec<ExtractedAsset>,
    mode: AnalysisMode,
    parse_notes: Option<String>,
    review_requested: bool,
    review_reason: Option<String>,
}

/// Parses and normalizes the model's extraction JSON.
///
/// Unknown tickers are dropped rather than trusted; an answer with nothing
/// left after filtering is treated as a parse failure so the fallbacks kick
/// in.
fn parse_extraction(response: &str) -> Result<Extraction, AgentError> {
    let body = prompts::strip_code_fence(response);
    let raw: RawExtraction =
        serde_json::from_str(body).map_err(|e| AgentError::Parse(e.to_string()))?;

    let mut assets = Vec::new();
    for raw_asset in raw.extracted_assets {
        let ticker = raw_asset.ticker.to_ascii_uppercase();
        let Some(info) = asset_by_ticker(&ticker) else {
            tracing::warn!(%ticker, "model returned a ticker outside the database, dropping");
            continue;
        };
        let name = if raw_asset.name.is_empty() {
            info.name.to_string()
        } else {
            raw_asset.name
        };
        assets.push(ExtractedAsset {
            ticker,
            name,
            confidence: raw_asset.confidence.clamp(0.0, 1.0),
        });
    }

    // An empty list is the documented answer for a market-wide question;
    // anything else with no known assets left is a failed extraction.
    if assets.is_empty() && raw.mode != Some(AnalysisMode::Market) {
        return Err(AgentError::Parse(
            "extraction returned no known assets".to_string(),
        ));
    }

    Ok(Extraction {
        assets,
        mode: raw.mode.unwrap_or_default(),
        parse_notes: raw.parse_notes,
        review_requested: raw.hitl_required,
        review_reason: raw.hitl_reason.filter(|r| !r.is_empty()),
    })
}

#[async_trait]
impl Agent for AssetExtraction {
    fn name(&self) -> &'static str {
        "asset_extraction"
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<(), AgentError> {
        let mut extraction = match self.extract_with_model(&state.request).await {
            Ok(extraction) => extraction,
            Err(e) => {
                tracing::warn!(error = %e, "model extraction failed, trying lexical fallback");
                self.fallback_extraction(&state.request)
            }
        };

        // A market-wide question names nothing concrete; analyze the default
        // asset as the market representative.
        if extraction.assets.is_empty() {
            let info = asset_by_ticker(&self.fallback_ticker);
            extraction.assets.push(ExtractedAsset {
                ticker: self.fallback_ticker.clone(),
                name: info
                    .map(|a| a.name.to_string())
                    .unwrap_or_else(|| self.fallback_ticker.clone()),
                confidence: info.map(|a| a.base_confidence).unwrap_or(0.5),
            });
        }

        // The model can request a review itself; the confidence/meme policy
        // can also force one.
        let policy_review = extraction.assets.iter().any(|a| {
            needs_review(
                a.confidence,
                self.confidence_threshold,
                asset_by_ticker(&a.ticker),
            )
        });
        let review_required = extraction.review_requested || policy_review;
        let review_reason = extraction.review_reason.clone().or_else(|| {
            if !review_required {
                None
            } else if extraction
                .assets
                .iter()
                .any(|a| a.confidence < self.confidence_threshold)
            {
                Some("confidence_low".to_string())
            } else {
                Some("ambiguous_asset".to_string())
            }
        });

        let tickers: Vec<&str> = extraction.assets.iter().map(|a| a.ticker.as_str()).collect();
        let summary = format!(
            "Extracted {} asset(s): {:?} (mode: {:?})",
            tickers.len(),
            tickers,
            extraction.mode
        );

        state.ticker = extraction.assets[0].ticker.clone();
        state.extracted_assets = extraction.assets;
        state.analysis_mode = extraction.mode;
        state.parse_notes = extraction.parse_notes;
        state.review_required = review_required;
        state.review_reason = review_reason;
        state.log_agent(self.name(), summary);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedModel;

    #[tokio::test]
    async fn applies_a_well_formed_extraction() {
        let model = Arc::new(ScriptedModel::replying(vec![
            r#"{"extracted_assets": [{"ticker": "eth", "name": "", "confidence": 0.97}],
                "mode": "asset_specific", "parse_notes": "named directly",
                "hitl_required": false, "hitl_reason": ""}"#
                .to_string(),
        ]));
        let agent = AssetExtraction::new(model, &WorkflowConfig::default());
        let mut state = AnalysisState::new("Should I buy Ethereum?");

        agent.run(&mut state).await.unwrap();

        assert_eq!(state.ticker, "ETH");
        assert_eq!(state.extracted_assets[0].name, "Ethereum");
        assert!(!state.review_required);
        assert_eq!(state.messages.len(), 2);
    }

    #[tokio::test]
    async fn fenced_json_is_accepted() {
        let model = Arc::new(ScriptedModel::replying(vec![
            "```json\n{\"extracted_assets\": [{\"ticker\": \"BTC\", \"confidence\": 0.99}]}\n```"
                .to_string(),
        ]));
        let agent = AssetExtraction::new(model, &WorkflowConfig::default());
        let mut state = AnalysisState::new("bitcoin?");

        agent.run(&mut state).await.unwrap();
        assert_eq!(state.ticker, "BTC");
    }

    #[tokio::test]
    async fn unknown_tickers_fall_back_to_lexical_resolution() {
        let model = Arc::new(ScriptedModel::replying(vec![
            r#"{"extracted_assets": [{"ticker": "NOPE", "confidence": 0.9}]}"#.to_string(),
        ]));
        let agent = AssetExtraction::new(model, &WorkflowConfig::default());
        let mut state = AnalysisState::new("Analyze Solana for me");

        agent.run(&mut state).await.unwrap();
        assert_eq!(state.ticker, "SOL");
        assert_eq!(
            state.parse_notes.as_deref(),
            Some("resolved lexically after model failure")
        );
    }

    #[tokio::test]
    async fn market_mode_replies_analyze_the_default_asset() {
        let model = Arc::new(ScriptedModel::replying(vec![
            r#"{"extracted_assets": [], "mode": "market",
                "parse_notes": "broad market question", "hitl_required": false}"#
                .to_string(),
        ]));
        let agent = AssetExtraction::new(model, &WorkflowConfig::default());
        let mut state = AnalysisState::new("how does the whole market look?");

        agent.run(&mut state).await.unwrap();

        assert_eq!(state.analysis_mode, AnalysisMode::Market);
        assert_eq!(state.ticker, "BTC");
        assert!(!state.review_required);
        assert_eq!(state.parse_notes.as_deref(), Some("broad market question"));
    }

    #[tokio::test]
    async fn sector_requests_fall_back_to_representatives() {
        let agent = AssetExtraction::new(
            Arc::new(ScriptedModel::failing()),
            &WorkflowConfig::default(),
        );
        let mut state = AnalysisState::new("how is the defi space holding up");

        agent.run(&mut state).await.unwrap();

        assert_eq!(state.analysis_mode, AnalysisMode::Sector);
        assert_eq!(state.ticker, "AAVE");
        assert_eq!(state.extracted_assets.len(), 4);
        assert!(state.review_required);
        assert_eq!(state.review_reason.as_deref(), Some("sector_request"));
    }

    #[tokio::test]
    async fn total_failure_uses_the_configured_fallback() {
        let model = Arc::new(ScriptedModel::failing());
        let agent = AssetExtraction::new(model, &WorkflowConfig::default());
        let mut state = AnalysisState::new("what's up with the market");

        agent.run(&mut state).await.unwrap();

        assert_eq!(state.ticker, "BTC");
        assert!(state.review_required);
        assert_eq!(state.review_reason.as_deref(), Some("extraction_error"));
        assert_eq!(state.extracted_assets[0].confidence, 0.5);
    }

    #[tokio::test]
    async fn low_confidence_forces_a_review() {
        let model = Arc::new(ScriptedModel::replying(vec![
            r#"{"extracted_assets": [{"ticker": "FET", "confidence": 0.6}],
                "hitl_required": false}"#
                .to_string(),
        ]));
        let agent = AssetExtraction::new(model, &WorkflowConfig::default());
        let mut state = AnalysisState::new("fetch ai?");

        agent.run(&mut state).await.unwrap();
        assert!(state.review_required);
        assert_eq!(state.review_reason.as_deref(), Some("confidence_low"));
    }
}
