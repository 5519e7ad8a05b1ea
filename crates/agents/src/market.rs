use crate::error::AgentError;
use crate::sources::MarketDataSource;
use crate::Agent;
use analytics::IndicatorEngine;
use async_trait::async_trait;
use core_types::AnalysisState;
use futures::future::join_all;
use std::sync::Arc;

/// Fetches price history for every extracted asset, concurrently.
pub struct PriceRetrieval {
    source: Arc<dyn MarketDataSource>,
}

impl PriceRetrieval {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Agent for PriceRetrieval {
    fn name(&self) -> &'static str {
        "price_retrieval"
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<(), AgentError> {
        let tickers = state.tickers();
        let fetches = tickers.iter().map(|t| self.source.price_history(t));
        let results = join_all(fetches).await;

        let mut total_points = 0;
        for (ticker, result) in tickers.into_iter().zip(results) {
            let history = result?;
            total_points += history.len();
            state.price_history.insert(ticker, history);
        }

        state.log_agent(
            self.name(),
            format!(
                "Retrieved {} price points across {} asset(s)",
                total_points,
                state.price_history.len()
            ),
        );
        Ok(())
    }
}

/// Runs the indicator engine over every asset's price history.
pub struct TechnicalAnalysis {
    engine: IndicatorEngine,
}

impl TechnicalAnalysis {
    pub fn new() -> Self {
        Self {
            engine: IndicatorEngine::new(),
        }
    }
}

impl Default for TechnicalAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for TechnicalAnalysis {
    fn name(&self) -> &'static str {
        "technical_analysis"
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<(), AgentError> {
        for (ticker, history) in &state.price_history {
            let set = self.engine.calculate(history)?;
            state.indicators.insert(ticker.clone(), set);
        }

        state.log_agent(
            self.name(),
            format!(
                "Calculated technical indicators for {} asset(s)",
                state.indicators.len()
            ),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SampleMarketData;
    use core_types::ExtractedAsset;

    fn state_with_assets(tickers: &[&str]) -> AnalysisState {
        let mut state = AnalysisState::new("test");
        state.ticker = tickers[0].to_string();
        state.extracted_assets = tickers
            .iter()
            .map(|t| ExtractedAsset {
                ticker: t.to_string(),
                name: t.to_string(),
                confidence: 0.95,
            })
            .collect();
        state
    }

    #[tokio::test]
    async fn retrieves_history_for_every_asset() {
        let agent = PriceRetrieval::new(Arc::new(SampleMarketData::new()));
        let mut state = state_with_assets(&["BTC", "ETH"]);

        agent.run(&mut state).await.unwrap();

        assert_eq!(state.price_history.len(), 2);
        assert_eq!(state.primary_prices().unwrap().len(), 30);
    }

    #[tokio::test]
    async fn indicators_follow_price_retrieval() {
        let price = PriceRetrieval::new(Arc::new(SampleMarketData::new()));
        let ta = TechnicalAnalysis::new();
        let mut state = state_with_assets(&["SOL"]);

        price.run(&mut state).await.unwrap();
        ta.run(&mut state).await.unwrap();

        let set = state.primary_indicators().unwrap();
        assert!(set.rsi > 0.0 && set.rsi < 100.0);
        assert!(set.bollinger_upper >= set.bollinger_lower);
    }
}
