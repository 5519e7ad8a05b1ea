use crate::error::AnalyticsError;
use core_types::{IndicatorSet, PricePoint, Recommendation, RiskLevel, RiskProfile, SentimentReport};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// RSI bounds for the overbought/oversold calls.
const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;

/// Sentiment magnitude strong enough to move a hold off the fence.
const SENTIMENT_NUDGE: f64 = 0.6;

/// A Bollinger band width of 20% of the SMA maps to a volatility score of 1.
const FULL_VOLATILITY_WIDTH: f64 = 0.2;

/// A stateless calculator that derives a `RiskProfile` from the indicator
/// set, the sentiment read, and the latest price.
#[derive(Debug, Default)]
pub struct RiskEngine {}

impl RiskEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assess(
        &self,
        indicators: &IndicatorSet,
        sentiment: &SentimentReport,
        prices: &[PricePoint],
    ) -> Result<RiskProfile, AnalyticsError> {
        let last = prices.last().ok_or_else(|| {
            AnalyticsError::NotEnoughData("price history is empty".to_string())
        })?;

        let volatility_score = volatility_score(indicators)?;

        let mut risk_level = if volatility_score < 0.3 {
            RiskLevel::Low
        } else if volatility_score < 0.7 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        };
        // Strongly negative news escalates the risk read one band.
        if sentiment.overall_sentiment < -0.5 {
            risk_level = match risk_level {
                RiskLevel::Low => RiskLevel::Moderate,
                _ => RiskLevel::High,
            };
        }

        let recommendation = if indicators.rsi >= RSI_OVERBOUGHT {
            Recommendation::Sell
        } else if indicators.rsi <= RSI_OVERSOLD {
            Recommendation::Buy
        } else if sentiment.overall_sentiment >= SENTIMENT_NUDGE {
            Recommendation::Buy
        } else if sentiment.overall_sentiment <= -SENTIMENT_NUDGE {
            Recommendation::Sell
        } else {
            Recommendation::Hold
        };

        // Exits sit at the Bollinger bands, clamped so they always bracket
        // the last close.
        let lower = to_decimal(indicators.bollinger_lower)?;
        let upper = to_decimal(indicators.bollinger_upper)?;
        let stop_loss = lower.min(last.price).round_dp(2);
        let take_profit = upper.max(last.price).round_dp(2);

        let confidence =
            (sentiment.confidence * (1.0 - 0.3 * volatility_score)).clamp(0.0, 1.0);

        Ok(RiskProfile {
            volatility_score,
            risk_level,
            recommendation,
            stop_loss,
            take_profit,
            confidence,
        })
    }
}

/// Bollinger band width relative to the SMA, normalized into [0, 1].
fn volatility_score(indicators: &IndicatorSet) -> Result<f64, AnalyticsError> {
    if indicators.sma_20 <= 0.0 {
        return Err(AnalyticsError::InvalidData(format!(
            "SMA must be positive, got {}",
            indicators.sma_20
        )));
    }
    let width = (indicators.bollinger_upper - indicators.bollinger_lower) / indicators.sma_20;
    Ok((width / FULL_VOLATILITY_WIDTH).clamp(0.0, 1.0))
}

/// Converts an indicator value back to `Decimal` for price-level fields.
fn to_decimal(value: f64) -> Result<Decimal, AnalyticsError> {
    Decimal::from_f64(value).ok_or_else(|| {
        AnalyticsError::InvalidData(format!("value {value} is not representable as Decimal"))
    })
}
