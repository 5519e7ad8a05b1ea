use crate::error::AgentError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use core_types::{NewsArticle, PricePoint};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Number of daily points the sample source generates; enough to warm the
/// longest indicator window (26-period MACD).
const SAMPLE_DAYS: i64 = 30;

/// Where the price retrieval stage gets an asset's history from.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn price_history(&self, ticker: &str) -> Result<Vec<PricePoint>, AgentError>;
}

/// Where the news retrieval stage gets an asset's articles from.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn articles(&self, ticker: &str) -> Result<Vec<NewsArticle>, AgentError>;
}

/// A deterministic built-in market data source.
///
/// Generates a synthetic daily series seeded from the ticker name: a gentle
/// trend plus an oscillation, so indicator math has real structure to work
/// with and runs are reproducible without network access.
#[derive(Debug, Default)]
pub struct SampleMarketData {}

impl SampleMarketData {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MarketDataSource for SampleMarketData {
    async fn price_history(&self, ticker: &str) -> Result<Vec<PricePoint>, AgentError> {
        let seed = ticker_seed(ticker);
        let base = base_price(ticker);
        // Trend between -0.2% and +0.2% per day, phase from the seed.
        let drift = ((seed % 9) as f64 - 4.0) / 2_000.0;
        let phase = (seed % 7) as f64;

        let today = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| AgentError::Source("invalid midnight timestamp".to_string()))?
            .and_utc();

        let mut points = Vec::with_capacity(SAMPLE_DAYS as usize);
        for i in 0..SAMPLE_DAYS {
            let t = i as f64;
            let wave = 0.015 * (0.7 * t + phase).sin();
            let price = base * (1.0 + drift * t + wave);
            let volume = 1_000_000.0 * (1.0 + 0.1 * (0.5 * t + phase).cos());

            points.push(PricePoint {
                timestamp: today - Duration::days(SAMPLE_DAYS - 1 - i),
                price: to_decimal(price)?.round_dp(2),
                volume: to_decimal(volume)?.round_dp(0),
            });
        }
        Ok(points)
    }
}

/// A deterministic built-in news source with templated articles.
#[derive(Debug, Default)]
pub struct SampleNews {}

impl SampleNews {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NewsSource for SampleNews {
    async fn articles(&self, ticker: &str) -> Result<Vec<NewsArticle>, AgentError> {
        let now = Utc::now();
        Ok(vec![
            NewsArticle {
                title: format!("Major development for {ticker}"),
                content: format!(
                    "Significant news about {ticker} cryptocurrency with positive market sentiment \
                     following renewed institutional interest."
                ),
                source: "CryptoNews".to_string(),
                published_at: now - Duration::hours(2),
            },
            NewsArticle {
                title: format!("{ticker} market analysis"),
                content: format!(
                    "Market analysis for {ticker} shows mixed signals with moderate volatility \
                     and steady trading volume across major venues."
                ),
                source: "CoinDesk".to_string(),
                published_at: now - Duration::hours(3),
            },
        ])
    }
}

/// A stable per-ticker seed so generated data is reproducible.
fn ticker_seed(ticker: &str) -> u64 {
    ticker
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
}

/// Rough price scale per asset, so the sample data looks plausible.
fn base_price(ticker: &str) -> f64 {
    match ticker.to_ascii_uppercase().as_str() {
        "BTC" => 45_000.0,
        "ETH" => 2_500.0,
        "SOL" => 110.0,
        "USDT" | "USDC" | "DAI" => 1.0,
        _ => 10.0 + (ticker_seed(ticker) % 90) as f64,
    }
}

fn to_decimal(value: f64) -> Result<Decimal, AgentError> {
    Decimal::from_f64(value)
        .ok_or_else(|| AgentError::Source(format!("value {value} is not representable")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_prices_are_deterministic_and_long_enough() {
        let source = SampleMarketData::new();
        let a = source.price_history("BTC").await.unwrap();
        let b = source.price_history("BTC").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 30);
        assert!(a[0].timestamp < a[29].timestamp);
    }

    #[tokio::test]
    async fn different_tickers_get_different_series() {
        let source = SampleMarketData::new();
        let btc = source.price_history("BTC").await.unwrap();
        let eth = source.price_history("ETH").await.unwrap();
        assert_ne!(btc[0].price, eth[0].price);
    }

    #[tokio::test]
    async fn sample_news_mentions_the_ticker() {
        let articles = SampleNews::new().articles("SOL").await.unwrap();
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.title.contains("SOL")));
    }
}
