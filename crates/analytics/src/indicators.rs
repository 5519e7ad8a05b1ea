use crate::error::AnalyticsError;
use core_types::{IndicatorSet, PricePoint};
use rust_decimal::prelude::*;
use ta::indicators::{
    BollingerBands, ExponentialMovingAverage, MovingAverageConvergenceDivergence,
    RelativeStrengthIndex, SimpleMovingAverage,
};
use ta::Next;

/// Standard indicator periods used throughout the analysis.
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BB_PERIOD: usize = 20;
pub const BB_STD_DEV: f64 = 2.0;
pub const SMA_PERIOD: usize = 20;
pub const EMA_PERIOD: usize = 12;

/// A stateless calculator that derives the standard indicator set from an
/// asset's price history.
#[derive(Debug, Default)]
pub struct IndicatorEngine {}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the full close series through each indicator and reports the
    /// final values.
    ///
    /// Histories shorter than the longest warm-up window still produce a
    /// result (the `ta` indicators self-seed), but the caller should prefer
    /// at least `MACD_SLOW` points for meaningful numbers.
    pub fn calculate(&self, prices: &[PricePoint]) -> Result<IndicatorSet, AnalyticsError> {
        if prices.is_empty() {
            return Err(AnalyticsError::NotEnoughData(
                "price history is empty".to_string(),
            ));
        }

        let mut rsi = RelativeStrengthIndex::new(RSI_PERIOD)
            .map_err(|e| AnalyticsError::Calculation(format!("RSI init: {e:?}")))?;
        let mut macd =
            MovingAverageConvergenceDivergence::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL)
                .map_err(|e| AnalyticsError::Calculation(format!("MACD init: {e:?}")))?;
        let mut bb = BollingerBands::new(BB_PERIOD, BB_STD_DEV)
            .map_err(|e| AnalyticsError::Calculation(format!("Bollinger init: {e:?}")))?;
        let mut sma = SimpleMovingAverage::new(SMA_PERIOD)
            .map_err(|e| AnalyticsError::Calculation(format!("SMA init: {e:?}")))?;
        let mut ema = ExponentialMovingAverage::new(EMA_PERIOD)
            .map_err(|e| AnalyticsError::Calculation(format!("EMA init: {e:?}")))?;

        let mut set = IndicatorSet {
            rsi: 0.0,
            macd: 0.0,
            bollinger_upper: 0.0,
            bollinger_lower: 0.0,
            sma_20: 0.0,
            ema_12: 0.0,
        };

        for point in prices {
            // Convert to f64 for `ta` crate compatibility.
            let close = point.price.to_f64().ok_or_else(|| {
                AnalyticsError::InvalidData(format!(
                    "price {} is not representable as f64",
                    point.price
                ))
            })?;

            set.rsi = rsi.next(close);
            set.macd = macd.next(close).macd;
            let bands = bb.next(close);
            set.bollinger_upper = bands.upper;
            set.bollinger_lower = bands.lower;
            set.sma_20 = sma.next(close);
            set.ema_12 = ema.next(close);
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn series(closes: &[f64]) -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| PricePoint {
                timestamp: start + Duration::days(i as i64),
                price: Decimal::from_f64(*c).unwrap(),
                volume: Decimal::from(1_000_000),
            })
            .collect()
    }

    #[test]
    fn empty_history_is_an_error() {
        let engine = IndicatorEngine::new();
        assert!(matches!(
            engine.calculate(&[]),
            Err(AnalyticsError::NotEnoughData(_))
        ));
    }

    #[test]
    fn steady_uptrend_reads_overbought() {
        let closes: Vec<f64> = (0..40).map(|i| 40_000.0 + 250.0 * i as f64).collect();
        let set = IndicatorEngine::new().calculate(&series(&closes)).unwrap();

        assert!(set.rsi > 70.0, "rsi was {}", set.rsi);
        assert!(set.macd > 0.0, "macd was {}", set.macd);
        assert!(set.bollinger_upper > set.bollinger_lower);
        // In an uptrend the shorter EMA leads the longer SMA.
        assert!(set.ema_12 > set.sma_20);
    }

    #[test]
    fn steady_downtrend_reads_oversold() {
        let closes: Vec<f64> = (0..40).map(|i| 50_000.0 - 250.0 * i as f64).collect();
        let set = IndicatorEngine::new().calculate(&series(&closes)).unwrap();

        assert!(set.rsi < 30.0, "rsi was {}", set.rsi);
        assert!(set.macd < 0.0, "macd was {}", set.macd);
        assert!(set.ema_12 < set.sma_20);
    }

    #[test]
    fn flat_series_centers_the_bands() {
        let closes = vec![45_000.0; 30];
        let set = IndicatorEngine::new().calculate(&series(&closes)).unwrap();

        assert!((set.bollinger_upper - 45_000.0).abs() < 1.0);
        assert!((set.bollinger_lower - 45_000.0).abs() < 1.0);
        assert!((set.sma_20 - 45_000.0).abs() < 1.0);
    }
}
