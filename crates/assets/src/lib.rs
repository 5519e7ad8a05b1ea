//! # CryptoAnalyst Asset Reference Data
//!
//! This crate holds the static cryptocurrency asset database and the pure
//! lookup logic built on top of it: ticker/alias/misspelling resolution,
//! sector membership, and the review-trigger policy used by the pipeline.
//!
//! It is a Layer 0 crate with no IO and no knowledge of the rest of the
//! system; everything here is deterministic and synchronous.

pub mod database;
pub mod resolve;

pub use database::{
    asset_by_ticker, assets_in_sector, database_json, is_stablecoin, sector_mappings_json,
    AssetInfo, Sector, CRYPTO_ASSETS, MISSPELLINGS, SECTOR_MAPPINGS,
};
pub use resolve::resolve;

/// Default extraction confidence below which a human review is requested.
pub const CONFIDENCE_THRESHOLD: f64 = 0.85;

/// Whether an extraction result should be escalated for human review.
///
/// Low confidence always triggers a review; meme-sector assets do too,
/// regardless of confidence, since their aliases collide with ordinary words.
pub fn needs_review(confidence: f64, threshold: f64, asset: Option<&AssetInfo>) -> bool {
    if confidence < threshold {
        return true;
    }
    asset.is_some_and(|a| a.sectors.contains(&Sector::Meme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_confidence_triggers_review() {
        assert!(needs_review(0.5, CONFIDENCE_THRESHOLD, asset_by_ticker("BTC")));
        assert!(!needs_review(0.99, CONFIDENCE_THRESHOLD, asset_by_ticker("BTC")));
    }

    #[test]
    fn meme_coins_always_trigger_review() {
        assert!(needs_review(0.99, CONFIDENCE_THRESHOLD, asset_by_ticker("DOGE")));
        assert!(needs_review(0.99, CONFIDENCE_THRESHOLD, asset_by_ticker("PEPE")));
    }

    #[test]
    fn unknown_asset_reviews_only_on_confidence() {
        assert!(needs_review(0.2, CONFIDENCE_THRESHOLD, None));
        assert!(!needs_review(0.9, CONFIDENCE_THRESHOLD, None));
    }
}
