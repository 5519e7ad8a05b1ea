use crate::database::{asset_by_ticker, AssetInfo, CRYPTO_ASSETS, MISSPELLINGS};

/// Resolves an asset from free text without calling a model.
///
/// This is the lexical fallback used when AI extraction fails: it scans the
/// text for tickers, aliases, and known misspellings on word boundaries and
/// returns the longest phrase match, so "bitcoin cash" resolves to BCH
/// rather than BTC.
pub fn resolve(text: &str) -> Option<&'static AssetInfo> {
    let haystack = text.to_lowercase();
    let mut best: Option<(usize, &'static AssetInfo)> = None;

    let mut consider = |phrase: &str, asset: &'static AssetInfo| {
        if contains_phrase(&haystack, phrase)
            && best.map_or(true, |(len, _)| phrase.len() > len)
        {
            best = Some((phrase.len(), asset));
        }
    };

    for asset in CRYPTO_ASSETS {
        consider(&asset.ticker.to_lowercase(), asset);
        for alias in asset.aliases {
            consider(alias, asset);
        }
    }
    for (misspelling, ticker) in MISSPELLINGS {
        if let Some(asset) = asset_by_ticker(ticker) {
            consider(misspelling, asset);
        }
    }

    best.map(|(_, asset)| asset)
}

/// Whether `phrase` occurs in `haystack` delimited by non-alphanumerics.
///
/// Short tickers like "op" and "ada" appear inside ordinary words, so a
/// plain substring search would misfire constantly.
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(phrase) {
        let begin = start + pos;
        let end = begin + phrase.len();
        let before_ok = begin == 0
            || !haystack[..begin]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let after_ok = end == haystack.len()
            || !haystack[end..].chars().next().is_some_and(|c| c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = begin + 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_full_names_and_tickers() {
        assert_eq!(resolve("Analyze Bitcoin for me").unwrap().ticker, "BTC");
        assert_eq!(resolve("what about SOL today?").unwrap().ticker, "SOL");
    }

    #[test]
    fn longest_phrase_wins() {
        assert_eq!(resolve("thoughts on bitcoin cash?").unwrap().ticker, "BCH");
        assert_eq!(resolve("thoughts on bitcoin?").unwrap().ticker, "BTC");
    }

    #[test]
    fn misspellings_are_corrected() {
        assert_eq!(resolve("is etherium worth it").unwrap().ticker, "ETH");
    }

    #[test]
    fn short_tickers_need_word_boundaries() {
        // "op" inside "opportunity" and "ada" inside "Canada" must not match.
        assert!(resolve("a great opportunity in Canada").is_none());
        assert_eq!(resolve("should I buy OP?").unwrap().ticker, "OP");
    }

    #[test]
    fn unrelated_text_resolves_to_nothing() {
        assert!(resolve("what's the weather like").is_none());
    }
}
