use serde::Serialize;
use serde_json::json;

/// Broad market sectors used for sector-level requests and review policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sector {
    #[serde(rename = "AI")]
    Ai,
    DeFi,
    Gaming,
    Layer1,
    Layer2,
    Meme,
    Stablecoin,
    Metaverse,
    Compute,
    Data,
}

impl Sector {
    /// Parses the sector names accepted in user-facing requests.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "AI" => Some(Sector::Ai),
            "DEFI" => Some(Sector::DeFi),
            "GAMING" => Some(Sector::Gaming),
            "LAYER1" => Some(Sector::Layer1),
            "LAYER2" => Some(Sector::Layer2),
            "MEME" => Some(Sector::Meme),
            "STABLECOIN" => Some(Sector::Stablecoin),
            _ => None,
        }
    }
}

/// One entry in the static asset database.
#[derive(Debug, Clone, Serialize)]
pub struct AssetInfo {
    pub ticker: &'static str,
    pub name: &'static str,
    /// Lowercase names and nicknames that identify the asset in free text.
    pub aliases: &'static [&'static str],
    /// How confidently a lexical match on this asset can be trusted.
    pub base_confidence: f64,
    pub sectors: &'static [Sector],
}

/// The asset database. Ordering matters only for deterministic iteration.
pub static CRYPTO_ASSETS: &[AssetInfo] = &[
    // Major cryptocurrencies
    AssetInfo { ticker: "BTC", name: "Bitcoin", aliases: &["bitcoin", "btc", "king", "king of crypto"], base_confidence: 0.99, sectors: &[Sector::Layer1] },
    AssetInfo { ticker: "ETH", name: "Ethereum", aliases: &["ethereum", "eth", "etherium", "smart contract platform"], base_confidence: 0.98, sectors: &[Sector::Layer1] },
    AssetInfo { ticker: "ADA", name: "Cardano", aliases: &["cardano", "ada"], base_confidence: 0.95, sectors: &[Sector::Layer1] },
    AssetInfo { ticker: "DOT", name: "Polkadot", aliases: &["polkadot", "dot", "internet of blockchains"], base_confidence: 0.95, sectors: &[Sector::Layer1] },
    AssetInfo { ticker: "LINK", name: "Chainlink", aliases: &["chainlink", "link", "oracle network"], base_confidence: 0.94, sectors: &[] },
    AssetInfo { ticker: "UNI", name: "Uniswap", aliases: &["uniswap", "uni", "dex token"], base_confidence: 0.93, sectors: &[Sector::DeFi] },
    AssetInfo { ticker: "LTC", name: "Litecoin", aliases: &["litecoin", "ltc"], base_confidence: 0.92, sectors: &[] },
    AssetInfo { ticker: "BCH", name: "Bitcoin Cash", aliases: &["bitcoin cash", "bch"], base_confidence: 0.91, sectors: &[] },
    // Layer 1s and DeFi
    AssetInfo { ticker: "SOL", name: "Solana", aliases: &["solana", "sol"], base_confidence: 0.96, sectors: &[Sector::Layer1] },
    AssetInfo { ticker: "MATIC", name: "Polygon", aliases: &["polygon", "matic"], base_confidence: 0.94, sectors: &[Sector::Layer2] },
    AssetInfo { ticker: "AVAX", name: "Avalanche", aliases: &["avalanche", "avax"], base_confidence: 0.93, sectors: &[Sector::Layer1] },
    AssetInfo { ticker: "ATOM", name: "Cosmos", aliases: &["cosmos", "atom"], base_confidence: 0.92, sectors: &[] },
    AssetInfo { ticker: "ALGO", name: "Algorand", aliases: &["algorand", "algo"], base_confidence: 0.90, sectors: &[] },
    AssetInfo { ticker: "XLM", name: "Stellar", aliases: &["stellar", "xlm"], base_confidence: 0.89, sectors: &[] },
    AssetInfo { ticker: "VET", name: "VeChain", aliases: &["vechain", "vet"], base_confidence: 0.88, sectors: &[] },
    // AI and emerging sectors
    AssetInfo { ticker: "FET", name: "Fetch.ai", aliases: &["fetch.ai", "fetch", "fet"], base_confidence: 0.85, sectors: &[Sector::Ai] },
    AssetInfo { ticker: "NEAR", name: "NEAR Protocol", aliases: &["near protocol", "near"], base_confidence: 0.87, sectors: &[Sector::Ai, Sector::Layer1] },
    AssetInfo { ticker: "RNDR", name: "Render", aliases: &["render", "rndr"], base_confidence: 0.86, sectors: &[Sector::Ai, Sector::Compute] },
    AssetInfo { ticker: "OCEAN", name: "Ocean Protocol", aliases: &["ocean protocol", "ocean"], base_confidence: 0.84, sectors: &[Sector::Ai, Sector::Data] },
    AssetInfo { ticker: "AGIX", name: "SingularityNET", aliases: &["singularitynet", "agix"], base_confidence: 0.83, sectors: &[Sector::Ai] },
    // DeFi and Gaming
    AssetInfo { ticker: "AAVE", name: "Aave", aliases: &["aave"], base_confidence: 0.92, sectors: &[Sector::DeFi] },
    AssetInfo { ticker: "COMP", name: "Compound", aliases: &["compound", "comp"], base_confidence: 0.91, sectors: &[Sector::DeFi] },
    AssetInfo { ticker: "SUSHI", name: "SushiSwap", aliases: &["sushiswap", "sushi"], base_confidence: 0.89, sectors: &[Sector::DeFi] },
    AssetInfo { ticker: "AXS", name: "Axie Infinity", aliases: &["axie infinity", "axs"], base_confidence: 0.88, sectors: &[Sector::Gaming] },
    AssetInfo { ticker: "MANA", name: "Decentraland", aliases: &["decentraland", "mana"], base_confidence: 0.87, sectors: &[Sector::Gaming, Sector::Metaverse] },
    // Meme coins and trending
    AssetInfo { ticker: "PEPE", name: "Pepe", aliases: &["pepe"], base_confidence: 0.80, sectors: &[Sector::Meme] },
    AssetInfo { ticker: "DOGE", name: "Dogecoin", aliases: &["dogecoin", "doge"], base_confidence: 0.85, sectors: &[Sector::Meme] },
    AssetInfo { ticker: "SHIB", name: "Shiba Inu", aliases: &["shiba inu", "shib"], base_confidence: 0.84, sectors: &[Sector::Meme] },
    // Stablecoins
    AssetInfo { ticker: "USDT", name: "Tether", aliases: &["tether", "usdt"], base_confidence: 0.96, sectors: &[Sector::Stablecoin] },
    AssetInfo { ticker: "USDC", name: "USD Coin", aliases: &["usd coin", "usdc"], base_confidence: 0.95, sectors: &[Sector::Stablecoin] },
    AssetInfo { ticker: "DAI", name: "Dai", aliases: &["dai"], base_confidence: 0.94, sectors: &[Sector::Stablecoin] },
    // Layer 2s and scaling
    AssetInfo { ticker: "ARB", name: "Arbitrum", aliases: &["arbitrum", "arb"], base_confidence: 0.93, sectors: &[Sector::Layer2] },
    AssetInfo { ticker: "OP", name: "Optimism", aliases: &["optimism", "op"], base_confidence: 0.92, sectors: &[Sector::Layer2] },
    AssetInfo { ticker: "IMX", name: "Immutable", aliases: &["immutable", "imx"], base_confidence: 0.90, sectors: &[Sector::Layer2, Sector::Gaming] },
];

/// Representative assets per sector, used to answer sector-level requests.
pub static SECTOR_MAPPINGS: &[(Sector, &[&str])] = &[
    (Sector::Ai, &["FET", "NEAR", "RNDR", "OCEAN", "AGIX"]),
    (Sector::DeFi, &["AAVE", "COMP", "SUSHI", "UNI"]),
    (Sector::Gaming, &["AXS", "MANA", "IMX"]),
    (Sector::Layer1, &["BTC", "ETH", "SOL", "ADA", "DOT", "AVAX"]),
    (Sector::Layer2, &["ARB", "OP", "MATIC"]),
    (Sector::Meme, &["PEPE", "DOGE", "SHIB"]),
    (Sector::Stablecoin, &["USDT", "USDC", "DAI"]),
];

/// Common misspellings and full names mapped to the ticker they mean. Most
/// entries overlap with aliases; the resolver treats both the same way.
pub static MISSPELLINGS: &[(&str, &str)] = &[
    ("etherium", "ETH"),
    ("bitcon", "BTC"),
    ("solana", "SOL"),
    ("polkadot", "DOT"),
    ("chainlink", "LINK"),
    ("uniswap", "UNI"),
    ("litecoin", "LTC"),
    ("bitcoin cash", "BCH"),
    ("polygon", "MATIC"),
    ("avalanche", "AVAX"),
    ("cosmos", "ATOM"),
    ("algorand", "ALGO"),
    ("stellar", "XLM"),
    ("vechain", "VET"),
];

/// Looks up an asset by ticker, case-insensitively.
pub fn asset_by_ticker(ticker: &str) -> Option<&'static AssetInfo> {
    CRYPTO_ASSETS
        .iter()
        .find(|a| a.ticker.eq_ignore_ascii_case(ticker))
}

/// The representative assets for a sector, in mapping order.
pub fn assets_in_sector(sector: Sector) -> Vec<&'static AssetInfo> {
    SECTOR_MAPPINGS
        .iter()
        .find(|(s, _)| *s == sector)
        .map(|(_, tickers)| tickers.iter().filter_map(|t| asset_by_ticker(t)).collect())
        .unwrap_or_default()
}

pub fn is_stablecoin(ticker: &str) -> bool {
    asset_by_ticker(ticker).is_some_and(|a| a.sectors.contains(&Sector::Stablecoin))
}

/// The asset database rendered as JSON, for inlining into prompts.
pub fn database_json() -> String {
    let mut map = serde_json::Map::new();
    for asset in CRYPTO_ASSETS {
        map.insert(
            asset.ticker.to_string(),
            json!({
                "name": asset.name,
                "aliases": asset.aliases,
                "confidence": asset.base_confidence,
                "sectors": asset.sectors,
            }),
        );
    }
    serde_json::to_string_pretty(&map).unwrap_or_default()
}

/// The sector mappings rendered as JSON, for inlining into prompts.
pub fn sector_mappings_json() -> String {
    let mut map = serde_json::Map::new();
    for (sector, tickers) in SECTOR_MAPPINGS {
        let key = serde_json::to_value(sector)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        map.insert(key, json!(tickers));
    }
    serde_json::to_string_pretty(&map).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_lookup_is_case_insensitive() {
        assert_eq!(asset_by_ticker("btc").unwrap().name, "Bitcoin");
        assert_eq!(asset_by_ticker("BTC").unwrap().name, "Bitcoin");
        assert!(asset_by_ticker("XYZ").is_none());
    }

    #[test]
    fn sector_membership() {
        let defi = assets_in_sector(Sector::DeFi);
        let tickers: Vec<_> = defi.iter().map(|a| a.ticker).collect();
        assert_eq!(tickers, vec!["AAVE", "COMP", "SUSHI", "UNI"]);
    }

    #[test]
    fn stablecoins_are_flagged() {
        assert!(is_stablecoin("USDT"));
        assert!(is_stablecoin("usdc"));
        assert!(!is_stablecoin("BTC"));
    }

    #[test]
    fn database_json_is_valid_and_complete() {
        let parsed: serde_json::Value = serde_json::from_str(&database_json()).unwrap();
        let map = parsed.as_object().unwrap();
        assert_eq!(map.len(), CRYPTO_ASSETS.len());
        assert_eq!(map["BTC"]["name"], "Bitcoin");
        assert_eq!(map["FET"]["sectors"][0], "AI");
    }

    #[test]
    fn sector_mappings_json_uses_display_names() {
        let parsed: serde_json::Value =
            serde_json::from_str(&sector_mappings_json()).unwrap();
        assert_eq!(parsed["AI"][0], "FET");
        assert_eq!(parsed["DeFi"][3], "UNI");
    }
}
