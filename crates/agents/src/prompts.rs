//! Prompt templates for the AI-backed agents.
//!
//! Each template has a `render_*` function that substitutes the dynamic
//! parts. The extraction and sentiment prompts pin down a JSON contract the
//! corresponding agents parse; keep the two sides in sync.

/// Asks the model to pull assets out of a request, using the inlined asset
/// database and sector mappings as its only source of truth.
pub fn render_asset_extraction(
    user_input: &str,
    asset_database: &str,
    sector_mappings: &str,
) -> String {
    format!(
        r#"You are a cryptocurrency asset extraction specialist. Identify which assets the user is asking about.

Only use tickers that appear in the asset database below. If the user asks about a whole sector, pick the representative tickers for that sector from the sector mappings and set "mode" to "sector". If no concrete asset or sector is named, set "mode" to "market" and return an empty asset list.

Asset database:
{asset_database}

Sector mappings:
{sector_mappings}

User request:
{user_input}

Return only a JSON object with this structure:
{{
    "extracted_assets": [{{"ticker": "BTC", "name": "Bitcoin", "confidence": 0.99}}],
    "mode": "asset_specific" | "sector" | "market",
    "parse_notes": "<short note on how the request was interpreted>",
    "hitl_required": <true if any match is ambiguous or low-confidence>,
    "hitl_reason": "confidence_low" | "ambiguous_asset" | "sector_request" | ""
}}

JSON response:"#
    )
}

/// Asks the model for a sentiment read over a batch of news articles,
/// returned as the JSON the sentiment agent parses.
pub fn render_sentiment(ticker: &str, news_content: &str) -> String {
    format!(
        r#"You are a financial sentiment analyst. Analyze the sentiment of news articles about {ticker}.

News articles:
{news_content}

Analyze the sentiment and return a JSON response with the following structure:
{{
    "overall_sentiment": <float between -1 and 1, where -1 is very negative, 0 is neutral, 1 is very positive>,
    "positive_ratio": <float between 0 and 1>,
    "negative_ratio": <float between 0 and 1>,
    "neutral_ratio": <float between 0 and 1>,
    "confidence": <float between 0 and 1, confidence in the analysis>,
    "key_sentiment_drivers": ["list", "of", "key", "factors"]
}}

Return only the JSON response:"#
    )
}

/// Asks the model for the final markdown report.
pub fn render_report(
    ticker: &str,
    technical_indicators: &str,
    sentiment_scores: &str,
    risk_profile: &str,
    news_summary: &str,
) -> String {
    format!(
        r#"You are a senior financial analyst specializing in cryptocurrency analysis. Generate a comprehensive, professional analysis report for {ticker}.

Technical analysis data:
{technical_indicators}

Sentiment analysis:
{sentiment_scores}

Risk profile:
{risk_profile}

News summary:
{news_summary}

Generate a comprehensive report that includes:
1. Executive Summary
2. Technical Analysis with interpretation
3. Sentiment Analysis insights
4. Risk Assessment
5. Investment Recommendation
6. Key Takeaways

Make the report professional, data-driven, and actionable. Use markdown formatting.

Report:"#
    )
}

/// Strips a markdown code fence from a model response, if present, so the
/// body can be fed to the JSON parser. Models regularly wrap structured
/// output in ```json fences despite instructions.
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the optional language tag on the opening fence.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
