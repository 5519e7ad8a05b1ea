use crate::error::AgentError;
use crate::prompts;
use crate::sources::NewsSource;
use crate::Agent;
use async_trait::async_trait;
use core_types::{AnalysisState, NewsArticle, SentimentReport};
use futures::future::join_all;
use llm_client::{ChatMessage, ChatModel};
use std::sync::Arc;

/// Gathers news articles for every extracted asset, concurrently.
pub struct NewsRetrieval {
    source: Arc<dyn NewsSource>,
}

impl NewsRetrieval {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Agent for NewsRetrieval {
    fn name(&self) -> &'static str {
        "news_retrieval"
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<(), AgentError> {
        let tickers = state.tickers();
        let fetches = tickers.iter().map(|t| self.source.articles(t));
        let results = join_all(fetches).await;

        let mut total = 0;
        for (ticker, result) in tickers.into_iter().zip(results) {
            let articles = result?;
            total += articles.len();
            state.news.insert(ticker, articles);
        }

        state.log_agent(
            self.name(),
            format!(
                "Retrieved {} article(s) across {} asset(s)",
                total,
                state.news.len()
            ),
        );
        Ok(())
    }
}

/// Asks the model for a structured sentiment read per asset.
///
/// A failed call or malformed JSON falls back to a fixed neutral-positive
/// read rather than aborting the pipeline; the analysis is degraded, not
/// dead, when the model misbehaves.
pub struct SentimentAnalysis {
    model: Arc<dyn ChatModel>,
}

impl SentimentAnalysis {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    async fn analyze(&self, ticker: &str, articles: &[NewsArticle]) -> SentimentReport {
        let news_content = articles
            .iter()
            .map(|a| format!("Title: {}\nContent: {}", a.title, a.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = prompts::render_sentiment(ticker, &news_content);
        let parsed = match self.model.complete(&[ChatMessage::user(prompt)]).await {
            Ok(response) => {
                serde_json::from_str::<SentimentReport>(prompts::strip_code_fence(&response))
                    .map_err(|e| AgentError::Parse(e.to_string()))
            }
            Err(e) => Err(e.into()),
        };

        match parsed {
            Ok(report) => clamp_report(report),
            Err(e) => {
                tracing::warn!(ticker, error = %e, "sentiment analysis failed, using fallback");
                fallback_sentiment()
            }
        }
    }
}

/// The fixed sentiment used when the model cannot provide one.
fn fallback_sentiment() -> SentimentReport {
    SentimentReport {
        overall_sentiment: 0.65,
        positive_ratio: 0.6,
        negative_ratio: 0.2,
        neutral_ratio: 0.2,
        confidence: 0.85,
        key_sentiment_drivers: vec![
            "market sentiment".to_string(),
            "news coverage".to_string(),
        ],
    }
}

/// Forces the model's numbers into their documented ranges.
fn clamp_report(mut report: SentimentReport) -> SentimentReport {
    report.overall_sentiment = report.overall_sentiment.clamp(-1.0, 1.0);
    report.positive_ratio = report.positive_ratio.clamp(0.0, 1.0);
    report.negative_ratio = report.negative_ratio.clamp(0.0, 1.0);
    report.neutral_ratio = report.neutral_ratio.clamp(0.0, 1.0);
    report.confidence = report.confidence.clamp(0.0, 1.0);
    report
}

#[async_trait]
impl Agent for SentimentAnalysis {
    fn name(&self) -> &'static str {
        "sentiment_analysis"
    }

    async fn run(&self, state: &mut AnalysisState) -> Result<(), AgentError> {
        let per_ticker: Vec<(String, Vec<NewsArticle>)> = state
            .news
            .iter()
            .map(|(t, a)| (t.clone(), a.clone()))
            .collect();

        for (ticker, articles) in per_ticker {
            let report = self.analyze(&ticker, &articles).await;
            state.sentiment.insert(ticker, report);
        }

        let summary = match state.primary_sentiment() {
            Ok(report) => format!(
                "Analyzed sentiment: {:.2} with {:.2} confidence",
                report.overall_sentiment, report.confidence
            ),
            Err(_) => "Analyzed sentiment for 0 assets".to_string(),
        };
        state.log_agent(self.name(), summary);
        Ok(())
    }
}
