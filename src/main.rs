use agents::{Pipeline, SampleMarketData, SampleNews};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use configuration::{redact, Config};
use indicatif::{ProgressBar, ProgressStyle};
use llm_client::{AzureOpenAiClient, ChatMessage};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// The main entry point for the CryptoAnalyst application.
#[tokio::main]
async fn main() {
    // Load environment variables from a .env file, if one exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Analyze(args) => handle_analyze(args).await,
        Commands::Ask(args) => handle_ask(args).await,
        Commands::Verify => handle_verify().await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A multi-agent cryptocurrency analysis assistant backed by Azure OpenAI.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis pipeline against a natural-language request.
    Analyze(AnalyzeArgs),

    /// Send a single prompt to the configured deployment and print the reply.
    Ask(AskArgs),

    /// Check the Azure OpenAI credentials with a minimal test call.
    Verify,
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// The analysis request (e.g., "What do you think about Bitcoin?").
    #[arg(long)]
    request: String,

    /// Also print the per-stage session log.
    #[arg(long)]
    detailed: bool,
}

#[derive(Parser)]
struct AskArgs {
    /// The prompt to send.
    #[arg(long)]
    prompt: String,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of a full pipeline run.
async fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let model = build_client(&config)?;

    let pipeline = Pipeline::standard(
        Arc::new(model),
        Arc::new(SampleMarketData::new()),
        Arc::new(SampleNews::new()),
        &config.workflow,
    );

    // Set up the progress bar, one tick per pipeline stage.
    let stages = pipeline.stages();
    let progress_bar = ProgressBar::new(stages.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut state = core_types::AnalysisState::new(&args.request);
    pipeline
        .run_with(&mut state, |stage| {
            progress_bar.set_message(stage.to_string());
            progress_bar.inc(1);
        })
        .await?;
    progress_bar.finish_with_message("done");

    print_summary(&state);

    if args.detailed {
        println!("\nSession log:");
        for message in &state.messages {
            let author = message.agent.as_deref().unwrap_or("user");
            println!("  [{}] {}: {}", message.timestamp.format("%H:%M:%S"), author, message.content);
        }
    }

    if let Some(report) = &state.report {
        println!("\n{report}");
    }

    Ok(())
}

/// Renders the run summary as a table.
fn print_summary(state: &core_types::AnalysisState) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![Cell::new("Field"), Cell::new("Value")]);
    table.add_row(vec!["Session".to_string(), state.session_id.to_string()]);
    table.add_row(vec!["Ticker".to_string(), state.ticker.clone()]);
    table.add_row(vec![
        "Mode".to_string(),
        state.analysis_mode.to_string(),
    ]);

    if let Ok(sentiment) = state.primary_sentiment() {
        table.add_row(vec![
            "Sentiment".to_string(),
            format!(
                "{:+.2} (confidence {:.2})",
                sentiment.overall_sentiment, sentiment.confidence
            ),
        ]);
    }
    if let Some(profile) = &state.risk_profile {
        table.add_row(vec!["Risk".to_string(), profile.risk_level.to_string()]);
        table.add_row(vec![
            "Recommendation".to_string(),
            profile.recommendation.to_string(),
        ]);
        table.add_row(vec![
            "Stop loss / take profit".to_string(),
            format!("{} / {}", profile.stop_loss, profile.take_profit),
        ]);
    }
    if !state.asset_warnings.is_empty() {
        table.add_row(vec![
            "Warnings".to_string(),
            state.asset_warnings.join("\n"),
        ]);
    }
    if state.review_required {
        table.add_row(vec![
            "Human review".to_string(),
            state
                .review_reason
                .clone()
                .unwrap_or_else(|| "requested".to_string()),
        ]);
    }

    println!("{table}");
}

// ==============================================================================
// Ask Command Logic
// ==============================================================================

/// Sends a single prompt and prints the model's reply.
async fn handle_ask(args: AskArgs) -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let model = build_client(&config)?;

    use llm_client::ChatModel;
    let reply = model.complete(&[ChatMessage::user(&args.prompt)]).await?;
    println!("{reply}");
    Ok(())
}

// ==============================================================================
// Verify Command Logic
// ==============================================================================

/// Checks the resolved credentials against the live deployment.
///
/// Prints the settings (key redacted) before the call so a failure is easy
/// to diagnose, then sends the fixed test prompt.
async fn handle_verify() -> anyhow::Result<()> {
    let config = configuration::load_config()?;
    let azure = &config.azure_openai;

    println!("Azure OpenAI configuration:");
    println!("  endpoint:        {}", azure.endpoint);
    println!("  deployment:      {}", azure.deployment_name);
    println!("  api version:     {}", azure.api_version);
    println!("  api key:         {}", redact(&azure.api_key));
    println!("  request url:     {}", llm_client::completion_url(azure));
    println!();

    let model = build_client(&config)?;
    match model.probe().await {
        Ok(reply) => {
            println!("Connection OK. Model replied: {reply}");
            Ok(())
        }
        Err(e) => {
            eprintln!("Verification failed: {e}");
            eprintln!();
            eprintln!("Checklist:");
            eprintln!("  1. The API key matches Key 1 or Key 2 in the Azure portal.");
            eprintln!("  2. The endpoint URL is correct (https://<resource>.openai.azure.com).");
            eprintln!("  3. The Azure OpenAI resource is active, not disabled or deleted.");
            eprintln!("  4. The deployment name matches the deployment in Azure AI Foundry.");
            Err(e.into())
        }
    }
}

fn build_client(config: &Config) -> anyhow::Result<AzureOpenAiClient> {
    Ok(AzureOpenAiClient::new(
        &config.azure_openai,
        config.workflow.temperature,
        Duration::from_secs(config.workflow.request_timeout_secs),
    )?)
}
