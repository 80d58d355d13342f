use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pulse_core::{Error, NewsStore, Result, SpeechSynthesizer, Summarizer, RETENTION};
use pulse_inference::{create_summarizer, create_synthesizer, AudioGenerator, SummaryGenerator};
use pulse_news::cli::DEFAULT_MAX_ARTICLES;
use pulse_news::{
    handle_command, init_logging, NewsArgs, NewsCommands, NewsLoader, Processor, Provider,
};
use pulse_web::AppState;
use tracing::{error, info, warn};

mod config;
mod duration;

use config::Settings;
use duration::HumanDuration;

const STORAGE_CHECK_TIMEOUT: Duration = Duration::from_secs(10);
const STORAGE_CHECK_RETRIES: u32 = 3;
const STORAGE_CHECK_PAUSE: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(
    name = "pulse",
    author,
    version,
    about = "Pulse AI: news summaries you can listen to",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch, summarize, synthesize and store news
    Process {
        /// Topics to process (defaults to technology, science, sports, business)
        topics: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_MAX_ARTICLES)]
        max_articles: usize,
        /// Repeat forever with this pause between runs (e.g. 1h, 30m, 1h15m30s)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Print normalized articles for a topic without storing anything
    Fetch {
        topic: String,
        #[arg(long, default_value_t = 5)]
        max: usize,
        /// newsdata, gnews or thenewsapi
        #[arg(long)]
        provider: Option<Provider>,
    },
    /// Serve the web page and JSON API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
    /// List news providers and whether their API key is set
    Providers,
}

async fn check_storage(storage: &Arc<dyn NewsStore>, storage_type: &str) -> Result<()> {
    storage.ping().await?;
    info!("🏦 Storage backend reachable (using {})", storage_type);
    Ok(())
}

/// Only a hung check is retried. A store that answers with an error is
/// reported at once.
async fn check_storage_with_retry(
    storage: &Arc<dyn NewsStore>,
    storage_type: &str,
    max_retries: u32,
    timeout: Duration,
) -> Result<()> {
    for attempt in 1..=max_retries {
        match tokio::time::timeout(timeout, check_storage(storage, storage_type)).await {
            Ok(result) => return result,
            Err(elapsed) if attempt == max_retries => {
                return Err(Error::Storage(format!("Storage health check timed out: {}", elapsed)));
            }
            Err(_) => {
                info!("Storage health check timed out, retrying {}/{}...", attempt, max_retries);
                tokio::time::sleep(STORAGE_CHECK_PAUSE).await;
            }
        }
    }

    Err(Error::Storage("Storage health check was not attempted".to_string()))
}

fn build_processor(settings: &Settings, storage: Arc<dyn NewsStore>) -> Result<Processor> {
    let loader = NewsLoader::from_keys(&settings.provider_keys())?;
    let configured: Vec<_> = loader
        .providers()
        .into_iter()
        .filter(|(_, configured)| *configured)
        .map(|(provider, _)| provider.name())
        .collect();
    if configured.is_empty() {
        warn!("No news provider API key configured; set NEWSDATA_KEY, GNEWS_KEY or THENEWS_KEY");
    } else {
        info!("🦗 News providers ready: {}", configured.join(", "));
    }

    let summarizer: Arc<dyn Summarizer> = create_summarizer(&settings.model_config())?;
    info!("🧠 Summarization model initialized (using {})", summarizer.name());

    let synthesizer: Arc<dyn SpeechSynthesizer> = create_synthesizer(&settings.speech_config())?;
    info!("🔊 Speech engine initialized (using {})", synthesizer.name());

    Ok(Processor::new(
        loader,
        SummaryGenerator::new(summarizer),
        AudioGenerator::new(synthesizer),
        storage,
        settings.audio_dir.clone(),
    ))
}

async fn serve(
    host: &str,
    port: u16,
    settings: &Settings,
    storage: Arc<dyn NewsStore>,
) -> Result<()> {
    let addr = tokio::net::lookup_host((host, port))
        .await?
        .next()
        .ok_or_else(|| Error::Config(format!("Cannot resolve listen address {}:{}", host, port)))?;

    tokio::fs::create_dir_all(&settings.audio_dir).await?;
    pulse_web::serve(addr, AppState::new(storage, settings.audio_dir.clone())).await
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_env_files();
    let cli = Cli::parse();
    init_logging(&cli.settings.log_level);

    let settings = cli.settings;
    let storage = pulse_storage::create_storage(
        &settings.storage,
        Some(settings.database_url.as_str()),
        RETENTION,
    )
    .await?;

    info!("💾 Checking storage connection...");
    check_storage_with_retry(
        &storage,
        &settings.storage,
        STORAGE_CHECK_RETRIES,
        STORAGE_CHECK_TIMEOUT,
    )
    .await?;
    info!("✨ Storage initialized successfully (using {})", settings.storage);

    let news_command = match cli.command {
        Commands::Serve { host, port } => return serve(&host, port, &settings, storage).await,
        Commands::Process {
            topics,
            max_articles,
            interval: Some(interval),
        } => {
            let processor = build_processor(&settings, storage)?;
            let args = NewsArgs {
                command: NewsCommands::Process { topics, max_articles },
            };
            info!("Running in periodic mode with {} interval", interval);
            loop {
                info!("Starting processing cycle");
                if let Err(e) = handle_command(args.clone(), &processor).await {
                    error!("Error during processing: {}", e);
                }
                info!("Waiting {} before next cycle", interval);
                tokio::time::sleep(interval.0).await;
            }
        }
        Commands::Process {
            topics,
            max_articles,
            interval: None,
        } => NewsCommands::Process { topics, max_articles },
        Commands::Fetch { topic, max, provider } => NewsCommands::Fetch { topic, max, provider },
        Commands::Providers => NewsCommands::Providers,
    };

    let processor = build_processor(&settings, storage)?;
    handle_command(NewsArgs { command: news_command }, &processor).await
}
