use clap::{Args, Subcommand};
use pulse_core::{truncate_chars, Result};

use crate::processor::Processor;
use crate::providers::Provider;

pub const DEFAULT_TOPICS: [&str; 4] = ["technology", "science", "sports", "business"];
pub const DEFAULT_MAX_ARTICLES: usize = 3;

const PREVIEW_CHARS: usize = 160;

#[derive(Args, Debug, Clone)]
pub struct NewsArgs {
    #[command(subcommand)]
    pub command: NewsCommands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum NewsCommands {
    /// Fetch, summarize, synthesize and store news for each topic
    Process {
        /// Topics to process (defaults to technology, science, sports, business)
        topics: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_MAX_ARTICLES)]
        max_articles: usize,
    },
    /// Print normalized articles for a topic without summarizing or storing
    Fetch {
        topic: String,
        #[arg(long, default_value_t = 5)]
        max: usize,
        /// Query a single provider (newsdata, gnews, thenewsapi) instead of the fallback chain
        #[arg(long)]
        provider: Option<Provider>,
    },
    /// List news providers and whether an API key is configured
    Providers,
}

/// Topics to process: the given list, or the defaults when it is empty.
pub fn topics_or_default(topics: &[String]) -> Vec<String> {
    if topics.is_empty() {
        DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()
    } else {
        topics.to_vec()
    }
}

pub async fn handle_command(args: NewsArgs, processor: &Processor) -> Result<()> {
    match args.command {
        NewsCommands::Process { topics, max_articles } => {
            let reports = processor
                .process_topics(&topics_or_default(&topics), max_articles)
                .await;
            for report in reports {
                println!(
                    "{:<12} fetched {:>2}  stored {:>2}  failed {:>2}",
                    report.topic, report.fetched, report.stored, report.failed
                );
            }
        }
        NewsCommands::Fetch { topic, max, provider } => {
            let loader = processor.loader();
            let articles = match provider {
                Some(provider) => loader.load_from(provider, &topic, max).await,
                None => loader.get_news(&topic, max).await,
            };
            println!("Found {} articles", articles.len());
            for article in articles {
                println!("📰 {} ({})", article.title, article.source);
                println!("   {}", article.url);
                println!("   {}…", truncate_chars(&article.content, PREVIEW_CHARS));
            }
        }
        NewsCommands::Providers => {
            for (provider, configured) in processor.loader().providers() {
                let status = if configured { "✓ key configured" } else { "✗ no key" };
                println!(
                    "{} {:<12} {:<11} {}",
                    provider.emoji(),
                    provider.name(),
                    provider.cli_name(),
                    status
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: NewsArgs,
    }

    fn parse(argv: &[&str]) -> NewsCommands {
        let argv = std::iter::once("pulse").chain(argv.iter().copied());
        TestCli::try_parse_from(argv).unwrap().args.command
    }

    #[test]
    fn test_process_defaults() {
        assert_eq!(
            parse(&["process"]),
            NewsCommands::Process {
                topics: Vec::new(),
                max_articles: DEFAULT_MAX_ARTICLES,
            }
        );
        assert_eq!(
            topics_or_default(&[]),
            vec!["technology", "science", "sports", "business"]
        );
    }

    #[test]
    fn test_process_with_topics() {
        let command = parse(&["process", "health", "science", "--max-articles", "1"]);
        let NewsCommands::Process { topics, max_articles } = command else {
            panic!("expected process");
        };
        assert_eq!(topics_or_default(&topics), vec!["health", "science"]);
        assert_eq!(max_articles, 1);
    }

    #[test]
    fn test_fetch_with_provider() {
        assert_eq!(
            parse(&["fetch", "sports", "--provider", "gnews", "--max", "2"]),
            NewsCommands::Fetch {
                topic: "sports".to_string(),
                max: 2,
                provider: Some(Provider::GNews),
            }
        );
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let argv = ["pulse", "fetch", "sports", "--provider", "bing"];
        assert!(TestCli::try_parse_from(argv).is_err());
    }
}
