pub mod backfill;
pub mod cli;
pub mod loader;
pub mod logging;
pub mod processor;
pub mod providers;

pub use cli::{handle_command, NewsArgs, NewsCommands};
pub use loader::NewsLoader;
pub use logging::{init_logging, Logger};
pub use processor::{Processor, TopicReport};
pub use providers::{NewsSource, Provider, ProviderKeys};

pub mod prelude {
    pub use super::backfill::ContentBackfill;
    pub use super::providers::{NewsSource, Provider, ProviderKeys};
    pub use super::{NewsLoader, Processor};
    pub use pulse_core::{Article, Error, RawArticle, Result};
}
