pub mod cli;
pub mod wikipedia;

pub use cli::{handle_command, SourceArgs, SourceCommands};
pub use wikipedia::{WikipediaConfig, WikipediaSource};

pub mod prelude {
    pub use super::wikipedia::WikipediaSource;
    pub use ws_core::{Article, ArticleSource, Error, Result};
}
