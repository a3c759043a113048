use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use ws_core::logging::{init_logging, LogTarget};
use ws_core::{ArticleSource, ChatModel, Error};
use ws_feed::{FeedConfig, FeedController};
use ws_inference::models::{create_model, DummyModel, ModelKind};
use ws_inference::ConversationBridge;
use ws_sources::cli::{handle_command as handle_source_command, SourceArgs, SourceCommands};
use ws_sources::WikipediaSource;
use ws_storage::cli::{handle_command as handle_bookmark_command, BookmarkArgs};
use ws_storage::{create_store, BookmarkStore, StorageKind};
use ws_web::AppState;

mod browse;

const DEFAULT_PORT: u16 = 3000;

#[derive(Parser, Debug)]
#[command(author, version, about = "Endless scroll through random encyclopedia articles", long_about = None)]
pub struct Cli {
    /// Bookmark storage: memory, file or sqlite
    #[arg(long, global = true, default_value = "file")]
    storage: StorageKind,
    /// Directory for file and sqlite storage
    #[arg(long, global = true, default_value = "./.wisdomscroll")]
    storage_path: PathBuf,
    #[arg(long, global = true, default_value = "gemini", help = "Chat model: gemini (default), dummy, remote")]
    model: ModelKind,
    /// Gemini base URL override, or the service root for the remote model
    #[arg(long, global = true)]
    model_url: Option<String>,
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the web service (chat proxy and article endpoints)
    Serve {
        /// Defaults to $PORT, then 3000
        #[arg(long)]
        port: Option<u16>,
    },
    #[command(flatten)]
    Source(SourceCommands),
    /// Manage saved articles
    Bookmarks(BookmarkArgs),
    /// Scroll through articles in the terminal
    Browse,
}

fn resolve_port(flag: Option<u16>) -> u16 {
    flag.or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(DEFAULT_PORT)
}

fn chat_model(cli: &Cli) -> ws_core::Result<Arc<dyn ChatModel>> {
    let config = ws_inference::Config::from_env(cli.model, cli.model_url.clone());
    create_model(&config)
}

async fn bookmark_store(cli: &Cli) -> anyhow::Result<Arc<BookmarkStore>> {
    let backend = create_store(cli.storage, &cli.storage_path)
        .await
        .with_context(|| format!("opening {} storage at {}", cli.storage, cli.storage_path.display()))?;
    Ok(Arc::new(BookmarkStore::load(backend).await))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_target = match cli.command {
        Commands::Browse => LogTarget::File(cli.storage_path.clone()),
        _ => LogTarget::Stderr,
    };
    init_logging(&cli.log_level, log_target);

    let source: Arc<dyn ArticleSource> = Arc::new(WikipediaSource::new()?);

    match &cli.command {
        Commands::Serve { port } => {
            let model = match chat_model(&cli) {
                Ok(model) => Some(model),
                Err(Error::MissingCredential(name)) => {
                    warn!("⚠️ {} is not set, /api/chat will answer with an error", name);
                    None
                }
                Err(e) => return Err(e.into()),
            };
            ws_web::serve(AppState::new(model, source), resolve_port(*port)).await?;
        }
        Commands::Source(command) => {
            let args = SourceArgs { command: command.clone() };
            handle_source_command(args, source.as_ref()).await?;
        }
        Commands::Bookmarks(args) => {
            let store = bookmark_store(&cli).await?;
            handle_bookmark_command(args.clone(), &store).await?;
        }
        Commands::Browse => {
            let model = chat_model(&cli).unwrap_or_else(|e| {
                warn!("Chat model unavailable ({}), answering offline", e);
                Arc::new(DummyModel::new()) as Arc<dyn ChatModel>
            });
            let store = bookmark_store(&cli).await?;
            info!("🔖 {} bookmarks loaded", store.len().await);

            let controller = FeedController::new(source, FeedConfig::default());
            let browser = browse::Browser::new(controller, store, ConversationBridge::new(model)).await;
            browse::run(browser).await?;
        }
    }

    Ok(())
}
