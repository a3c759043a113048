use clap::{Args, Subcommand};
use ws_core::{BookmarkedArticle, Result};

use crate::BookmarkStore;

#[derive(Args, Debug, Clone)]
pub struct BookmarkArgs {
    #[command(subcommand)]
    pub command: BookmarkCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum BookmarkCommands {
    /// Show saved articles, newest first
    List,
    /// Forget one bookmark by page id
    Remove { id: u64 },
    /// Forget every bookmark
    Clear,
}

pub async fn handle_command(args: BookmarkArgs, store: &BookmarkStore) -> Result<()> {
    match args.command {
        BookmarkCommands::List => {
            let bookmarks = store.bookmarks().await;
            if bookmarks.is_empty() {
                println!("No bookmarks yet");
            }
            for bookmark in &bookmarks {
                println!("{}", format_bookmark(bookmark));
            }
        }
        BookmarkCommands::Remove { id } => {
            if store.is_bookmarked(id).await {
                store.remove_bookmark(id).await;
                tracing::info!("🗑️ Removed bookmark {}", id);
            } else {
                println!("No bookmark with id {}", id);
            }
        }
        BookmarkCommands::Clear => {
            let count = store.len().await;
            store.clear_all_bookmarks().await;
            tracing::info!("🧹 Cleared {} bookmarks", count);
        }
    }
    Ok(())
}

pub fn format_bookmark(bookmark: &BookmarkedArticle) -> String {
    format!(
        "🔖 [{}] {} (saved {})\n   {}",
        bookmark.id(),
        bookmark.article.title,
        bookmark.bookmarked_at.format("%Y-%m-%d %H:%M"),
        bookmark.article.url
    )
}
