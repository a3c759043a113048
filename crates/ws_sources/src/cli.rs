use clap::{Args, Subcommand};
use ws_core::{Article, ArticleSource, Result};

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[command(subcommand)]
    pub command: SourceCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SourceCommands {
    /// Fetch a batch of random articles
    Random {
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Search articles by text
    Search {
        query: String,
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
}

pub async fn handle_command(args: SourceArgs, source: &dyn ArticleSource) -> Result<()> {
    let articles = match args.command {
        SourceCommands::Random { count } => {
            tracing::info!("🎲 Fetching {} random articles from {}", count, source.name());
            source.fetch_random_articles(count).await
        }
        SourceCommands::Search { query, limit } => {
            tracing::info!("🔍 Searching {} for {:?}", source.name(), query);
            source.search_articles(&query, limit).await
        }
    };

    println!("Found {} articles", articles.len());
    for article in &articles {
        println!("{}", format_article(article));
    }
    Ok(())
}

pub fn format_article(article: &Article) -> String {
    let mut preview: String = article.extract.chars().take(160).collect();
    if preview.len() < article.extract.len() {
        preview.push('…');
    }
    format!("📖 [{}] {}\n   {}\n   {}", article.id, article.title, preview, article.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_article_truncates_preview() {
        let article = Article {
            id: 7,
            title: "Long".to_string(),
            extract: "a".repeat(400),
            thumbnail: None,
            page_image: None,
            url: "https://example.org/Long".to_string(),
        };
        let text = format_article(&article);
        assert!(text.starts_with("📖 [7] Long"));
        assert!(text.contains(&format!("{}…", "a".repeat(160))));
        assert!(text.ends_with("https://example.org/Long"));
    }
}
