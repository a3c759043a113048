use async_trait::async_trait;
use futures::future::join_all;

use crate::types::Article;
use crate::Result;

/// Articles whose extract is not longer than this are dropped from random
/// batches as low-content pages.
pub const MIN_EXTRACT_CHARS: usize = 50;

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Returns the name of the content provider
    fn name(&self) -> &str;

    /// Fetches one random article. Either every request behind it succeeds
    /// or the whole call fails.
    async fn fetch_random_article(&self) -> Result<Article>;

    /// Full-text search. Failures yield an empty list.
    async fn search_articles(&self, query: &str, limit: usize) -> Vec<Article>;

    /// Fetches `count` random articles concurrently and returns the ones
    /// that arrived with enough content. One failure never aborts the rest.
    async fn fetch_random_articles(&self, count: usize) -> Vec<Article> {
        let results = join_all((0..count).map(|_| self.fetch_random_article())).await;

        let mut failed = 0;
        let mut thin = 0;
        let mut articles = Vec::with_capacity(count);
        for result in results {
            match result {
                Ok(article) if article.has_extract_longer_than(MIN_EXTRACT_CHARS) => {
                    articles.push(article)
                }
                Ok(article) => {
                    tracing::debug!("Skipping low-content article: {}", article.title);
                    thin += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch random article from {}: {}", self.name(), e);
                    failed += 1;
                }
            }
        }

        if articles.is_empty() && count > 0 {
            tracing::error!(
                "Batch of {} from {} produced no usable articles ({} failed, {} too short)",
                count,
                self.name(),
                failed,
                thin
            );
        }
        articles
    }
}
