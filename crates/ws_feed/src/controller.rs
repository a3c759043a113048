use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use ws_core::{Article, ArticleSource};

use crate::feed::{Direction, Feed, FeedConfig, FeedStatus, NavigationOutcome};

/// Drives a [`Feed`] against an article source.
///
/// The controller is the only owner of the feed. Batch fetches run as
/// spawned tasks that hand their results back over a channel; nothing is
/// appended until the owner calls [`FeedController::poll_batches`] or
/// awaits [`FeedController::next_batch`], so every state change is a single
/// step taken by the owner.
pub struct FeedController {
    feed: Feed,
    source: Arc<dyn ArticleSource>,
    batches_tx: mpsc::UnboundedSender<Vec<Article>>,
    batches_rx: mpsc::UnboundedReceiver<Vec<Article>>,
}

impl FeedController {
    pub fn new(source: Arc<dyn ArticleSource>, config: FeedConfig) -> Self {
        Self::with_articles(source, config, Vec::new())
    }

    pub fn with_articles(source: Arc<dyn ArticleSource>, config: FeedConfig, articles: Vec<Article>) -> Self {
        let (batches_tx, batches_rx) = mpsc::unbounded_channel();
        Self {
            feed: Feed::with_articles(config, articles),
            source,
            batches_tx,
            batches_rx,
        }
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn articles(&self) -> &[Article] {
        self.feed.articles()
    }

    pub fn current(&self) -> Option<&Article> {
        self.feed.current()
    }

    pub fn position(&self) -> usize {
        self.feed.position()
    }

    pub fn len(&self) -> usize {
        self.feed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed.is_empty()
    }

    pub fn status(&self) -> FeedStatus {
        self.feed.status()
    }

    pub fn is_loading(&self) -> bool {
        self.feed.is_fetching()
    }

    /// Start the first fetch if nothing is loaded yet. Must be called from
    /// within a tokio runtime.
    pub fn initialize(&mut self) {
        self.feed.initialize();
        self.maybe_prefetch();
    }

    pub fn navigate(&mut self, direction: Direction) -> NavigationOutcome {
        self.navigate_at(direction, Instant::now())
    }

    pub fn navigate_at(&mut self, direction: Direction, now: Instant) -> NavigationOutcome {
        let outcome = self.feed.navigate(direction, now);
        match outcome {
            NavigationOutcome::Moved { from, to } => tracing::debug!("Moved from {} to {} of {}", from, to, self.feed.len()),
            rejected => tracing::trace!("Navigation {:?} rejected: {:?}", direction, rejected),
        }
        self.maybe_prefetch();
        outcome
    }

    pub fn select_bookmarked(&mut self, article: Article) -> usize {
        let position = self.feed.select_bookmarked(article);
        self.maybe_prefetch();
        position
    }

    /// Apply every batch that has already arrived. Returns the number of
    /// articles appended.
    pub fn poll_batches(&mut self) -> usize {
        let mut added = 0;
        while let Ok(batch) = self.batches_rx.try_recv() {
            added += self.apply_batch(batch);
        }
        added
    }

    /// Wait for the in-flight fetch to finish and apply it. Returns `None`
    /// right away when nothing is in flight.
    pub async fn next_batch(&mut self) -> Option<usize> {
        if !self.feed.is_fetching() {
            return None;
        }
        let batch = self.batches_rx.recv().await?;
        Some(self.apply_batch(batch))
    }

    fn apply_batch(&mut self, batch: Vec<Article>) -> usize {
        let added = self.feed.append_batch(batch);
        if added > 0 {
            tracing::info!("📚 Appended {} articles ({} loaded)", added, self.feed.len());
        } else {
            tracing::warn!("Background fetch returned no usable articles");
        }
        self.maybe_prefetch();
        added
    }

    fn maybe_prefetch(&mut self) {
        if !self.feed.should_prefetch() {
            return;
        }
        self.feed.mark_fetch_started();

        let source = self.source.clone();
        let tx = self.batches_tx.clone();
        let count = self.feed.config().batch_size;
        tracing::debug!("Prefetching {} articles from {}", count, source.name());
        tokio::spawn(async move {
            let batch = source.fetch_random_articles(count).await;
            // the receiver only disappears along with the controller
            let _ = tx.send(batch);
        });
    }
}
