use std::time::{Duration, Instant};
use ws_core::Article;

use crate::guard::{GuardState, NavigationGuard};

#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Articles requested per background fetch
    pub batch_size: usize,
    /// Prefetch once `len - position` drops to this
    pub prefetch_threshold: usize,
    pub throttle: Duration,
    pub settle: Duration,
    /// Immediate re-fetches allowed after batches that came back empty
    pub empty_batch_retries: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            prefetch_threshold: 2,
            throttle: Duration::from_millis(500),
            settle: Duration::from_millis(600),
            empty_batch_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Uninitialized,
    /// Waiting on the very first batch; nothing to show yet
    LoadingFirstBatch,
    /// The first batch has settled, possibly with nothing in it
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    Moved { from: usize, to: usize },
    Throttled,
    Settling,
    AtEnd,
    AtStart,
}

impl NavigationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, NavigationOutcome::Moved { .. })
    }
}

/// Loaded articles and where the reader is among them.
///
/// Pure state: no I/O, time is passed in. `position < len()` whenever the
/// feed is non-empty, and it is 0 when empty.
#[derive(Debug, Clone)]
pub struct Feed {
    config: FeedConfig,
    articles: Vec<Article>,
    position: usize,
    status: FeedStatus,
    fetch_in_flight: bool,
    guard: NavigationGuard,
    prefetch_armed: bool,
    empty_retries_left: u32,
}

impl Feed {
    pub fn new(config: FeedConfig) -> Self {
        Self::with_articles(config, Vec::new())
    }

    pub fn with_articles(config: FeedConfig, articles: Vec<Article>) -> Self {
        Self {
            guard: NavigationGuard::new(config.throttle, config.settle),
            empty_retries_left: config.empty_batch_retries,
            config,
            articles,
            position: 0,
            status: FeedStatus::Uninitialized,
            fetch_in_flight: false,
            prefetch_armed: true,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<&Article> {
        self.articles.get(self.position)
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch_in_flight
    }

    /// Loaded articles at and after the current one.
    pub fn look_ahead(&self) -> usize {
        self.articles.len().saturating_sub(self.position)
    }

    /// Leave `Uninitialized`. An empty feed waits for its first batch.
    pub fn initialize(&mut self) {
        if self.status != FeedStatus::Uninitialized {
            return;
        }
        self.status = if self.articles.is_empty() {
            FeedStatus::LoadingFirstBatch
        } else {
            FeedStatus::Ready
        };
    }

    /// Move one step if both timing guards are open and the target exists.
    pub fn navigate(&mut self, direction: Direction, now: Instant) -> NavigationOutcome {
        // any request re-evaluates prefetching, even a rejected one
        self.rearm_prefetch();

        match self.guard.check(now) {
            GuardState::Settling => return NavigationOutcome::Settling,
            GuardState::Throttled => return NavigationOutcome::Throttled,
            GuardState::Open => {}
        }

        let from = self.position;
        let to = match direction {
            Direction::Forward if from + 1 < self.articles.len() => from + 1,
            Direction::Forward => return NavigationOutcome::AtEnd,
            Direction::Backward if from > 0 => from - 1,
            Direction::Backward => return NavigationOutcome::AtStart,
        };

        self.guard.accept(now);
        self.position = to;
        NavigationOutcome::Moved { from, to }
    }

    /// True when a background fetch should start right now.
    pub fn should_prefetch(&self) -> bool {
        self.status != FeedStatus::Uninitialized
            && self.prefetch_armed
            && !self.fetch_in_flight
            && self.look_ahead() <= self.config.prefetch_threshold
    }

    pub fn mark_fetch_started(&mut self) {
        self.fetch_in_flight = true;
    }

    /// Append a finished batch at the tail. Returns how many were added.
    pub fn append_batch(&mut self, batch: Vec<Article>) -> usize {
        self.fetch_in_flight = false;
        if self.status == FeedStatus::LoadingFirstBatch {
            self.status = FeedStatus::Ready;
        }

        let added = batch.len();
        if added == 0 {
            if self.empty_retries_left > 0 {
                self.empty_retries_left -= 1;
            } else {
                // stay quiet until the reader does something
                self.prefetch_armed = false;
            }
        } else {
            self.articles.extend(batch);
            self.rearm_prefetch();
        }
        added
    }

    /// Jump to a bookmarked article, prepending it when it is not loaded.
    /// Returns the new position.
    pub fn select_bookmarked(&mut self, article: Article) -> usize {
        self.rearm_prefetch();
        match self.articles.iter().position(|a| a.id == article.id) {
            Some(index) => self.position = index,
            None => {
                self.articles.insert(0, article);
                self.position = 0;
            }
        }
        if self.status == FeedStatus::LoadingFirstBatch {
            // there is something to show now; the pending batch still lands
            self.status = FeedStatus::Ready;
        }
        self.position
    }

    fn rearm_prefetch(&mut self) {
        self.prefetch_armed = true;
        self.empty_retries_left = self.config.empty_batch_retries;
    }
}
