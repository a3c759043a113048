//! The scrolling feed: which articles are loaded, which one is on screen,
//! and when to fetch more.

pub mod controller;
pub mod feed;
pub mod guard;
pub mod input;

pub use controller::FeedController;
pub use feed::{Direction, Feed, FeedConfig, FeedStatus, NavigationOutcome};
pub use guard::{GuardState, NavigationGuard};
pub use input::{GestureConfig, GestureTranslator, InputEvent, Key};

pub mod prelude {
    pub use super::controller::FeedController;
    pub use super::feed::{Direction, FeedConfig, FeedStatus, NavigationOutcome};
    pub use super::input::{GestureTranslator, InputEvent, Key};
}
