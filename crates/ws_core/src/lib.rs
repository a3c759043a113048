pub mod error;
pub mod logging;
pub mod models;
pub mod source;
pub mod storage;
pub mod types;

pub use error::Error;
pub use models::ChatModel;
pub use source::{ArticleSource, MIN_EXTRACT_CHARS};
pub use storage::KeyValueStore;
pub use types::{Article, BookmarkedArticle, ChatMessage, ChatRequest, HistoryTurn, Role, Thumbnail};

pub type Result<T> = std::result::Result<T, Error>;
