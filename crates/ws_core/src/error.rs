use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The content provider was unreachable or answered with something we
    /// could not normalize into an article.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Chat service error: {0}")]
    ChatService(String),

    /// Holds the name of the missing variable, never its value.
    #[error("Missing {0}")]
    MissingCredential(&'static str),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// True for failures that never reached the remote side.
    pub fn is_transport(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Error::Io(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_names_variable_only() {
        let err = Error::MissingCredential("GEMINI_API_KEY");
        assert_eq!(err.to_string(), "Missing GEMINI_API_KEY");
    }

    #[test]
    fn test_io_is_transport() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(err.is_transport());
        assert!(!Error::Upstream("bad body".to_string()).is_transport());
    }
}
