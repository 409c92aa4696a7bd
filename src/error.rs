use thiserror::Error;

/// A single asset could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response (offline, DNS, CORS, ...).
    #[error("{reason}")]
    Network { url: String, reason: String },

    /// A response arrived but its body could not be read into a buffer.
    #[error("{reason}")]
    Body { url: String, reason: String },

    /// The URL does not name anything the fetcher can serve.
    #[error("asset not found: {url}")]
    NotFound { url: String },
}

/// The loader aborted before every asset was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("{source}")]
    Fetch {
        key: String,
        #[source]
        source: FetchError,
    },

    /// Extracting resolved assets hit an entry still holding a URL.
    #[error("asset `{0}` was never fetched")]
    Unresolved(String),

    /// An entry handed over by the caller cannot be loaded or written back.
    #[error("asset `{key}` has an unusable value: {reason}")]
    InvalidEntry { key: String, reason: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Network { url, .. } => url,
            FetchError::Body { url, .. } => url,
            FetchError::NotFound { url } => url,
        }
    }
}

impl LoadError {
    /// Key of the entry that failed.
    pub fn key(&self) -> &str {
        match self {
            LoadError::Fetch { key, .. } => key,
            LoadError::Unresolved(key) => key,
            LoadError::InvalidEntry { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("failed to rewrite page address: {0}")]
    ReplaceUrl(String),

    #[error("page location unavailable: {0}")]
    Location(String),
}

#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown log level `{0}`")]
    LogLevel(String),
}

#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid asset manifest: {0}")]
    Json(#[from] serde_json::Error),
}
