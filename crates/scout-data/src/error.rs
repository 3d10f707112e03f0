// Error type for fetching and loading season data.

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("failed to parse {what}: {source}")]
    Json {
        what: String,
        source: serde_json::Error,
    },

    /// The source answered but had nothing usable.
    #[error("data unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}
