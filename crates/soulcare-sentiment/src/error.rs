use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier {model} failed: {message}")]
    Classifier { model: String, message: String },

    #[error("{stage} scoring stage misaligned: {message}")]
    Misaligned {
        stage: &'static str,
        message: String,
    },

    #[error("dataset is missing text column '{0}'")]
    MissingTextColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("complaint page fetch failed: {0}")]
    Page(String),
}
