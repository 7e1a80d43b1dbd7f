use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarqueeError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MarqueeError>;

/// Failure of a single page load, as surfaced to the UI.
///
/// Both variants are terminal for the attempt that produced them; a retry
/// must be triggered again from the UI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Failed to fetch movies: {0}")]
    InitialLoadFailed(String),

    #[error("Failed to fetch page {page}: {message}")]
    PageLoadFailed { page: u32, message: String },
}
