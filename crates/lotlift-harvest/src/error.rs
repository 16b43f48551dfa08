use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarvestError>;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error(transparent)]
    Selector(#[from] lotlift_extract::ExtractError),

    #[error(transparent)]
    Browser(#[from] lotlift_browser::BrowserError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not prepare download directory {path}: {source}")]
    DownloadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}
