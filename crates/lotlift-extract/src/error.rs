use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector in site definition {site_id}: {selector}")]
    BadSelector { site_id: String, selector: String },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
