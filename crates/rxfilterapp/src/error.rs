use thiserror::Error;

#[derive(Error, Debug)]
pub enum RxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Expected a sequence to sort, found {found}")]
    NotASequence { found: &'static str },

    #[error("Element {index} cannot be ordered against the rest of the sequence ({found})")]
    UnorderableElement { index: usize, found: &'static str },

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid value '{value}' for setting '{key}'")]
    InvalidSetting { key: &'static str, value: String },

    #[error("Export error: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, RxError>;
