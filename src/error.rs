use thiserror::Error;

pub type TallyResult<T> = Result<T, TallyError>;

/// Fatal errors. Recoverable problems inside an archive are reported as
/// [`crate::types::Defect`]s on the resolution instead.
#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Degraded resolution: {0}")]
    Degraded(String),
}
