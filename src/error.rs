use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ssh private key file {0} does not exist")]
    MissingKeyFile(PathBuf),
    #[error("dicom directory {0} does not exist")]
    MissingDicomDir(PathBuf),
    #[error("cloud integration title must not be empty")]
    EmptyIntegrationTitle,
    #[error("failed to resolve {path}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to list {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("{0} is not a series directory")]
    NotASeriesDirectory(PathBuf),
    #[error("entry name {0} is not valid UTF-8")]
    NonUtf8Name(PathBuf),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read DICOM file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: dicom_object::ReadError,
    },
    #[error("failed to encode tags of {path} as DICOM JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} does not contain a private key")]
    InvalidKey(PathBuf),
    #[error("unknown upload job {0}")]
    UnknownJob(Uuid),
    #[error("request rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("no integration found with title {title:?}")]
    IntegrationNotFound { title: String },
    #[error("{count} integrations found with title {title:?}")]
    AmbiguousIntegration { title: String, count: usize },
    #[error("no dicom series found in {0}")]
    NoSeriesFound(PathBuf),
    #[error("failed to write report")]
    Report(#[source] std::io::Error),
}

pub type Result<T, E = UploadError> = std::result::Result<T, E>;
