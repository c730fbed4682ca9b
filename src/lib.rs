//! Uploads directories of DICOM series to a cloud storage folder by external
//! URL reference, forwarding a fixed set of tags per file as metadata.

pub mod client;
pub mod common;
pub mod config;
pub mod discovery;
pub mod error;
pub mod integration;
pub mod metadata;
pub mod report;
pub mod request;
pub mod uploader;

pub use common::required_tags;
pub use common::types;
pub use config::UploaderConfig;
pub use error::{Result, UploadError};
pub use uploader::{UploadOutcome, Uploader};
