use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_URL_PREFIX: &str = "https://custom-direct-access-url.com";

/// Inputs of a single upload run.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    pub ssh_private_key_path: PathBuf,
    pub cloud_integration_title: String,
    pub dicom_dir: PathBuf,
    /// Prefix of the externally hosted URLs the platform reads the files from.
    pub url_prefix: String,
    pub folder_name: Option<String>,
}

impl UploaderConfig {
    pub fn new(
        ssh_private_key_path: impl Into<PathBuf>,
        cloud_integration_title: impl Into<String>,
        dicom_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ssh_private_key_path: ssh_private_key_path.into(),
            cloud_integration_title: cloud_integration_title.into(),
            dicom_dir: dicom_dir.into(),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            folder_name: None,
        }
    }

    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    pub fn with_folder_name(mut self, name: impl Into<String>) -> Self {
        self.folder_name = Some(name.into());
        self
    }

    /// Checks that the key file and the DICOM directory exist and returns a
    /// copy with both paths made absolute.
    pub fn validate(&self) -> Result<UploaderConfig, ConfigError> {
        if !self.ssh_private_key_path.is_file() {
            return Err(ConfigError::MissingKeyFile(self.ssh_private_key_path.clone()));
        }
        if !self.dicom_dir.is_dir() {
            return Err(ConfigError::MissingDicomDir(self.dicom_dir.clone()));
        }
        if self.cloud_integration_title.is_empty() {
            return Err(ConfigError::EmptyIntegrationTitle);
        }

        let validated = UploaderConfig {
            ssh_private_key_path: resolve(&self.ssh_private_key_path)?,
            dicom_dir: resolve(&self.dicom_dir)?,
            url_prefix: self.url_prefix.trim_end_matches('/').to_string(),
            ..self.clone()
        };
        debug!("Validated configuration: {:?}", validated);
        Ok(validated)
    }

    pub fn storage_folder_name(&self) -> String {
        match &self.folder_name {
            Some(name) => name.clone(),
            None => format!("dicom data folder {}", Utc::now().timestamp()),
        }
    }
}

fn resolve(path: &Path) -> Result<PathBuf, ConfigError> {
    path.canonicalize().map_err(|source| ConfigError::Resolve {
        path: path.to_path_buf(),
        source,
    })
}
