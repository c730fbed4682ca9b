use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Connector, StorageFolder, StorageSession};
use crate::common::required_tags::tag_key;
use crate::common::types::{
    CloudIntegration, ItemWithName, UnitError, UploadDicomSeries, UploadRequest, UploadResult,
    UploadStatus,
};
use crate::error::ClientError;
use dicom_dictionary_std::tags;

/// Emulates the storage platform on the local filesystem.
///
/// Integrations come from a JSON file, folders are directories below
/// `storage_root/folders` and every upload job leaves its request and result
/// as JSON documents in the folder's `jobs` directory.
#[derive(Debug, Clone)]
pub struct LocalConnector {
    storage_root: PathBuf,
    integrations_file: PathBuf,
}

impl LocalConnector {
    pub fn new(storage_root: impl Into<PathBuf>, integrations_file: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            integrations_file: integrations_file.into(),
        }
    }
}

#[async_trait]
impl Connector for LocalConnector {
    type Session = LocalSession;

    async fn create_session(&self, ssh_private_key_path: &Path) -> Result<LocalSession, ClientError> {
        let key = fs::read_to_string(ssh_private_key_path).await?;
        let has_header = key
            .lines()
            .next()
            .map(|l| l.starts_with("-----BEGIN") && l.ends_with("PRIVATE KEY-----"))
            .unwrap_or(false);
        if !has_header {
            return Err(ClientError::InvalidKey(ssh_private_key_path.to_path_buf()));
        }

        fs::create_dir_all(self.storage_root.join("folders")).await?;
        info!(
            "Opened local storage session at {} with key {}",
            self.storage_root.display(),
            ssh_private_key_path.display()
        );

        Ok(LocalSession {
            storage_root: self.storage_root.clone(),
            integrations_file: self.integrations_file.clone(),
        })
    }
}

#[derive(Debug)]
pub struct LocalSession {
    storage_root: PathBuf,
    integrations_file: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct FolderRecord {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl StorageSession for LocalSession {
    type Folder = LocalFolder;

    async fn list_cloud_integrations(&self) -> Result<Vec<CloudIntegration>, ClientError> {
        let raw = fs::read_to_string(&self.integrations_file).await?;
        let integrations: Vec<CloudIntegration> = serde_json::from_str(&raw)?;
        debug!(
            "Loaded {} integrations from {}",
            integrations.len(),
            self.integrations_file.display()
        );
        Ok(integrations)
    }

    async fn create_storage_folder(&self, name: &str) -> Result<LocalFolder, ClientError> {
        let record = FolderRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let path = self.storage_root.join("folders").join(record.id.to_string());
        fs::create_dir_all(path.join("jobs")).await?;
        fs::write(path.join("folder.json"), serde_json::to_vec_pretty(&record)?).await?;

        info!("Created storage folder {:?} ({})", record.name, record.id);
        Ok(LocalFolder {
            id: record.id,
            name: record.name,
            path,
        })
    }
}

#[derive(Debug)]
pub struct LocalFolder {
    id: Uuid,
    name: String,
    path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct JobRecord {
    integration_id: Uuid,
    submitted_at: DateTime<Utc>,
    request: UploadRequest,
}

impl LocalFolder {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn job_path(&self, job: Uuid, suffix: &str) -> PathBuf {
        self.path.join("jobs").join(format!("{job}.{suffix}.json"))
    }
}

#[async_trait]
impl StorageFolder for LocalFolder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start_private_data_upload(
        &self,
        integration_id: Uuid,
        request: &UploadRequest,
    ) -> Result<Uuid, ClientError> {
        let job = Uuid::new_v4();
        let record = JobRecord {
            integration_id,
            submitted_at: Utc::now(),
            request: request.clone(),
        };
        fs::write(self.job_path(job, "request"), serde_json::to_vec_pretty(&record)?).await?;

        info!(
            "Queued upload job {} with {} series into folder {}",
            job,
            request.dicom_series.len(),
            self.id
        );
        Ok(job)
    }

    async fn private_data_upload_result(&self, upload_job_id: Uuid) -> Result<UploadResult, ClientError> {
        let result_path = self.job_path(upload_job_id, "result");
        if fs::try_exists(&result_path).await? {
            let raw = fs::read(&result_path).await?;
            return Ok(serde_json::from_slice(&raw)?);
        }

        let request_path = self.job_path(upload_job_id, "request");
        if !fs::try_exists(&request_path).await? {
            return Err(ClientError::UnknownJob(upload_job_id));
        }
        let record: JobRecord = serde_json::from_slice(&fs::read(&request_path).await?)?;

        let result = process_request(&record.request);
        fs::write(&result_path, serde_json::to_vec_pretty(&result)?).await?;
        info!(
            "Upload job {} finished: {} ({} done, {} failed)",
            upload_job_id, result.status, result.units_done_count, result.units_error_count
        );
        Ok(result)
    }
}

fn process_request(request: &UploadRequest) -> UploadResult {
    let mut items_with_names = Vec::new();
    let mut unit_errors = Vec::new();

    for series in &request.dicom_series {
        match check_series(series) {
            Ok(()) => items_with_names.push(ItemWithName {
                item_uuid: Uuid::new_v4(),
                name: series.title.clone(),
            }),
            Err(error) => {
                warn!("Rejected {}: {}", series.title, error);
                unit_errors.push(UnitError {
                    error,
                    object_urls: series.dicom_files.iter().map(|f| f.url.clone()).collect(),
                });
            }
        }
    }

    let status = match (items_with_names.len(), unit_errors.len()) {
        (_, 0) => UploadStatus::Done,
        (0, _) => UploadStatus::Error,
        _ => UploadStatus::DoneWithErrors,
    };

    UploadResult {
        status,
        units_done_count: items_with_names.len(),
        units_error_count: unit_errors.len(),
        items_with_names,
        unit_errors,
    }
}

// Series grouping on the platform side needs both instance and series UIDs.
fn check_series(series: &UploadDicomSeries) -> Result<(), String> {
    if series.dicom_files.is_empty() {
        return Err(format!("{} has no dicom files", series.title));
    }

    let required = [
        ("SOPInstanceUID", tag_key(tags::SOP_INSTANCE_UID)),
        ("SeriesInstanceUID", tag_key(tags::SERIES_INSTANCE_UID)),
    ];
    for file in &series.dicom_files {
        for (keyword, key) in &required {
            if file.dicom_metadata.tags.first_value(key).is_none() {
                return Err(format!("{} is missing {}", file.title, keyword));
            }
        }
    }
    Ok(())
}
