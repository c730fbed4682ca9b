// Storage platform client interface and the local filesystem implementation
pub mod local;

use std::path::Path;

use async_trait::async_trait;
use uuid::Uuid;

use crate::common::types::{CloudIntegration, UploadRequest, UploadResult};
use crate::error::ClientError;

pub use local::{LocalConnector, LocalFolder, LocalSession};

/// Authenticates against the platform.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: StorageSession;

    async fn create_session(&self, ssh_private_key_path: &Path) -> Result<Self::Session, ClientError>;
}

#[async_trait]
pub trait StorageSession: Send + Sync {
    type Folder: StorageFolder;

    async fn list_cloud_integrations(&self) -> Result<Vec<CloudIntegration>, ClientError>;

    async fn create_storage_folder(&self, name: &str) -> Result<Self::Folder, ClientError>;
}

#[async_trait]
pub trait StorageFolder: Send + Sync {
    fn name(&self) -> &str;

    /// Starts an asynchronous upload job and returns its id.
    async fn start_private_data_upload(
        &self,
        integration_id: Uuid,
        request: &UploadRequest,
    ) -> Result<Uuid, ClientError>;

    /// Blocks until the job has finished.
    async fn private_data_upload_result(&self, upload_job_id: Uuid) -> Result<UploadResult, ClientError>;
}
