use async_trait::async_trait;
use dicom_uploader::client::{Connector, LocalConnector, StorageFolder, StorageSession};
use dicom_uploader::error::{ClientError, ConfigError};
use dicom_uploader::types::{
    CloudIntegration, ItemWithName, UnitError, UploadRequest, UploadResult, UploadStatus,
};
use dicom_uploader::{UploadError, Uploader, UploaderConfig};
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

mod common;

#[derive(Default)]
struct Calls {
    log: Mutex<Vec<String>>,
    submitted: Mutex<Option<UploadRequest>>,
}

impl Calls {
    fn record(&self, call: &str) {
        self.log.lock().unwrap().push(call.to_string());
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

struct MockConnector {
    calls: Arc<Calls>,
    integrations: Vec<CloudIntegration>,
    result: UploadResult,
}

struct MockSession {
    calls: Arc<Calls>,
    integrations: Vec<CloudIntegration>,
    result: UploadResult,
}

struct MockFolder {
    calls: Arc<Calls>,
    name: String,
    job: Uuid,
    result: UploadResult,
}

#[async_trait]
impl Connector for MockConnector {
    type Session = MockSession;

    async fn create_session(&self, _key: &Path) -> Result<MockSession, ClientError> {
        self.calls.record("create_session");
        Ok(MockSession {
            calls: self.calls.clone(),
            integrations: self.integrations.clone(),
            result: self.result.clone(),
        })
    }
}

#[async_trait]
impl StorageSession for MockSession {
    type Folder = MockFolder;

    async fn list_cloud_integrations(&self) -> Result<Vec<CloudIntegration>, ClientError> {
        self.calls.record("list_cloud_integrations");
        Ok(self.integrations.clone())
    }

    async fn create_storage_folder(&self, name: &str) -> Result<MockFolder, ClientError> {
        self.calls.record("create_storage_folder");
        Ok(MockFolder {
            calls: self.calls.clone(),
            name: name.to_string(),
            job: Uuid::new_v4(),
            result: self.result.clone(),
        })
    }
}

#[async_trait]
impl StorageFolder for MockFolder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start_private_data_upload(
        &self,
        _integration_id: Uuid,
        request: &UploadRequest,
    ) -> Result<Uuid, ClientError> {
        self.calls.record("start_private_data_upload");
        *self.calls.submitted.lock().unwrap() = Some(request.clone());
        Ok(self.job)
    }

    async fn private_data_upload_result(&self, upload_job_id: Uuid) -> Result<UploadResult, ClientError> {
        self.calls.record("private_data_upload_result");
        if upload_job_id != self.job {
            return Err(ClientError::UnknownJob(upload_job_id));
        }
        Ok(self.result.clone())
    }
}

fn two_successes_one_error() -> UploadResult {
    UploadResult {
        status: UploadStatus::DoneWithErrors,
        units_done_count: 2,
        units_error_count: 1,
        items_with_names: vec![
            ItemWithName {
                item_uuid: Uuid::new_v4(),
                name: "dicom series - A".to_string(),
            },
            ItemWithName {
                item_uuid: Uuid::new_v4(),
                name: "dicom series - B".to_string(),
            },
        ],
        unit_errors: vec![UnitError {
            error: "object not reachable".to_string(),
            object_urls: vec!["https://custom-direct-access-url.com/B/x.dcm".to_string()],
        }],
    }
}

fn mock(integrations: Vec<CloudIntegration>) -> (MockConnector, Arc<Calls>) {
    let calls = Arc::new(Calls::default());
    let connector = MockConnector {
        calls: calls.clone(),
        integrations,
        result: two_successes_one_error(),
    };
    (connector, calls)
}

#[tokio::test]
async fn uploads_whole_tree_as_one_job() {
    let dir = tempfile::tempdir().unwrap();
    let key = common::write_key(dir.path());
    let dicom_dir = dir.path().join("dicom");
    common::two_series_tree(&dicom_dir);

    let integrations = common::integrations(&["gcp-direct", "aws-direct"]);
    let (connector, calls) = mock(integrations.clone());
    let config = UploaderConfig::new(&key, "aws-direct", &dicom_dir).with_folder_name("batch 1");

    let mut out = Vec::new();
    let outcome = Uploader::new(connector).run(&config, &mut out).await.unwrap();

    assert_eq!(
        calls.log(),
        vec![
            "create_session",
            "list_cloud_integrations",
            "create_storage_folder",
            "start_private_data_upload",
            "private_data_upload_result",
        ]
    );
    assert_eq!(outcome.summary.integration_id, integrations[1].id);
    assert_eq!(outcome.summary.storage_folder, "batch 1");
    assert_eq!(outcome.summary.series_count, 2);
    assert_eq!(outcome.summary.file_count, 3);
    assert_eq!(outcome.summary.units_error_count, 1);

    let request = calls.submitted.lock().unwrap().clone().unwrap();
    let titles: Vec<_> = request.dicom_series.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["dicom series - A", "dicom series - B"]);
    let a = &request.dicom_series[0];
    assert_eq!(a.dicom_files[0].url, "https://custom-direct-access-url.com/A/1.dcm");
    assert_eq!(a.dicom_files[1].title, "dicom file - A/2.dcm");
    for file in request.dicom_series.iter().flat_map(|s| &s.dicom_files) {
        assert_eq!(file.dicom_metadata.tags.len(), 22);
    }

    let text = String::from_utf8(out).unwrap();
    let success_lines: Vec<_> = text.lines().filter(|l| l.contains("integrated successfully")).collect();
    let error_lines: Vec<_> = text.lines().filter(|l| l.contains("integration error")).collect();
    assert_eq!(success_lines.len(), 2);
    assert_eq!(error_lines.len(), 1);
    assert!(success_lines[0].contains(&outcome.result.items_with_names[0].item_uuid.to_string()));
    assert!(error_lines[0].contains("B/x.dcm"));
    assert!(text.contains(&format!("integration_uuid={}", integrations[1].id)));
}

#[tokio::test]
async fn missing_dicom_dir_aborts_before_remote_calls() {
    let dir = tempfile::tempdir().unwrap();
    let key = common::write_key(dir.path());
    let (connector, calls) = mock(common::integrations(&["aws-direct"]));
    let config = UploaderConfig::new(&key, "aws-direct", dir.path().join("missing"));

    let err = Uploader::new(connector).run(&config, &mut Vec::new()).await.unwrap_err();
    assert!(matches!(err, UploadError::Config(ConfigError::MissingDicomDir(_))));
    assert!(calls.log().is_empty());
}

#[tokio::test]
async fn parse_failure_aborts_before_remote_calls() {
    let dir = tempfile::tempdir().unwrap();
    let key = common::write_key(dir.path());
    let dicom_dir = dir.path().join("dicom");
    common::two_series_tree(&dicom_dir);
    std::fs::write(dicom_dir.join("B").join("y.dcm"), "not dicom").unwrap();
    let (connector, calls) = mock(common::integrations(&["aws-direct"]));
    let config = UploaderConfig::new(&key, "aws-direct", &dicom_dir);

    let progress = ProgressBar::hidden();

    let err = Uploader::new(connector)
        .with_progress(progress.clone())
        .run(&config, &mut Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Extract(_)));
    assert!(calls.log().is_empty());
    assert!(progress.is_finished());
}

#[tokio::test]
async fn ambiguous_integration_stops_before_folder_creation() {
    let dir = tempfile::tempdir().unwrap();
    let key = common::write_key(dir.path());
    let dicom_dir = dir.path().join("dicom");
    common::two_series_tree(&dicom_dir);
    let (connector, calls) = mock(common::integrations(&["aws-direct", "aws-direct"]));
    let config = UploaderConfig::new(&key, "aws-direct", &dicom_dir);

    let err = Uploader::new(connector).run(&config, &mut Vec::new()).await.unwrap_err();
    assert!(matches!(err, UploadError::AmbiguousIntegration { count: 2, .. }));
    assert_eq!(calls.log(), vec!["create_session", "list_cloud_integrations"]);
}

#[tokio::test]
async fn empty_dicom_dir_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let key = common::write_key(dir.path());
    let dicom_dir = dir.path().join("dicom");
    std::fs::create_dir(&dicom_dir).unwrap();
    let (connector, calls) = mock(common::integrations(&["aws-direct"]));
    let config = UploaderConfig::new(&key, "aws-direct", &dicom_dir);

    let err = Uploader::new(connector).run(&config, &mut Vec::new()).await.unwrap_err();
    assert!(matches!(err, UploadError::NoSeriesFound(_)));
    assert!(calls.log().is_empty());
}

#[tokio::test]
async fn local_backend_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let key = common::write_key(dir.path());
    let dicom_dir = dir.path().join("dicom");
    common::two_series_tree(&dicom_dir);
    let storage_root = dir.path().join("storage");
    let integrations = common::integrations(&["aws-direct"]);
    let integrations_file = common::write_integrations(dir.path(), &integrations);

    let connector = LocalConnector::new(&storage_root, integrations_file);
    let config = UploaderConfig::new(&key, "aws-direct", &dicom_dir)
        .with_url_prefix("https://files.example.org/dicom");

    let mut out = Vec::new();
    let outcome = Uploader::new(connector)
        .with_session_id("test-session")
        .run(&config, &mut out)
        .await
        .unwrap();

    assert_eq!(outcome.result.status, UploadStatus::Done);
    assert_eq!(outcome.result.units_done_count, 2);
    let names: Vec<_> = outcome.result.items_with_names.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["dicom series - A", "dicom series - B"]);
    assert_eq!(outcome.summary.session_id, "test-session");
    assert!(outcome.summary.storage_folder.starts_with("dicom data folder "));

    let jobs: Vec<_> = walkdir::WalkDir::new(storage_root.join("folders"))
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".request.json"))
        .collect();
    assert_eq!(jobs.len(), 1);
    let stored = std::fs::read_to_string(jobs[0].path()).unwrap();
    assert!(stored.contains("https://files.example.org/dicom/A/1.dcm"));
    assert!(stored.contains(&integrations[0].id.to_string()));

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().filter(|l| l.contains("integrated successfully")).count(), 2);
}
