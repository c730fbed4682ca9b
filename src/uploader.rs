use std::io::Write;

use chrono::Utc;
use indicatif::ProgressBar;
use tracing::info;
use uuid::Uuid;

use crate::client::{Connector, StorageFolder, StorageSession};
use crate::common::types::{UploadResult, UploadSummary};
use crate::config::UploaderConfig;
use crate::discovery::discover_series;
use crate::error::{Result, UploadError};
use crate::integration::resolve_integration;
use crate::report::report_result;
use crate::request::build_upload_request;

#[derive(Debug)]
pub struct UploadOutcome {
    pub summary: UploadSummary,
    pub result: UploadResult,
}

/// Drives one upload run against a storage platform connector.
pub struct Uploader<C> {
    connector: C,
    session_id: String,
    progress: ProgressBar,
}

impl<C: Connector> Uploader<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            session_id: Uuid::new_v4().to_string(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Progress bar advanced once per parsed file.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Validates `config`, builds the complete request from disk, then
    /// submits it as a single job and reports the result to `out`.
    ///
    /// Nothing remote is touched until every file has been parsed.
    pub async fn run<W: Write>(&self, config: &UploaderConfig, out: &mut W) -> Result<UploadOutcome> {
        let start_time = Utc::now();
        let config = config.validate()?;

        let series = discover_series(&config.dicom_dir)?;
        if series.is_empty() {
            return Err(UploadError::NoSeriesFound(config.dicom_dir.clone()));
        }
        log_line(out, format_args!("main-log: found dicom series len={}", series.len()))?;

        let total_files: usize = series.iter().map(|s| s.files.len()).sum();
        self.progress.set_length(total_files as u64);
        let request =
            build_upload_request(&config.dicom_dir, &series, &config.url_prefix, &self.progress);
        self.progress.finish_and_clear();
        let request = request?;

        let session = self
            .connector
            .create_session(&config.ssh_private_key_path)
            .await?;
        let integrations = session.list_cloud_integrations().await?;
        let integration = resolve_integration(&integrations, &config.cloud_integration_title)?;
        log_line(
            out,
            format_args!("main-log: found integration integration_uuid={}", integration.id),
        )?;

        let folder = session
            .create_storage_folder(&config.storage_folder_name())
            .await?;
        let upload_job_id = folder
            .start_private_data_upload(integration.id, &request)
            .await?;
        log_line(
            out,
            format_args!("main-log: upload_job_uuid={upload_job_id} upload job started"),
        )?;

        let result = folder.private_data_upload_result(upload_job_id).await?;
        log_line(
            out,
            format_args!("main-log: upload_job_uuid={upload_job_id} upload job done"),
        )?;
        report_result(&result, out).map_err(UploadError::Report)?;

        info!(
            "Session {} finished job {}: {}",
            self.session_id, upload_job_id, result.status
        );
        let summary = UploadSummary {
            session_id: self.session_id.clone(),
            start_time,
            end_time: Utc::now(),
            dicom_dir: config.dicom_dir.clone(),
            integration_id: integration.id,
            storage_folder: folder.name().to_string(),
            upload_job_id,
            series_count: request.dicom_series.len(),
            file_count: request.file_count(),
            status: result.status,
            units_done_count: result.units_done_count,
            units_error_count: result.units_error_count,
        };

        Ok(UploadOutcome { summary, result })
    }
}

fn log_line<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) -> Result<()> {
    info!("{}", line);
    writeln!(out, "{}", line).map_err(UploadError::Report)
}
