use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// One series directory and the entries it directly contains, in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicomSeries {
    pub name: String,
    pub files: Vec<String>,
}

/// Required tag key (eight hex digits) to its DICOM JSON value, `null` when
/// the source file lacks the tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DicomTagMap(BTreeMap<String, Option<serde_json::Value>>);

impl DicomTagMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, key: String, value: Option<serde_json::Value>) {
        self.0.insert(key, value);
    }

    /// `None` when the key is not part of the map, `Some(None)` when it is
    /// present but the file had no such tag.
    pub fn get(&self, key: &str) -> Option<&Option<serde_json::Value>> {
        self.0.get(key)
    }

    /// First value of the tag, if the file carried one.
    pub fn first_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.get(key)?.as_ref()?.get("Value")?.get(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn present_count(&self) -> usize {
        self.0.values().filter(|v| v.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DicomFileMetadata {
    pub tags: DicomTagMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadDicomFile {
    pub url: String,
    pub title: String,
    pub dicom_metadata: DicomFileMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadDicomSeries {
    pub title: String,
    pub dicom_files: Vec<UploadDicomFile>,
}

/// Everything submitted in a single upload job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub dicom_series: Vec<UploadDicomSeries>,
}

impl UploadRequest {
    pub fn file_count(&self) -> usize {
        self.dicom_series.iter().map(|s| s.dicom_files.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudIntegration {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    Pending,
    Done,
    DoneWithErrors,
    Error,
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UploadStatus::Pending => "PENDING",
            UploadStatus::Done => "DONE",
            UploadStatus::DoneWithErrors => "DONE_WITH_ERRORS",
            UploadStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemWithName {
    pub item_uuid: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitError {
    pub error: String,
    pub object_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub status: UploadStatus,
    pub units_done_count: usize,
    pub units_error_count: usize,
    pub items_with_names: Vec<ItemWithName>,
    pub unit_errors: Vec<UnitError>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadSummary {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub dicom_dir: PathBuf,
    pub integration_id: Uuid,
    pub storage_folder: String,
    pub upload_job_id: Uuid,
    pub series_count: usize,
    pub file_count: usize,
    pub status: UploadStatus,
    pub units_done_count: usize,
    pub units_error_count: usize,
}
