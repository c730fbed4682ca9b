use std::path::Path;

use indicatif::ProgressBar;
use tracing::info;

use crate::common::types::{
    DicomFileMetadata, DicomSeries, UploadDicomFile, UploadDicomSeries, UploadRequest,
};
use crate::error::ExtractError;
use crate::metadata::extract_file;

pub fn file_url(url_prefix: &str, series: &str, file: &str) -> String {
    format!("{}/{}/{}", url_prefix.trim_end_matches('/'), series, file)
}

pub fn series_title(series: &str) -> String {
    format!("dicom series - {series}")
}

pub fn file_title(series: &str, file: &str) -> String {
    format!("dicom file - {series}/{file}")
}

/// Parses every discovered file and assembles the upload request, keeping
/// the discovery order of series and files.
///
/// The first file that fails to parse aborts the whole build.
pub fn build_upload_request(
    dicom_dir: &Path,
    series: &[DicomSeries],
    url_prefix: &str,
    progress: &ProgressBar,
) -> Result<UploadRequest, ExtractError> {
    let mut dicom_series = Vec::with_capacity(series.len());

    for s in series {
        let mut dicom_files = Vec::with_capacity(s.files.len());
        for file in &s.files {
            progress.set_message(format!("{}/{}", s.name, file));
            let tags = extract_file(&dicom_dir.join(&s.name).join(file))?;
            dicom_files.push(UploadDicomFile {
                url: file_url(url_prefix, &s.name, file),
                title: file_title(&s.name, file),
                dicom_metadata: DicomFileMetadata { tags },
            });
            progress.inc(1);
        }
        dicom_series.push(UploadDicomSeries {
            title: series_title(&s.name),
            dicom_files,
        });
    }

    let request = UploadRequest { dicom_series };
    info!(
        "Built upload request: {} series, {} files",
        request.dicom_series.len(),
        request.file_count()
    );
    Ok(request)
}
