use std::path::Path;

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::common::types::DicomSeries;
use crate::error::DiscoveryError;

/// Lists the series directories under `root` and the entries each of them
/// directly contains, both sorted by file name.
///
/// Entries inside a series are neither filtered by extension nor sniffed:
/// anything present is handed to the DICOM reader later on.
pub fn discover_series(root: &Path) -> Result<Vec<DicomSeries>, DiscoveryError> {
    let mut series = Vec::new();

    for entry in sorted_children(root) {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_dir() {
            return Err(DiscoveryError::NotASeriesDirectory(entry.into_path()));
        }

        let name = entry_name(&entry)?;
        let mut files = Vec::new();
        for file in sorted_children(entry.path()) {
            let file = file.map_err(|source| DiscoveryError::Walk {
                path: entry.path().to_path_buf(),
                source,
            })?;
            files.push(entry_name(&file)?);
        }

        debug!("Series {}: {} files", name, files.len());
        series.push(DicomSeries { name, files });
    }

    info!("Discovered {} series under {}", series.len(), root.display());
    Ok(series)
}

fn sorted_children(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
}

fn entry_name(entry: &DirEntry) -> Result<String, DiscoveryError> {
    entry
        .file_name()
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| DiscoveryError::NonUtf8Name(entry.path().to_path_buf()))
}
