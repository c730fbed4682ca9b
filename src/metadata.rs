use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use dicom::dictionary_std::{tags, uids};
use dicom::encoding::TransferSyntaxIndex;
use dicom::object::file::ReadPreamble;
use dicom::object::{InMemDicomObject, OpenFileOptions};
use dicom::transfer_syntax::TransferSyntaxRegistry;
use tracing::debug;

use crate::common::required_tags::{tag_key, REQUIRED_DICOM_TAGS};
use crate::common::types::DicomTagMap;
use crate::error::ExtractError;

/// Opens a DICOM file without insisting on the 128-byte preamble.
///
/// Files lacking the preamble, the `DICM` marker and the file meta group are
/// read as a bare implicit VR little endian dataset. Reading stops at Pixel
/// Data: none of the required tags live past it.
pub fn read_dicom_file(path: &Path) -> Result<InMemDicomObject, ExtractError> {
    let opened = OpenFileOptions::new()
        .read_preamble(ReadPreamble::Auto)
        .read_until(tags::PIXEL_DATA)
        .open_file(path);

    match opened {
        Ok(obj) => Ok(obj.into_inner()),
        Err(source) => match read_raw_dataset(path) {
            Some(obj) => {
                debug!("Read {} as a dataset without file meta group", path.display());
                Ok(obj)
            }
            None => Err(ExtractError::Read {
                path: path.to_path_buf(),
                source,
            }),
        },
    }
}

// An empty dataset means there was nothing to decode, not a headerless file.
fn read_raw_dataset(path: &Path) -> Option<InMemDicomObject> {
    let ts = TransferSyntaxRegistry.get(uids::IMPLICIT_VR_LITTLE_ENDIAN)?;
    let file = BufReader::new(File::open(path).ok()?);
    let obj = InMemDicomObject::read_dataset_with_ts(file, ts).ok()?;
    let non_empty = obj.iter().next().is_some();
    non_empty.then_some(obj)
}

/// Projects a dataset onto the required tags.
///
/// The result always holds all 22 keys; tags missing from the dataset map
/// to `None`.
pub fn extract_required_tags(obj: &InMemDicomObject) -> Result<DicomTagMap, serde_json::Error> {
    let mut subset = InMemDicomObject::new_empty();
    for required in REQUIRED_DICOM_TAGS {
        if let Some(element) = obj.get(required.tag) {
            subset.put(element.clone());
        }
    }

    let json = dicom_json::to_value(subset)?;
    let encoded = json.as_object();

    let mut map = DicomTagMap::new();
    for required in REQUIRED_DICOM_TAGS {
        let key = required.key();
        let value = encoded.and_then(|fields| {
            fields
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(&key))
                .map(|(_, v)| v.clone())
        });
        map.insert(key, value);
    }
    Ok(map)
}

/// Reads `path` and extracts its required tags.
pub fn extract_file(path: &Path) -> Result<DicomTagMap, ExtractError> {
    let obj = read_dicom_file(path)?;
    let map = extract_required_tags(&obj).map_err(|source| ExtractError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Extracted {}/{} required tags from {} (SOP Instance {})",
        map.present_count(),
        map.len(),
        path.display(),
        map.first_value(&tag_key(tags::SOP_INSTANCE_UID))
            .and_then(|v| v.as_str())
            .unwrap_or("-")
    );
    Ok(map)
}
