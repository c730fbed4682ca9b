use dicom::core::{DataElement, PrimitiveValue, VR};
use dicom::dictionary_std::{tags, uids};
use dicom::object::{FileDicomObject, FileMetaTableBuilder, InMemDicomObject};
use std::path::{Path, PathBuf};

pub const STUDY_UID: &str = "1.2.826.0.1.3680043.2.11";
pub const PATIENT_ID: &str = "PAT-0001";

pub fn series_uid(series: &str) -> String {
    format!("{STUDY_UID}.{series}")
}

pub fn instance_uid(series: &str, image_num: u16) -> String {
    format!("{}.{image_num:04}", series_uid(series))
}

pub fn synthesize_dicom_obj(series: &str, image_num: u16) -> FileDicomObject<InMemDicomObject> {
    let sop_instance_uid = instance_uid(series, image_num);
    let elements = [
        DataElement::new(tags::SOP_CLASS_UID, VR::UI, uids::CT_IMAGE_STORAGE),
        DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, sop_instance_uid.as_str()),
        DataElement::new(tags::PATIENT_ID, VR::LO, PATIENT_ID),
        DataElement::new(tags::STUDY_INSTANCE_UID, VR::UI, STUDY_UID),
        DataElement::new(tags::SERIES_INSTANCE_UID, VR::UI, series_uid(series)),
        DataElement::new(tags::INSTANCE_NUMBER, VR::IS, image_num.to_string()),
        DataElement::new(tags::MODALITY, VR::CS, "CT"),
        DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(512_u16)),
        DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(512_u16)),
        DataElement::new(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2 "),
    ];
    InMemDicomObject::from_element_iter(elements)
        .with_meta(
            FileMetaTableBuilder::new()
                .media_storage_sop_class_uid(uids::CT_IMAGE_STORAGE)
                .media_storage_sop_instance_uid(sop_instance_uid.as_str())
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN),
        )
        .unwrap()
}

/// Writes `root/<series>/<file>` for every file name, numbering instances from 1.
pub fn write_series(root: &Path, series: &str, files: &[&str]) -> Vec<PathBuf> {
    let dir = root.join(series);
    std::fs::create_dir_all(&dir).unwrap();
    files
        .iter()
        .zip(1u16..)
        .map(|(name, image_num)| {
            let path = dir.join(name);
            synthesize_dicom_obj(series, image_num).write_to_file(&path).unwrap();
            path
        })
        .collect()
}
