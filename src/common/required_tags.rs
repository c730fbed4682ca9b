//! Fixed allow-list of DICOM tags forwarded as per-file upload metadata
//!
//! The remote platform uses these attributes to order, position and render
//! the frames of a series. Nothing outside this table is read from the
//! source files.

use dicom_core::Tag;

#[derive(Debug, Clone)]
pub struct RequiredTag {
    pub tag: Tag,
    pub keyword: &'static str,
    pub group: TagGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagGroup {
    /// Patient, study, series and instance identifiers
    Identifier,
    /// Spatial calibration, position and orientation
    Geometry,
    /// Matrix size, frame count and photometric interpretation
    ImageShape,
    /// Default windowing
    Display,
    /// Enhanced multi-frame functional groups
    MultiFrame,
}

impl TagGroup {
    pub const ALL: [TagGroup; 5] = [
        TagGroup::Identifier,
        TagGroup::Geometry,
        TagGroup::ImageShape,
        TagGroup::Display,
        TagGroup::MultiFrame,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TagGroup::Identifier => "identifier",
            TagGroup::Geometry => "geometry",
            TagGroup::ImageShape => "image shape",
            TagGroup::Display => "display",
            TagGroup::MultiFrame => "multi-frame",
        }
    }
}

impl RequiredTag {
    pub const fn new(group: u16, element: u16, keyword: &'static str, category: TagGroup) -> Self {
        Self {
            tag: Tag(group, element),
            keyword,
            group: category,
        }
    }

    /// Eight upper-case hex digits, the key form used by DICOM JSON.
    pub fn key(&self) -> String {
        tag_key(self.tag)
    }
}

pub fn tag_key(tag: Tag) -> String {
    format!("{:04X}{:04X}", tag.group(), tag.element())
}

pub fn by_group(group: TagGroup) -> impl Iterator<Item = &'static RequiredTag> {
    REQUIRED_DICOM_TAGS.iter().filter(move |t| t.group == group)
}

pub const REQUIRED_DICOM_TAGS: &[RequiredTag] = &[
    RequiredTag::new(0x0008, 0x0018, "SOPInstanceUID", TagGroup::Identifier),
    RequiredTag::new(0x0010, 0x0020, "PatientID", TagGroup::Identifier),
    RequiredTag::new(0x0018, 0x0050, "SliceThickness", TagGroup::Geometry),
    RequiredTag::new(
        0x0018,
        0x1114,
        "EstimatedRadiographicMagnificationFactor",
        TagGroup::Geometry,
    ),
    RequiredTag::new(0x0018, 0x1164, "ImagerPixelSpacing", TagGroup::Geometry),
    RequiredTag::new(0x0020, 0x000D, "StudyInstanceUID", TagGroup::Identifier),
    RequiredTag::new(0x0020, 0x000E, "SeriesInstanceUID", TagGroup::Identifier),
    RequiredTag::new(0x0020, 0x0013, "InstanceNumber", TagGroup::Identifier),
    RequiredTag::new(0x0020, 0x0032, "ImagePositionPatient", TagGroup::Geometry),
    RequiredTag::new(0x0020, 0x0037, "ImageOrientationPatient", TagGroup::Geometry),
    RequiredTag::new(0x0020, 0x9113, "PlanePositionSequence", TagGroup::Geometry),
    RequiredTag::new(0x0020, 0x9116, "PlaneOrientationSequence", TagGroup::Geometry),
    RequiredTag::new(0x0028, 0x0004, "PhotometricInterpretation", TagGroup::ImageShape),
    RequiredTag::new(0x0028, 0x0008, "NumberOfFrames", TagGroup::ImageShape),
    RequiredTag::new(0x0028, 0x0010, "Rows", TagGroup::ImageShape),
    RequiredTag::new(0x0028, 0x0011, "Columns", TagGroup::ImageShape),
    RequiredTag::new(0x0028, 0x0030, "PixelSpacing", TagGroup::Geometry),
    RequiredTag::new(0x0028, 0x1050, "WindowCenter", TagGroup::Display),
    RequiredTag::new(0x0028, 0x1051, "WindowWidth", TagGroup::Display),
    RequiredTag::new(0x0028, 0x9110, "PixelMeasuresSequence", TagGroup::Geometry),
    RequiredTag::new(
        0x5200,
        0x9229,
        "SharedFunctionalGroupsSequence",
        TagGroup::MultiFrame,
    ),
    RequiredTag::new(
        0x5200,
        0x9230,
        "PerFrameFunctionalGroupsSequence",
        TagGroup::MultiFrame,
    ),
];
