use dicom_core::dictionary::DataDictionary;
use dicom_dictionary_std::StandardDataDictionary;
use dicom_uploader::required_tags::{by_group, TagGroup, REQUIRED_DICOM_TAGS};

fn main() {
    println!("📋 Required DICOM Tags");
    println!("======================");
    println!("Forwarded per file: {}", REQUIRED_DICOM_TAGS.len());
    println!();

    for group in TagGroup::ALL {
        println!("{}:", group.label());
        for required in by_group(group) {
            let known = StandardDataDictionary
                .by_tag(required.tag)
                .map(|entry| entry.alias == required.keyword)
                .unwrap_or(false);
            let marker = if known { "" } else { " (not in standard dictionary)" };
            println!("• {} {}{}", required.key(), required.keyword, marker);
        }
        println!();
    }
}
