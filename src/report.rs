use std::io::{self, Write};

use tracing::{info, warn};

use crate::common::types::UploadResult;

/// Writes the aggregate line followed by one line per integrated item and one
/// per unit error.
pub fn report_result<W: Write>(result: &UploadResult, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "main-log: status={} units_done_count={} units_error_count={}",
        result.status, result.units_done_count, result.units_error_count
    )?;

    for item in &result.items_with_names {
        info!("Integrated {} as {}", item.name, item.item_uuid);
        writeln!(
            out,
            "main-log: dicom series integrated successfully item_uuid={} name={:?}",
            item.item_uuid, item.name
        )?;
    }

    for unit in &result.unit_errors {
        warn!("Integration error {}: {:?}", unit.error, unit.object_urls);
        writeln!(
            out,
            "main-log: dicom series integration error error={:?} object_urls={:?}",
            unit.error, unit.object_urls
        )?;
    }

    Ok(())
}
