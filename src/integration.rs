use tracing::debug;

use crate::common::types::CloudIntegration;
use crate::error::{Result, UploadError};

/// Picks the single integration whose title equals `title` exactly.
///
/// Zero matches and multiple matches are both errors, so an upload can never
/// go through a credential that merely happens to share a name.
pub fn resolve_integration<'a>(
    integrations: &'a [CloudIntegration],
    title: &str,
) -> Result<&'a CloudIntegration> {
    let matches: Vec<&CloudIntegration> =
        integrations.iter().filter(|i| i.title == title).collect();
    debug!(
        "{} of {} integrations match title {:?}",
        matches.len(),
        integrations.len(),
        title
    );

    match matches.as_slice() {
        [] => Err(UploadError::IntegrationNotFound {
            title: title.to_string(),
        }),
        [single] => Ok(*single),
        many => Err(UploadError::AmbiguousIntegration {
            title: title.to_string(),
            count: many.len(),
        }),
    }
}
