//! Best-effort artifact resolution for completed runs.

use tracing::warn;

use jobrun_core::{ArtifactReference, RunId};

use crate::service::JobService;

/// List the artifacts of a completed run and resolve each name to a URL.
///
/// Listing order is preserved. A listing failure is logged as a warning and
/// yields an empty list: the primary run outcome has already been decided and
/// must not be masked by a secondary failure. This is the one deliberate
/// recover boundary in the crate, wrapping exactly the listing call.
pub async fn resolve_artifacts<S>(service: &S, run_id: RunId) -> Vec<ArtifactReference>
where
    S: JobService + ?Sized,
{
    let names = match service.list_run_artifacts(run_id).await {
        Ok(names) => names,
        Err(err) => {
            warn!(
                run_id = %run_id,
                error = %err,
                "Unable to retrieve artifacts generated by the run"
            );
            return Vec::new();
        }
    };

    names
        .into_iter()
        .map(|name| {
            let url = service.artifact_url(run_id, &name);
            ArtifactReference { name, url }
        })
        .collect()
}
