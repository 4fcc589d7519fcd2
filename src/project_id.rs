//! One-shot resolution of the GCP project id.
//!
//! The metadata server is queried at most once per process; everything after
//! that reads the cached value. Off GCP (or on any query failure) the
//! sentinel [`NON_GCP_PROJECT`] is cached instead, so resolution never fails
//! outward.

use std::sync::OnceLock;
use std::time::Duration;

/// Sentinel project id used when the process is not running on GCP.
pub(crate) const NON_GCP_PROJECT: &str = "non-gcp";

const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
const METADATA_TIMEOUT: Duration = Duration::from_secs(1);

/// Source of the platform project identifier.
///
/// `None` means "not applicable": not on GCP, or the query failed.
pub(crate) trait MetadataSource {
    fn query_project_id(&self) -> Option<String>;
}

/// The GCE metadata server, reachable only from inside Google Cloud.
pub(crate) struct GceMetadata {
    host: String,
}

impl GceMetadata {
    pub(crate) fn from_env() -> Self {
        let host = crate::env::env_var_non_empty("GCE_METADATA_HOST")
            .unwrap_or_else(|| DEFAULT_METADATA_HOST.to_owned());
        Self { host }
    }
}

impl MetadataSource for GceMetadata {
    fn query_project_id(&self) -> Option<String> {
        let url = format!("http://{}/computeMetadata/v1/project/project-id", self.host);

        // The blocking client must not be driven from an async runtime
        // thread; a dedicated thread keeps the query runtime-agnostic.
        std::thread::spawn(move || {
            let client = reqwest::blocking::Client::builder()
                .timeout(METADATA_TIMEOUT)
                .build()
                .ok()?;
            let response = client
                .get(&url)
                .header("Metadata-Flavor", "Google")
                .send()
                .ok()?;

            // Anything other than a flavored 200 means we are not talking to
            // the real metadata server.
            if !response.status().is_success() {
                return None;
            }
            let flavored = response
                .headers()
                .get("metadata-flavor")
                .is_some_and(|v| v == "Google");
            if !flavored {
                return None;
            }

            let id = response.text().ok()?.trim().to_owned();
            (!id.is_empty()).then_some(id)
        })
        .join()
        .ok()
        .flatten()
    }
}

/// Memoized project id with a deterministic fallback.
pub(crate) struct ProjectIdCache {
    cell: OnceLock<String>,
}

impl ProjectIdCache {
    pub(crate) const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the cached project id, querying `source` on the first call only.
    pub(crate) fn get(&self, source: &dyn MetadataSource) -> &str {
        self.cell.get_or_init(|| {
            source
                .query_project_id()
                .unwrap_or_else(|| NON_GCP_PROJECT.to_owned())
        })
    }
}

static PROJECT_ID: ProjectIdCache = ProjectIdCache::new();

/// Resolve the process-wide project id (cached after the first call).
pub(crate) fn resolve() -> &'static str {
    PROJECT_ID.get(&GceMetadata::from_env())
}
