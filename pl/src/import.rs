//! Seeding a pod's interpretation store from persisted records

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Interpretation, InterpretationRecord, Pod};

/// Errors from importing persisted interpretations
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read interpretations from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse interpretations in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Record at `index` was rejected; earlier records stay imported
    #[error("pod {pod}: invalid interpretation at index {index}: {reason}")]
    Validation { pod: String, index: usize, reason: String },
}

/// Append the records stored at `path` to the pod's store, in file order
///
/// A missing file is normal and imports nothing. The first record that
/// fails validation, or that the store rejects, stops the import without
/// rolling back the records before it. Returns the number appended.
pub fn import_interpretations(pod: &mut Pod, path: &Path) -> Result<usize, ImportError> {
    debug!(pod = %pod.name(), path = %path.display(), "import_interpretations: called");
    if !path.exists() {
        debug!("import_interpretations: no persisted interpretations");
        return Ok(0);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<InterpretationRecord> = serde_json::from_str(&content).map_err(|source| ImportError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let total = records.len();
    let pod_name = pod.name().to_string();
    for (index, record) in records.into_iter().enumerate() {
        let validation = |reason: String| ImportError::Validation {
            pod: pod_name.clone(),
            index,
            reason,
        };
        let interpretation = Interpretation::try_from(record).map_err(|e| validation(e.to_string()))?;
        pod.interpretations_mut()
            .add(interpretation)
            .map_err(|e| validation(e.to_string()))?;
    }

    info!(pod = %pod_name, count = total, "Imported interpretations");
    Ok(total)
}
