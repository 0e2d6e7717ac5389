use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::ScanError;
use crate::model::JOB_CONFIG_FILE_NAME;

/// Walks `root` and returns every regular `config.xml` beneath it, root included.
///
/// Directory entries are visited in file-name order so the result is stable for a
/// given tree. Symlinks are not followed and never matched. The first entry that
/// cannot be read aborts the walk.
pub fn discover_job_configs(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut jobs = Vec::new();
    let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();

    for item in walker {
        let entry = item.map_err(|err| ScanError::Traversal {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source: err,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name() != OsStr::new(JOB_CONFIG_FILE_NAME) {
            continue;
        }
        debug!("discovered job config {}", entry.path().display());
        jobs.push(entry.into_path());
    }

    Ok(jobs)
}
