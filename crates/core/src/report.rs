use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::classify::{classify_job_type, extract_maven_job};
use crate::error::ScanError;
use crate::model::{InventoryOptions, InventorySummary, JobType, MavenJob};
use crate::scan::discover_job_configs;

/// Formats one report line: the job's label, a space, then its config path.
pub fn format_report_line(path: &Path, job: &MavenJob) -> String {
    format!("{} {}\n", job.label(), path.display())
}

/// Discovers every job under `options.job_dir` and writes a report line to `out` for
/// each Maven module-set job, in discovery order.
///
/// The first failure ends the run. Lines written for earlier jobs stay in `out`.
pub fn run_inventory<W: Write>(
    options: &InventoryOptions,
    out: &mut W,
) -> Result<InventorySummary, ScanError> {
    let jobs = discover_job_configs(&options.job_dir)?;
    info!("Found {} jobs", jobs.len());

    let mut summary = InventorySummary {
        discovered: jobs.len(),
        ..InventorySummary::default()
    };

    for path in &jobs {
        let document = fs::read(path).map_err(|source| ScanError::Read {
            path: path.clone(),
            source,
        })?;
        let job_type = classify_job_type(&document).map_err(|source| ScanError::Classify {
            path: path.clone(),
            source,
        })?;
        debug!("{} classified as {}", path.display(), job_type);
        summary.record(job_type);

        if job_type != JobType::MavenModuleSet {
            continue;
        }

        let job = extract_maven_job(&document).map_err(|source| ScanError::Decode {
            path: path.clone(),
            source,
        })?;
        out.write_all(format_report_line(path, &job).as_bytes())
            .map_err(|source| ScanError::Output {
                path: path.clone(),
                source,
            })?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::format_report_line;
    use crate::model::MavenJob;

    #[test]
    fn formats_assigned_label() {
        let job = MavenJob {
            assigned_node: "linux && docker".to_string(),
        };
        assert_eq!(
            format_report_line(Path::new("/jobs/a/config.xml"), &job),
            "linux && docker /jobs/a/config.xml\n"
        );
    }

    #[test]
    fn formats_placeholder_label() {
        assert_eq!(
            format_report_line(Path::new("jobs/c/config.xml"), &MavenJob::default()),
            "<none> jobs/c/config.xml\n"
        );
    }
}
