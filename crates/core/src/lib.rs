pub mod classify;
pub mod error;
pub mod model;
pub mod report;
pub mod scan;

pub use classify::{classify_job_type, extract_maven_job};
pub use error::{ParseError, ScanError};
pub use model::{
    InventoryOptions, InventorySummary, JobType, MavenJob, JOB_CONFIG_FILE_NAME,
    UNASSIGNED_LABEL,
};
pub use report::{format_report_line, run_inventory};
pub use scan::discover_job_configs;
