use std::fmt;
use std::path::PathBuf;

/// File name every Jenkins job persists its configuration under.
pub const JOB_CONFIG_FILE_NAME: &str = "config.xml";

pub const MAVEN_ROOT_ELEMENT: &str = "maven2-moduleset";
pub const FREESTYLE_ROOT_ELEMENT: &str = "project";
pub const ASSIGNED_NODE_ELEMENT: &str = "assignedNode";

/// Label printed for Maven jobs without an `assignedNode`.
pub const UNASSIGNED_LABEL: &str = "<none>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobType {
    MavenModuleSet,
    Freestyle,
    Unknown,
}

impl JobType {
    /// Maps the local name of a document's root element to a job type.
    pub fn from_root_element(local_name: &[u8]) -> Self {
        if local_name == MAVEN_ROOT_ELEMENT.as_bytes() {
            JobType::MavenModuleSet
        } else if local_name == FREESTYLE_ROOT_ELEMENT.as_bytes() {
            JobType::Freestyle
        } else {
            JobType::Unknown
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobType::MavenModuleSet => "maven",
            JobType::Freestyle => "freestyle",
            JobType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// The slice of a `maven2-moduleset` document the report needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MavenJob {
    pub assigned_node: String,
}

impl MavenJob {
    pub fn label(&self) -> &str {
        if self.assigned_node.is_empty() {
            UNASSIGNED_LABEL
        } else {
            &self.assigned_node
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InventoryOptions {
    pub job_dir: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventorySummary {
    pub discovered: usize,
    pub maven_jobs: usize,
    pub freestyle_jobs: usize,
    pub unknown_jobs: usize,
}

impl InventorySummary {
    pub(crate) fn record(&mut self, job_type: JobType) {
        match job_type {
            JobType::MavenModuleSet => self.maven_jobs += 1,
            JobType::Freestyle => self.freestyle_jobs += 1,
            JobType::Unknown => self.unknown_jobs += 1,
        }
    }
}
