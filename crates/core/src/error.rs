use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures of the byte-level classify/decode operations.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML at byte {position}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    #[error("document ended before a root element")]
    MissingRootElement,
    #[error("expected <{expected}> root element, found <{found}>")]
    UnexpectedRootElement {
        expected: &'static str,
        found: String,
    },
    #[error("document ended before </{element}>")]
    UnclosedElement { element: &'static str },
}

/// Fatal errors of an inventory run. Each variant names the offending path.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to walk {}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to classify {}", path.display())]
    Classify {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("failed to write report line for {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub fn path(&self) -> &Path {
        match self {
            ScanError::Traversal { path, .. }
            | ScanError::Read { path, .. }
            | ScanError::Classify { path, .. }
            | ScanError::Decode { path, .. }
            | ScanError::Output { path, .. } => path,
        }
    }
}
