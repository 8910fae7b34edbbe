use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use timeline::TimelineError;

pub mod aggregate;
pub mod config;
pub mod pipeline;
pub mod render;

pub use aggregate::{AggregateReport, Aggregator};
pub use config::{Config, RunConfig};
pub use pipeline::{aggregate_segments, run, RunSummary, SegmentCounts};

/// Errors that abort a run. Everything that goes wrong for a single segment
/// is logged and skipped instead.
#[derive(Debug)]
pub enum ReportError {
    Input(TimelineError),
    Output { path: PathBuf, source: io::Error },
}

impl error::Error for ReportError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ReportError::Input(e) => Some(e),
            ReportError::Output { source, .. } => Some(source),
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReportError::Input(e) => write!(f, "{}", e),
            ReportError::Output { path, source } => {
                write!(f, "Error creating output file {}: {}", path.display(), source)
            }
        }
    }
}

impl From<TimelineError> for ReportError {
    fn from(e: TimelineError) -> Self {
        ReportError::Input(e)
    }
}
