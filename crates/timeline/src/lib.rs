use std::error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use data_model::{ActivitySegment, Location, Timeline, TimelineObject};
use model::{Coordinate, Segment};

pub mod data_model;

#[derive(Debug)]
pub enum TimelineError {
    ReadError { path: PathBuf, source: io::Error },
    ParseError(serde_json::Error),
}

impl error::Error for TimelineError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            TimelineError::ReadError { source, .. } => Some(source),
            TimelineError::ParseError(e) => Some(e),
        }
    }
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimelineError::ReadError { path, source } => {
                write!(f, "Error reading JSON file {}: {}", path.display(), source)
            }
            TimelineError::ParseError(e) => write!(f, "Error parsing JSON file: {}", e),
        }
    }
}

impl From<serde_json::Error> for TimelineError {
    fn from(e: serde_json::Error) -> Self {
        TimelineError::ParseError(e)
    }
}

/// Decodes a whole export document.
pub fn parse_timeline(bytes: &[u8]) -> Result<Timeline, TimelineError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn load_timeline<P: AsRef<Path>>(path: P) -> Result<Timeline, TimelineError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| TimelineError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let timeline = parse_timeline(&bytes)?;
    log::info!(
        "loaded {} timeline objects from {}",
        timeline.timeline_objects.len(),
        path.display()
    );
    Ok(timeline)
}

impl Timeline {
    /// All movement segments in input order. See [`extract_segments`].
    pub fn segments(&self) -> Vec<Segment> {
        extract_segments(self)
    }
}

/// Flattens the timeline into movement segments, preserving input order.
///
/// Only activity segments carrying both a start and an end location are
/// kept. Coordinates missing inside a present location read as zero and are
/// passed on as-is; whatever lies at that position is left to the resolver.
/// A missing distance counts as zero meters and a missing start timestamp as
/// an empty string, which later fails to parse for that segment alone.
/// Segments with a negative distance are dropped with a warning.
pub fn extract_segments(timeline: &Timeline) -> Vec<Segment> {
    timeline
        .timeline_objects
        .iter()
        .filter_map(|object| match object {
            TimelineObject::ActivitySegment(segment) => to_segment(segment),
            TimelineObject::PlaceVisit(_) | TimelineObject::Unknown => None,
        })
        .collect()
}

fn to_segment(segment: &ActivitySegment) -> Option<Segment> {
    let start = segment.start_location.as_ref()?;
    let end = segment.end_location.as_ref()?;
    let distance = segment.distance.unwrap_or(0);
    let Ok(distance_meters) = u64::try_from(distance) else {
        log::warn!(
            "skipping segment at {}: negative distance {} m",
            to_coordinate(start),
            distance
        );
        return None;
    };
    Some(Segment {
        start: to_coordinate(start),
        end: to_coordinate(end),
        distance_meters,
        start_timestamp: segment
            .duration
            .as_ref()
            .and_then(|duration| duration.start_timestamp.clone())
            .unwrap_or_default(),
    })
}

fn to_coordinate(location: &Location) -> Coordinate {
    Coordinate::new(location.latitude_e7, location.longitude_e7)
}
