use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};

/// Root of a semantic location history export.
/// See <https://support.google.com/maps/answer/6258979>
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub timeline_objects: Vec<TimelineObject>,
}

/// One entry of `timelineObjects`. Each entry carries exactly one kind of
/// payload; entries of kinds this crate does not know about are kept as
/// `Unknown` so that the relative order of the list is preserved.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawTimelineObject")]
pub enum TimelineObject {
    ActivitySegment(ActivitySegment),
    PlaceVisit(PlaceVisit),
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimelineObject {
    activity_segment: Option<ActivitySegment>,
    place_visit: Option<PlaceVisit>,
}

impl From<RawTimelineObject> for TimelineObject {
    fn from(raw: RawTimelineObject) -> Self {
        match (raw.activity_segment, raw.place_visit) {
            (Some(segment), _) => Self::ActivitySegment(segment),
            (None, Some(visit)) => Self::PlaceVisit(visit),
            (None, None) => Self::Unknown,
        }
    }
}

/// A movement between two places.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySegment {
    pub start_location: Option<Location>,
    pub end_location: Option<Location>,

    /// Distance travelled in meters. Negative values are dropped during
    /// extraction.
    #[serde(default)]
    pub distance: Option<i64>,

    #[serde(default)]
    pub duration: Option<Duration>,

    /// e.g. `IN_PASSENGER_VEHICLE`, `WALKING`
    pub activity_type: Option<String>,
}

/// A stay at a place. Only recognized so that it can be skipped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceVisit {
    pub location: Option<Location>,
    pub duration: Option<Duration>,
}

/// Missing or `null` coordinates read as zero.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, rename = "latitudeE7")]
    pub latitude_e7: i64,

    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, rename = "longitudeE7")]
    pub longitude_e7: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Duration {
    /// example: 2024-03-01T10:00:00.000Z
    pub start_timestamp: Option<String>,

    pub end_timestamp: Option<String>,
}
