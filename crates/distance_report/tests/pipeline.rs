use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use distance_report::{aggregate_segments, run, ReportError, RunConfig};
use model::{Coordinate, CountryCode, Segment};
use nominatim::{CachedGeocoder, ResolutionError, ReverseGeocoder};

/// Answers from a fixed table keyed by the E7 coordinate and records every
/// lookup it receives.
#[derive(Default)]
struct TableGeocoder {
    countries: HashMap<(i64, i64), &'static str>,
    lookups: Mutex<Vec<(f64, f64)>>,
}

impl TableGeocoder {
    fn new(entries: &[((i64, i64), &'static str)]) -> Self {
        Self {
            countries: entries.iter().cloned().collect(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    fn lookups(&self) -> Vec<(f64, f64)> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReverseGeocoder for TableGeocoder {
    async fn resolve(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CountryCode, ResolutionError> {
        self.lookups.lock().unwrap().push((latitude, longitude));
        let key = (
            (latitude * 1e7).round() as i64,
            (longitude * 1e7).round() as i64,
        );
        match self.countries.get(&key) {
            Some(code) => CountryCode::new(code)
                .map_err(|_| ResolutionError::NoCountry { latitude, longitude }),
            None => Err(ResolutionError::NoCountry { latitude, longitude }),
        }
    }
}

const NEW_YORK: (i64, i64) = (400000000, -740000000);
const PARIS: (i64, i64) = (488566000, 23522000);
const ATLANTIC: (i64, i64) = (0, -300000000);

fn geocoder() -> TableGeocoder {
    TableGeocoder::new(&[(NEW_YORK, "us"), (PARIS, "fr"), (ATLANTIC, "")])
}

fn activity(start: (i64, i64), distance: u64, timestamp: &str) -> String {
    format!(
        r#"{{ "activitySegment": {{
            "startLocation": {{ "latitudeE7": {}, "longitudeE7": {} }},
            "endLocation": {{ "latitudeE7": {}, "longitudeE7": {} }},
            "distance": {},
            "duration": {{ "startTimestamp": "{}" }}
        }} }}"#,
        start.0,
        start.1,
        start.0 + 1000,
        start.1 + 1000,
        distance,
        timestamp
    )
}

fn export(objects: &[String]) -> String {
    format!(r#"{{ "timelineObjects": [{}] }}"#, objects.join(","))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

fn run_config(dir: &Path) -> RunConfig {
    RunConfig {
        input_path: dir.join("timeline.json"),
        output_dir: dir.to_path_buf(),
        ..RunConfig::new(today())
    }
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn two_countries_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("timeline.json"),
        export(&[
            activity(NEW_YORK, 5000, "2024-03-01T10:00:00-05:00"),
            activity(PARIS, 3000, "2024-03-01T09:00:00+01:00"),
        ]),
    )
    .unwrap();

    let geocoder = geocoder();
    let summary = run(&run_config(dir.path()), &geocoder).await.unwrap();

    assert_eq!(summary.counts.segments, 2);
    assert_eq!(summary.counts.aggregated, 2);
    assert_eq!(summary.counts.skipped(), 0);
    assert_eq!(summary.report.get("us", date("2024-03-01")), Some(5.0));
    assert_eq!(summary.report.get("fr", date("2024-03-01")), Some(3.0));
    assert_eq!(summary.report.len(), 2);

    assert_eq!(
        summary.output_path,
        dir.path().join("distance_report_2024-03-05.txt")
    );
    assert_eq!(
        fs::read_to_string(&summary.output_path).unwrap(),
        "Total distance traveled in each country per day (in kilometers):\n\
         Country: fr\n  2024-03-01: 3.00 km\n\
         Country: us\n  2024-03-01: 5.00 km\n"
    );

    assert_eq!(geocoder.lookups(), vec![(40.0, -74.0), (48.8566, 2.3522)]);
}

#[tokio::test]
async fn failed_segments_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("timeline.json"),
        export(&[
            activity(NEW_YORK, 5000, "2024-03-01T10:00:00-05:00"),
            // empty country code
            activity(ATLANTIC, 9000, "2024-03-01T10:00:00-02:00"),
            // no answer at all
            activity((123, 456), 7000, "2024-03-01T10:00:00Z"),
            // undated
            activity(PARIS, 4000, "not a timestamp"),
            activity(PARIS, 3000, "2024-03-01T09:00:00+01:00"),
            r#"{ "placeVisit": { "location": { "latitudeE7": 1, "longitudeE7": 2 } } }"#
                .to_owned(),
        ]),
    )
    .unwrap();

    let summary = run(&run_config(dir.path()), &geocoder()).await.unwrap();

    assert_eq!(summary.counts.segments, 5);
    assert_eq!(summary.counts.aggregated, 2);
    assert_eq!(summary.counts.skipped_resolution, 2);
    assert_eq!(summary.counts.skipped_timestamp, 1);
    assert_eq!(summary.report.countries().len(), 2);
    assert_eq!(summary.report.get("us", date("2024-03-01")), Some(5.0));
    assert_eq!(summary.report.get("fr", date("2024-03-01")), Some(3.0));

    let text = fs::read_to_string(&summary.output_path).unwrap();
    assert!(!text.contains("9.00"));
    assert!(!text.contains("7.00"));
    assert!(!text.contains("4.00"));
}

#[tokio::test]
async fn bad_records_do_not_abort_the_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("timeline.json"),
        export(&[
            activity(NEW_YORK, 5000, "2024-03-01T10:00:00-05:00"),
            r#"{ "activitySegment": { "startLocation": {}, "endLocation": {}, "distance": -1 } }"#
                .to_owned(),
        ]),
    )
    .unwrap();

    let summary = run(&run_config(dir.path()), &geocoder()).await.unwrap();

    assert_eq!(summary.counts.segments, 1);
    assert_eq!(summary.counts.aggregated, 1);
    assert_eq!(summary.report.get("us", date("2024-03-01")), Some(5.0));
}

#[tokio::test]
async fn null_object_list_writes_an_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("timeline.json"), r#"{ "timelineObjects": null }"#).unwrap();

    let summary = run(&run_config(dir.path()), &geocoder()).await.unwrap();

    assert!(summary.report.is_empty());
    assert_eq!(summary.counts.segments, 0);
}

#[tokio::test]
async fn concurrency_does_not_change_the_report() {
    let mut segments = Vec::new();
    for day in 1..=9 {
        for (start, distance) in [(NEW_YORK, 1111), (PARIS, 2222), (ATLANTIC, 3333)] {
            segments.push(Segment {
                start: Coordinate::new(start.0, start.1),
                end: Coordinate::new(start.0, start.1),
                distance_meters: distance * day,
                start_timestamp: format!("2024-03-0{day}T12:00:00+00:00"),
            });
        }
    }

    let (sequential, sequential_counts) =
        aggregate_segments(segments.clone(), &geocoder(), 1).await;
    let (parallel, parallel_counts) = aggregate_segments(segments, &geocoder(), 8).await;

    assert_eq!(sequential_counts, parallel_counts);
    assert_eq!(sequential_counts.aggregated, 18);
    assert_eq!(sequential_counts.skipped_resolution, 9);
    assert_eq!(sequential.len(), parallel.len());
    for (country, days) in sequential.countries() {
        for (day, km) in days {
            let other = parallel.get(country.as_str(), *day).unwrap();
            assert!((km - other).abs() < 1e-9);
        }
    }
}

#[tokio::test]
async fn repeated_positions_hit_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("timeline.json"),
        export(&[
            activity(PARIS, 1000, "2024-03-01T09:00:00+01:00"),
            activity(PARIS, 1000, "2024-03-01T11:00:00+01:00"),
            activity(PARIS, 1000, "2024-03-02T11:00:00+01:00"),
        ]),
    )
    .unwrap();

    let cached = CachedGeocoder::new(geocoder(), 1);
    let summary = run(&run_config(dir.path()), &cached).await.unwrap();

    assert_eq!(cached.inner().lookups().len(), 1);
    assert_eq!(summary.report.get("fr", date("2024-03-01")), Some(2.0));
    assert_eq!(summary.report.get("fr", date("2024-03-02")), Some(1.0));
}

#[tokio::test]
async fn missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let result = run(&run_config(dir.path()), &geocoder()).await;

    assert!(matches!(result, Err(ReportError::Input(_))));
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn invalid_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("timeline.json"), "{ not json").unwrap();

    let result = run(&run_config(dir.path()), &geocoder()).await;

    assert!(matches!(result, Err(ReportError::Input(_))));
}

#[tokio::test]
async fn unwritable_output_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("timeline.json"),
        export(&[activity(PARIS, 3000, "2024-03-01T09:00:00+01:00")]),
    )
    .unwrap();

    let config = RunConfig {
        output_dir: dir.path().join("does-not-exist"),
        ..run_config(dir.path())
    };
    let result = run(&config, &geocoder()).await;

    assert!(matches!(result, Err(ReportError::Output { .. })));
}

#[tokio::test]
async fn empty_export_still_writes_a_report() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("timeline.json"), r#"{ "timelineObjects": [] }"#).unwrap();

    let summary = run(&run_config(dir.path()), &geocoder()).await.unwrap();

    assert!(summary.report.is_empty());
    assert_eq!(
        fs::read_to_string(&summary.output_path).unwrap(),
        "Total distance traveled in each country per day (in kilometers):\n"
    );
}
