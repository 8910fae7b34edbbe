use std::path::PathBuf;
use std::pin::pin;

use futures::{stream, StreamExt};
use model::Segment;
use nominatim::ReverseGeocoder;

use crate::aggregate::{AggregateReport, Aggregator};
use crate::config::RunConfig;
use crate::render::{render, report_file_name};
use crate::ReportError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentCounts {
    pub segments: usize,
    pub aggregated: usize,
    pub skipped_resolution: usize,
    pub skipped_timestamp: usize,
}

impl SegmentCounts {
    pub fn skipped(&self) -> usize {
        self.skipped_resolution + self.skipped_timestamp
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub counts: SegmentCounts,
    pub report: AggregateReport,
    pub output_path: PathBuf,
}

/// Resolves the start of every segment and sums up the distances.
///
/// Up to `concurrency` lookups run at once. Results are consumed in input
/// order by this task alone, so the aggregate does not depend on how the
/// lookups interleave. Segments that fail to resolve or to date are logged
/// and left out.
pub async fn aggregate_segments<G>(
    segments: Vec<Segment>,
    geocoder: &G,
    concurrency: usize,
) -> (AggregateReport, SegmentCounts)
where
    G: ReverseGeocoder + ?Sized,
{
    let mut counts = SegmentCounts {
        segments: segments.len(),
        ..Default::default()
    };
    let mut aggregator = Aggregator::new();

    let mut lookups = pin!(stream::iter(segments)
        .map(move |segment| async move {
            let start = segment.start;
            let country = geocoder.resolve(start.latitude(), start.longitude()).await;
            (segment, country)
        })
        .buffered(concurrency.max(1)));

    while let Some((segment, country)) = lookups.next().await {
        let country = match country {
            Ok(country) => country,
            Err(why) => {
                log::warn!(
                    "Error getting country for {} - {}, skipping segment.",
                    segment.start,
                    why
                );
                counts.skipped_resolution += 1;
                continue;
            }
        };
        match aggregator.add_segment(segment, country) {
            Ok(()) => counts.aggregated += 1,
            Err(why) => {
                log::warn!("{}, skipping segment.", why);
                counts.skipped_timestamp += 1;
            }
        }

        let done = counts.aggregated + counts.skipped();
        if done % 100 == 0 {
            log::info!("progress: {}/{} segments", done, counts.segments);
        }
    }

    (aggregator.finish(), counts)
}

/// Loads the export, builds the report and writes it to
/// `<output_dir>/distance_report_<today>.txt`.
pub async fn run<G>(config: &RunConfig, geocoder: &G) -> Result<RunSummary, ReportError>
where
    G: ReverseGeocoder + ?Sized,
{
    let timeline = timeline::load_timeline(&config.input_path)?;
    let segments = timeline.segments();
    log::info!(
        "found {} activity segments in {} timeline objects",
        segments.len(),
        timeline.timeline_objects.len()
    );

    let (report, counts) = aggregate_segments(segments, geocoder, config.concurrency).await;

    let output_path = config.output_dir.join(report_file_name(config.today));
    tokio::fs::write(&output_path, render(&report))
        .await
        .map_err(|source| ReportError::Output {
            path: output_path.clone(),
            source,
        })?;

    Ok(RunSummary {
        counts,
        report,
        output_path,
    })
}
