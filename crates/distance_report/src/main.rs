use std::process::ExitCode;

use chrono::Local;
use distance_report::Config;
use env_logger::Env;
use nominatim::{CachedGeocoder, NominatimClient};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env(Local::now().date_naive());

    // geocoder
    let client = match NominatimClient::new(&config.nominatim) {
        Ok(client) => client,
        Err(why) => {
            log::error!("could not create geocoding client: {}", why);
            return ExitCode::FAILURE;
        }
    };
    let geocoder = CachedGeocoder::new(client, config.cache_grid_e7);

    // report
    let summary = match distance_report::run(&config.run, &geocoder).await {
        Ok(summary) => summary,
        Err(why) => {
            log::error!("{}", why);
            return ExitCode::FAILURE;
        }
    };

    let stats = geocoder.stats().await;
    log::info!(
        "{} of {} segments aggregated ({} unresolved, {} undated), {:.2} km in total.",
        summary.counts.aggregated,
        summary.counts.segments,
        summary.counts.skipped_resolution,
        summary.counts.skipped_timestamp,
        summary.report.total_km()
    );
    log::info!(
        "geocoder cache: {} hits, {} misses.",
        stats.hits,
        stats.misses
    );
    println!("Distance report saved to {}", summary.output_path.display());

    ExitCode::SUCCESS
}
