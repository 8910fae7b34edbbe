use std::time::Duration;

use async_trait::async_trait;
use model::CountryCode;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::{response::ReverseResponse, ResolutionError, ReverseGeocoder};

pub const NOMINATIM_API_URL: &str = "https://nominatim.openstreetmap.org";

/// Zoom level of the `address` details. Level 3 stops at country level.
pub const COUNTRY_ZOOM: &str = "3";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_USER_AGENT: &str =
    concat!("timeline-distance-report/", env!("CARGO_PKG_VERSION"));

const REFILL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub rate_limit_per_minute: Option<u64>,
    pub proxy: Option<String>,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: NOMINATIM_API_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            rate_limit_per_minute: None,
            proxy: None,
        }
    }
}

impl NominatimConfig {
    pub fn reverse_url(&self) -> String {
        format!("{}/reverse", self.base_url.trim_end_matches('/'))
    }
}

struct NominatimClientState {
    pub available_requests: u64,
    pub last_refill: Instant,
}

pub struct NominatimClient {
    pub config: NominatimConfig,
    http: reqwest::Client,
    state: Mutex<NominatimClientState>,
}

impl NominatimClient {
    pub fn new(config: &NominatimConfig) -> Result<Self, ResolutionError> {
        /* build the http client with optional proxy */
        let builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());
        let http = if let Some(proxy_url) = &config.proxy {
            log::info!("Using proxy '{proxy_url}' for reverse geocoding.");
            builder.proxy(reqwest::Proxy::all(proxy_url)?).build()?
        } else {
            builder.no_proxy().build()?
        };

        Ok(Self {
            config: config.clone(),
            http,
            state: Mutex::new(NominatimClientState {
                available_requests: config.rate_limit_per_minute.unwrap_or(0),
                last_refill: Instant::now(),
            }),
        })
    }

    /// Waits until the rate limit allows another request.
    async fn acquire_request(&self) {
        let Some(rate_limit_per_minute) = self.config.rate_limit_per_minute else {
            return;
        };
        loop {
            let wait = {
                let mut state = self.state.lock().await;

                let since_last_refill = state.last_refill.elapsed();
                if since_last_refill >= REFILL_INTERVAL {
                    state.available_requests = rate_limit_per_minute;
                    state.last_refill = Instant::now();
                }

                if state.available_requests != 0 {
                    state.available_requests -= 1;
                    return;
                }
                REFILL_INTERVAL.saturating_sub(since_last_refill)
            };
            log::debug!("Rate limit reached, waiting {:?}.", wait);
            sleep(wait).await;
        }
    }

    /// Performs a single reverse lookup at country zoom.
    pub async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ReverseResponse, ResolutionError> {
        self.acquire_request().await;

        let url = self.config.reverse_url();
        log::debug!("Requesting '{url}' for lat: {latitude:.6}, lng: {longitude:.6}.");

        /* perform get-request */
        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", format!("{latitude:.6}")),
                ("lon", format!("{longitude:.6}")),
                ("format", "json".to_owned()),
                ("zoom", COUNTRY_ZOOM.to_owned()),
            ])
            .send()
            .await?;

        /* parse response */
        match response.status() {
            reqwest::StatusCode::OK => {
                let body = response.text().await?;
                Ok(serde_json::from_str(&body)?)
            }
            other => match response.text().await {
                Ok(val) => Err(ResolutionError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(val),
                }),
                Err(_) => Err(ResolutionError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn resolve(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CountryCode, ResolutionError> {
        let response = self.reverse(latitude, longitude).await?;
        response
            .country_code()
            .and_then(|code| CountryCode::new(code).ok())
            .ok_or(ResolutionError::NoCountry {
                latitude,
                longitude,
            })
    }
}
