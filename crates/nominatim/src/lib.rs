use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use model::CountryCode;

pub mod cache;
pub mod client;
pub mod response;

pub use cache::CachedGeocoder;
pub use client::{NominatimClient, NominatimConfig};

/// Maps a position to the country it lies in.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn resolve(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CountryCode, ResolutionError>;
}

#[async_trait]
impl<G: ReverseGeocoder + ?Sized> ReverseGeocoder for Arc<G> {
    async fn resolve(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CountryCode, ResolutionError> {
        (**self).resolve(latitude, longitude).await
    }
}

/// Every way a single lookup can fail. None of them is fatal to a run.
#[derive(Debug, Clone)]
pub enum ResolutionError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    NoCountry {
        latitude: f64,
        longitude: f64,
    },
}

impl error::Error for ResolutionError {}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResolutionError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ResolutionError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ResolutionError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            ResolutionError::NoCountry {
                latitude,
                longitude,
            } => write!(
                f,
                "no country found for lat: {:.6}, lng: {:.6}",
                latitude, longitude
            ),
        }
    }
}

impl From<reqwest::Error> for ResolutionError {
    fn from(e: reqwest::Error) -> Self {
        ResolutionError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ResolutionError {
    fn from(e: serde_json::Error) -> Self {
        ResolutionError::JsonError(Arc::new(e))
    }
}
