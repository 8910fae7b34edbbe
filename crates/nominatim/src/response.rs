use serde::Deserialize;

/// Body of a `/reverse?format=json` lookup.
/// See <https://nominatim.org/release-docs/develop/api/Reverse/>
///
/// Positions without a result (e.g. open sea) come back as
/// `{"error": "Unable to geocode"}`, which leaves `address` empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReverseResponse {
    pub display_name: Option<String>,
    pub address: Option<Address>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    /// example: Deutschland
    pub country: Option<String>,

    /// ISO 3166-1 alpha-2, lower case.
    /// example: de
    pub country_code: Option<String>,
}

impl ReverseResponse {
    pub fn country_code(&self) -> Option<&str> {
        self.address
            .as_ref()
            .and_then(|address| address.country_code.as_deref())
            .filter(|code| !code.trim().is_empty())
    }
}
