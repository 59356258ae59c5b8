//! Geocoding collaborator.
//!
//! The radius search and bootcamp creation resolve postal addresses to
//! coordinates. The provider is consumed through the narrow [`Geocoder`]
//! trait and injected via `AppState`, so handlers never reach for an
//! ambient client.

use async_trait::async_trait;
use serde::Deserialize;

use campdex_core::geo::GeoLocation;

/// Errors from the geocoding layer.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Geocoding provider error ({status}): {body}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider had no match for the address.
    #[error("No geocoding result for `{0}`")]
    NoResults(String),
}

/// Resolves free-form addresses (or zipcodes) to locations.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodeError>;
}

/// Geocoder backed by the MapQuest geocoding API.
pub struct MapQuestGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MapQuestGeocoder {
    /// Create a new client for the MapQuest geocoding endpoint.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MapQuestResponse {
    results: Vec<MapQuestResult>,
}

#[derive(Debug, Deserialize)]
struct MapQuestResult {
    locations: Vec<MapQuestLocation>,
}

#[derive(Debug, Deserialize)]
struct MapQuestLocation {
    #[serde(rename = "latLng")]
    lat_lng: MapQuestLatLng,
    street: Option<String>,
    /// City.
    #[serde(rename = "adminArea5")]
    admin_area_5: Option<String>,
    /// State.
    #[serde(rename = "adminArea3")]
    admin_area_3: Option<String>,
    #[serde(rename = "postalCode")]
    postal_code: Option<String>,
    /// Country.
    #[serde(rename = "adminArea1")]
    admin_area_1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MapQuestLatLng {
    lat: f64,
    lng: f64,
}

#[async_trait]
impl Geocoder for MapQuestGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoLocation, GeocodeError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("location", address),
                ("maxResults", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MapQuestResponse = response.json().await?;
        let location = parsed
            .results
            .into_iter()
            .flat_map(|r| r.locations)
            .next()
            .ok_or_else(|| GeocodeError::NoResults(address.to_string()))?;

        // MapQuest signals an unmatched address with a (0, 0) location
        // rather than an empty result list.
        if location.lat_lng.lat == 0.0 && location.lat_lng.lng == 0.0 {
            return Err(GeocodeError::NoResults(address.to_string()));
        }

        let formatted_address = {
            let parts: Vec<&str> = [
                location.street.as_deref(),
                location.admin_area_5.as_deref(),
                location.admin_area_3.as_deref(),
                location.postal_code.as_deref(),
            ]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        };

        Ok(GeoLocation {
            latitude: location.lat_lng.lat,
            longitude: location.lat_lng.lng,
            formatted_address,
            street: location.street,
            city: location.admin_area_5,
            state: location.admin_area_3,
            zipcode: location.postal_code,
            country: location.admin_area_1,
        })
    }
}
