//! Geospatial constants and the geocoded-location type.

/// Mean Earth radius in miles, used by the radius search.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// A location resolved by the geocoding collaborator.
///
/// Produced by the API layer's geocoder client and consumed by the
/// bootcamp repository when persisting location columns.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
}
