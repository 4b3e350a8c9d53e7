use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for geocode search
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct GeocodeSearchQuery {
    /// Free-form place query; shorter than 2 characters returns an empty list
    pub q: Option<String>,
    /// Maximum number of candidates, default 8
    pub limit: Option<u32>,
}

/// Query parameters for reverse geocoding
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct GeocodeReverseQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// A resolved place candidate
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlaceDto {
    pub display_name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country_code: Option<String>,
}
