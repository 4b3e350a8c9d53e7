use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::GeocodeConfig;
use crate::core::error::{AppError, Result};
use crate::features::geocode::dtos::PlaceDto;
use crate::shared::constants::{MAX_GEOCODE_LIMIT, MIN_GEOCODE_QUERY_LEN};

/// Nominatim API response structure
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
    pub address: Option<NominatimAddress>,
}

/// Nominatim address components
#[derive(Debug, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country_code: Option<String>,
}

impl NominatimAddress {
    /// Get city, falling back to town or village
    pub fn get_city(&self) -> Option<String> {
        self.city
            .clone()
            .or_else(|| self.town.clone())
            .or_else(|| self.village.clone())
    }
}

impl From<NominatimPlace> for PlaceDto {
    fn from(place: NominatimPlace) -> Self {
        let address = place.address.as_ref();
        Self {
            lat: place.lat.parse().ok(),
            lon: place.lon.parse().ok(),
            city: address.and_then(|a| a.get_city()),
            state: address.and_then(|a| a.state.clone()),
            postcode: address.and_then(|a| a.postcode.clone()),
            country_code: address.and_then(|a| a.country_code.clone()),
            display_name: place.display_name,
        }
    }
}

/// The upstream geocoder as the core sees it. The HTTP client behind it is
/// replaceable in tests.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<PlaceDto>>;
    async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<PlaceDto>>;
}

/// Nominatim-backed provider with a bounded request timeout
pub struct NominatimProvider {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimProvider {
    pub fn new(config: &GeocodeConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(&config.user_agent)
                .timeout(config.timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl GeocodeProvider for NominatimProvider {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<PlaceDto>> {
        let url = format!(
            "{}/search?q={}&format=jsonv2&addressdetails=1&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );
        tracing::debug!("Geocode search: {} -> {}", query, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalService(format!("Nominatim request failed: {}", e))
        })?;
        if !response.status().is_success() {
            tracing::warn!("Nominatim returned status: {}", response.status());
            return Ok(Vec::new());
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse Nominatim response: {}", e))
        })?;
        Ok(places.into_iter().map(PlaceDto::from).collect())
    }

    async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<PlaceDto>> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=jsonv2&zoom=14&addressdetails=1",
            self.base_url, lat, lon
        );
        tracing::debug!("Geocode reverse: ({}, {}) -> {}", lat, lon, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalService(format!("Nominatim request failed: {}", e))
        })?;
        if !response.status().is_success() {
            tracing::warn!("Nominatim returned status: {}", response.status());
            return Ok(None);
        }

        let place: NominatimPlace = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse Nominatim response: {}", e))
        })?;
        Ok(Some(place.into()))
    }
}

/// Service proxying the geocoding collaborator.
///
/// Upstream failure or timeout degrades to an empty result instead of
/// failing the enclosing request.
pub struct GeocodeService {
    provider: Arc<dyn GeocodeProvider>,
}

impl GeocodeService {
    pub fn new(provider: Arc<dyn GeocodeProvider>) -> Self {
        Self { provider }
    }

    pub async fn search(&self, query: &str, limit: u32) -> Vec<PlaceDto> {
        let query = query.trim();
        if query.chars().count() < MIN_GEOCODE_QUERY_LEN {
            return Vec::new();
        }
        let limit = limit.clamp(1, MAX_GEOCODE_LIMIT);

        match self.provider.search(query, limit).await {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!("Geocode search degraded to empty result: {e}");
                Vec::new()
            }
        }
    }

    pub async fn reverse(&self, lat: f64, lon: f64) -> Option<PlaceDto> {
        match self.provider.reverse(lat, lon).await {
            Ok(place) => place,
            Err(e) => {
                tracing::warn!("Geocode reverse degraded to empty result: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubProvider {
        fail: bool,
        called: AtomicBool,
    }

    impl StubProvider {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                called: AtomicBool::new(false),
            }
        }

        fn place(name: &str) -> PlaceDto {
            PlaceDto {
                display_name: name.to_string(),
                lat: Some(15.4989),
                lon: Some(73.8278),
                city: Some("Panjim".to_string()),
                state: None,
                postcode: None,
                country_code: Some("in".to_string()),
            }
        }
    }

    #[async_trait]
    impl GeocodeProvider for StubProvider {
        async fn search(&self, _query: &str, _limit: u32) -> Result<Vec<PlaceDto>> {
            self.called.store(true, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::ExternalService("upstream timed out".to_string()));
            }
            Ok(vec![Self::place("Panjim, Goa")])
        }

        async fn reverse(&self, _lat: f64, _lon: f64) -> Result<Option<PlaceDto>> {
            self.called.store(true, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::ExternalService("upstream timed out".to_string()));
            }
            Ok(Some(Self::place("Panjim, Goa")))
        }
    }

    #[tokio::test]
    async fn short_queries_skip_the_provider() {
        let provider = Arc::new(StubProvider::new(false));
        let service = GeocodeService::new(provider.clone());

        assert!(service.search("p", 8).await.is_empty());
        assert!(service.search("  ", 8).await.is_empty());
        assert!(!provider.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_empty() {
        let provider = Arc::new(StubProvider::new(true));
        let service = GeocodeService::new(provider.clone());

        assert!(service.search("panjim", 8).await.is_empty());
        assert!(service.reverse(15.49, 73.82).await.is_none());
        assert!(provider.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn successful_lookups_pass_through() {
        let service = GeocodeService::new(Arc::new(StubProvider::new(false)));

        let places = service.search("panjim", 8).await;
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].city.as_deref(), Some("Panjim"));

        let place = service.reverse(15.49, 73.82).await.unwrap();
        assert_eq!(place.display_name, "Panjim, Goa");
    }

    #[test]
    fn nominatim_city_falls_back_to_town_and_village() {
        let addr = NominatimAddress {
            city: None,
            town: Some("Mapusa".to_string()),
            village: None,
            state: None,
            postcode: None,
            country_code: None,
        };
        assert_eq!(addr.get_city(), Some("Mapusa".to_string()));

        let addr = NominatimAddress {
            city: None,
            town: None,
            village: Some("Assagao".to_string()),
            state: None,
            postcode: None,
            country_code: None,
        };
        assert_eq!(addr.get_city(), Some("Assagao".to_string()));
    }

    #[test]
    fn nominatim_coordinates_parse_into_floats() {
        let place = NominatimPlace {
            lat: "15.4989".to_string(),
            lon: "not-a-number".to_string(),
            display_name: "Panjim".to_string(),
            address: None,
        };
        let dto: PlaceDto = place.into();
        assert_eq!(dto.lat, Some(15.4989));
        assert_eq!(dto.lon, None);
    }
}
