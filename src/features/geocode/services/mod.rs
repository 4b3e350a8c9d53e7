mod geocode_service;

pub use geocode_service::{GeocodeProvider, GeocodeService, NominatimProvider};
