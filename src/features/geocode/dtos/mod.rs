pub mod geocode_dto;

pub use geocode_dto::{GeocodeReverseQuery, GeocodeSearchQuery, PlaceDto};
