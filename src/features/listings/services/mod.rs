mod listing_service;
pub mod ranking;

pub use listing_service::{ListingService, SearchResults};
