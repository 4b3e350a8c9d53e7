pub mod listing_handler;

pub use listing_handler::{
    create_listing, get_listing, list_store_listings, search_listings, ListingState,
};
