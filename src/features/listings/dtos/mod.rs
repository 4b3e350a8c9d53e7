pub mod listing_dto;

pub use listing_dto::{
    CreateListingDto, ListingResponseDto, SearchQuery, SearchResponseDto,
};
