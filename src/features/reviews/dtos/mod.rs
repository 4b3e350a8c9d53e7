pub mod review_dto;

pub use review_dto::{
    ReviewOutcome, ReviewResponseDto, StoreRatingDto, SubmitReviewDto, SubmitReviewResultDto,
};
