pub mod review_handler;

pub use review_handler::{get_store_rating, list_store_reviews, submit_review};
