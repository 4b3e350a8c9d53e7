mod review;

pub use review::{Review, MAX_RATING, MIN_RATING};
