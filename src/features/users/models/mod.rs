mod user;

pub use user::{Role, StoreProfile, User, UserRow, ROLE_BUYER, ROLE_LEGACY_PRODUCER, ROLE_SELLER};
