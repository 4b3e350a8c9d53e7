pub mod store_handler;

pub use store_handler::{create_user, get_store, list_stores, update_store};
