pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod schema;
pub mod store;

pub use config::Config;
pub use error::{MacscopeError, Result};
pub use query::{query_in_box, summarize_mac, vendors_in_box};
pub use schema::BoundingBox;
