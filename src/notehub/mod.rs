pub mod api_types;
pub mod cache;
pub mod client;
pub mod types;
pub mod validation;
