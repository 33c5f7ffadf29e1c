pub mod configuration;
pub mod http_client;
pub mod location;
pub mod non_empty_string;
pub mod tracing;
