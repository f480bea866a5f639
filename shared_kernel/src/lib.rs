pub mod configuration;
pub mod eastern_date_time;
pub mod http_client;
pub mod tracing;
