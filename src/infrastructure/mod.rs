// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod credential_store;
pub mod csv_parser;
pub mod csv_source;
pub mod device_client;
pub mod synthetic;
