// Application layer - Use cases and the seams they depend on
pub mod acquisition_service;
pub mod credential_store;
pub mod history_service;
pub mod history_source;
pub mod reading_strategy;
pub mod refresh_scheduler;
