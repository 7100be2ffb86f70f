// Domain layer - Readings and historical climate data
pub mod history;
pub mod reading;
