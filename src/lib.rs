pub mod api;
pub mod assessment;
pub mod config;
pub mod models;
