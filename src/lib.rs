pub mod client;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod mapper;
pub mod models;
pub mod openapi;
pub mod placeholder;
pub mod repo;
pub mod routes;
pub mod settings; // env-driven server configuration
pub mod stats;

// Re-export commonly used items for tests / external users
pub use client::{IdeaApi, IdeasClient};
pub use routes::{config, AppState};
