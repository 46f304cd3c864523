pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod seed;
pub mod services;
pub mod store;
pub mod utils;
pub mod workspace;

pub use config::AppConfig;
pub use store::SessionStore;
