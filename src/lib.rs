pub mod app;
pub mod background;
pub mod config;
pub mod details;
pub mod error;
pub mod fetch_state;
pub mod links;
pub mod models;
pub mod pool;
pub mod sampler;
pub mod session;
pub mod tmdb;
pub mod view;
