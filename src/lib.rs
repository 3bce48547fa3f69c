pub mod api;
pub mod client;
pub mod config;
pub mod database;
pub mod gate;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;
pub mod utils;
