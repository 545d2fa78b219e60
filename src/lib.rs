pub mod config;
pub mod error;
pub mod events;
pub mod services;
pub mod utils;
