pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod services;
pub mod state;
