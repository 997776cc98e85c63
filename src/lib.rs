pub mod config;
pub mod db;
pub mod enums;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod schema;
pub mod services;
pub mod state;
