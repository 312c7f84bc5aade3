pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod logging;
pub mod server;
pub mod shutdown;
