pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod views;

pub use error::GatehouseError;
pub use router::{AppState, gatehouse_router};
