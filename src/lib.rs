#![recursion_limit = "256"]

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pricing;
pub mod router;
pub mod service;
pub mod types;

pub use config::Config;
pub use db::QuoteStorage;
pub use error::QuoteError;
pub use service::QuoteService;
