//! Telegraph adapter: publishes overflowing post text as a telegra.ph article.

pub mod client;
pub mod converter;
pub mod errors;
pub mod models;
pub mod service;

pub use client::{HttpTelegraphClient, TelegraphApi};
pub use errors::TelegraphError;
pub use service::TelegraphService;
