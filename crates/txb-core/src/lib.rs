//! Core domain + application logic for the TwitterX relay bot.
//!
//! This crate is intentionally framework-agnostic. Telegram, the upstream post API and
//! Telegraph live behind ports (traits) implemented in adapter crates.

pub mod callback;
pub mod chain;
pub mod config;
pub mod context;
pub mod delivery;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod inline;
pub mod logging;
pub mod media;
pub mod messaging;
pub mod ports;
pub mod post;
pub mod service;
pub mod url_parser;

pub use errors::{Error, Result};
