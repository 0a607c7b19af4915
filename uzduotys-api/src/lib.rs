//! # Uzduotys API Server Library
//!
//! HTTP layer for the uzduotys to-do application.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and status pages
//! - `session`: Session cookie and current-user extractors
//! - `flash`: One-shot status messages between requests
//! - `views`: Minimal server-rendered HTML
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod flash;
pub mod routes;
pub mod session;
pub mod views;
