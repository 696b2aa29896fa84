//! # Analytics Badge Library
//!
//! Resolves a registered analytics property to its trailing-week users count
//! and renders it as an SVG status badge.
//!
//! Modules:
//! - `config`: service configuration, loading and validation
//! - `domain`: accounts, credentials and properties
//! - `store`: fast cache and durable store collaborators
//! - `oauth`: delegated authorization client
//! - `analytics`: analytics API client and metric fetcher
//! - `resolver`: two-tier metric resolution
//! - `badge`: badge layout and SVG rendering
//! - `web`: badge endpoint, sessions and account linking

pub mod analytics;
pub mod badge;
pub mod config;
pub mod domain;
pub mod error;
pub mod helpers;
pub mod oauth;
pub mod observability;
pub mod resolver;
pub mod server;
pub mod store;
pub mod tests;
pub mod utils;
pub mod web;


pub use crate::config::types::ServiceConfig;
pub use crate::error::{ErrorKind, ResolveError};
pub use crate::resolver::TieredCache;
