//! Rostrum - server-side rendering with live reload.
//!
//! This crate is the HTTP server around [`rostrum_engine`]. It loads the
//! render inputs (page template, server bundle, client manifest), serves
//! rendered pages, and outside production keeps those inputs hot: template
//! edits and compiler output are picked up while the server runs and
//! pushed to connected browsers over server-sent events.
//!
//! # Architecture
//!
//! - [`config`] - Layered configuration (defaults, `rostrum.toml`, env, CLI)
//! - [`error`] - Error types with actionable messages
//! - [`render`] - Render input store and per-request renderer factory
//! - [`http`] - Axum routes, static files and the reload event stream
//! - [`reload`] - Template watcher, compiler bridges and the coordinator
//! - [`logger`] - Structured logging with tracing

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod http;
pub mod logger;
pub mod reload;
pub mod render;

// Re-export commonly used types
pub use error::{Result, ResultExt, ServerError};
