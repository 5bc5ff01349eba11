//! Snaplink - a small URL shortener
//!
//! Hands out short random codes for long URLs, redirects them back, and
//! remembers which visitor created which code.
//!
//! # Architecture
//! - `storage`: storage contract and backends (memory, append-only file, SQL)
//! - `services`: short-code encoding with bounded collision retry
//! - `api`: HTTP handlers, identity cookie and middleware
//! - `config`: configuration loading
//! - `runtime`: server startup
//! - `system`: logging

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
