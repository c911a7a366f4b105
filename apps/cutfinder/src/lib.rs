//! # cutfinder
//!
//! CLI and HTTP surfaces over `cutfinder-core`.
//!
//! - `cli` → clap commands (`find`, `check`, `gates`, `server`)
//! - `api` → axum router, auth and rate limiting
//! - `config` → TOML configuration and circuit file loading

pub mod api;
pub mod cli;
pub mod config;
