// src/config/mod.rs

//! Startup configuration for execod.
//!
//! Responsibilities:
//! - Define the resolved configuration values (`model.rs`).
//! - Resolve them once from CLI flags and environment (`loader.rs`).
//! - Validate basic invariants like a usable socket path (`validate.rs`).
//!
//! Components never read the environment themselves; they receive a
//! [`DaemonConfig`] (or the parts of it they need) from the caller.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    from_args, from_env, DEFAULT_SOCKET_PATH, LOG_LEVEL_ENV, SOCKET_ENV,
};
pub use model::{CommandSpec, DaemonConfig, RawDaemonConfig};
