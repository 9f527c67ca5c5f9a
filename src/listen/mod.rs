// src/listen/mod.rs

//! Socket ownership and connection acceptance.
//!
//! This module is responsible for:
//! - Binding the Unix socket and removing its file again on close
//!   ([`listener`]).
//! - Running the accept loop on its own task and handing each accepted
//!   connection to the execution loop through a single-slot channel
//!   ([`stream`]).
//!
//! It does **not** know what a connection triggers; it only turns accepts
//! into [`ConnectionEvent`]s.

pub mod listener;
pub mod stream;

pub use listener::{bind, SocketListener};
pub use stream::{
    accept_stream, ConnectionEvent, ConnectionStream, ACCEPT_ERROR_BACKOFF, HANDOFF_CAPACITY,
};
