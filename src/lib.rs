//! Library crate for user-console.
//!
//! This crate exposes the building blocks of the TUI:
//! - HTTP client for the reqres users API and its request dispatcher (`api`)
//! - Application state, screen controllers and the update loop (`app`)
//! - Command-line configuration (`config`)
//! - Error and result types (`error`)
//! - Tracing setup (`logging`)
//! - In-memory search helpers (`search`)
//! - Session token persistence (`session`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `user-console` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod search;
pub mod session;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
