//! dagreach-core library.
//!
//! SCC condensation of directed graphs and exact reachability ratios of the
//! resulting DAGs.
//!
//! # Conventions
//!
//! - **Errors**: algorithm failures are [`GraphError`]; file and config
//!   loading use `anyhow::Result` with the path in context.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//!   The library never installs a subscriber.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod reach;

pub use error::{ErrorCode, GraphError};
