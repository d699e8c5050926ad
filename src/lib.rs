//! Metrigen - Synthetic Telemetry Generator
//!
//! Generates a configurable population of Prometheus instruments (counters,
//! gauges, histograms, and native high-resolution histograms, some annotated
//! with exemplars) and mutates them on a fixed schedule, exposing the result
//! through a pull-based OpenMetrics endpoint. Intended to produce realistic,
//! reproducible load for testing metrics-collection pipelines.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │   Catalog    │───▶│  TickDriver  │    │  Exposition  │
//! │  (build once)│    │ (mutate each │    │   Server     │
//! │              │    │   interval)  │    │  (/metrics)  │
//! └──────────────┘    └──────────────┘    └──────────────┘
//!         │                                      ▲
//!         └───────── shared registry ────────────┘
//! ```
//!
//! # Modules
//!
//! - [`catalog`] - Instrument configuration and build-once catalog
//! - [`driver`] - Periodic mutation engine
//! - [`error`] - Error types
//! - [`exemplar`] - Exemplar label sets and random strings
//! - [`server`] - OpenMetrics exposition server

pub mod catalog;
pub mod driver;
pub mod error;
pub mod exemplar;
pub mod server;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogSpec, NativeHistogramSpec};
pub use driver::TickDriver;
pub use error::{Error, Result};
