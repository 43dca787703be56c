//! Filigree - invisible image watermarking
//!
//! Service and orchestration layer around the `qim-mark` core: image I/O,
//! lossy re-encode simulation, the secure-compute boundary, the evaluation
//! pipeline and the HTTP surface.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
