// src/lib.rs

//! SUITER feed client library
//!
//! Reaches the backend through an ordered chain of endpoints, degrades reads
//! to a static snapshot, and renders the feed as plain data.

pub mod error;
pub mod models;
pub mod pipeline;
#[cfg(feature = "proxy")]
pub mod proxy;
pub mod services;
pub mod telemetry;
pub mod utils;
pub mod view;
