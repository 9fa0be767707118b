//! Utility functions and helpers.

pub mod format;
pub mod http;
pub mod url;
