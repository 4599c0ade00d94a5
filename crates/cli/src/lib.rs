//! CLI utilities for NavControl development tools
//!
//! Shared terminal output helpers used by the tool binaries.

#![warn(missing_docs)]

pub mod output;
