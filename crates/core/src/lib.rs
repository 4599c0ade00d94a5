//! Core utilities for NavControl development tools
//!
//! This crate provides shared functionality used by the NavControl Android
//! tooling:
//!
//! - **Error handling**: Structured errors with codes, context, and recovery suggestions
//! - **Process execution**: Safe command execution with output capture
//! - **Properties files**: Parsing for Java-style `.properties` files (`key.properties`)
//! - **Version resolution**: Resolving the app version from `pubspec.yaml`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod process;
pub mod properties;
pub mod version;

pub use error::{Error, ErrorCode, Result, ResultExt};
