//! Android release tooling for the NavControl app
//!
//! This crate provides the Android-specific functionality:
//! - Release artifact naming policy
//! - Signing keystore configuration (`key.properties`)
//! - Project layout and build settings
//! - Gradle build integration
//! - Build-output discovery and renaming

#![warn(missing_docs)]

pub mod gradle;
pub mod keystore;
pub mod naming;
pub mod outputs;
pub mod project;
