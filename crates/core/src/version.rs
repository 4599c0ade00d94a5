//! App version resolution from `pubspec.yaml`
//!
//! The Android build consumes a version name and version code that the
//! Flutter toolchain derives from the `version:` line of `pubspec.yaml`
//! (`version: 1.2.0+7` means name `1.2.0`, code `7`). This module performs
//! the same resolution so the tooling can name artifacts without invoking
//! Flutter.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static VERSION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^version:\s*(\S+)\s*$").unwrap());

/// Default when pubspec.yaml carries no version line, matching Flutter.
const DEFAULT_VERSION: &str = "1.0.0";
const DEFAULT_CODE: u32 = 1;

/// Resolved application version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlutterVersion {
    /// Version name embedded in artifact names (e.g. "1.2.0")
    pub name: String,
    /// Android versionCode (the `+N` suffix)
    pub code: u32,
}

impl FlutterVersion {
    /// Parse a pubspec `version:` value such as `1.2.0+7`
    ///
    /// A missing `+N` suffix defaults the code to 1. The name part is kept
    /// verbatim; artifact naming embeds whatever string is configured.
    pub fn parse(value: &str) -> Result<Self> {
        let (name, code) = match value.split_once('+') {
            Some((name, code)) => {
                let code = code.parse::<u32>().map_err(|_| {
                    Error::flutter(format!("Invalid build number in version '{}'", value))
                        .with_suggestion("Use the form <name>+<number>, e.g. 1.2.0+7")
                })?;
                (name, code)
            }
            None => (value, DEFAULT_CODE),
        };

        if name.is_empty() {
            return Err(Error::flutter(format!("Empty version name in '{}'", value)));
        }

        Ok(Self {
            name: name.to_string(),
            code,
        })
    }

    /// Resolve the version from a `pubspec.yaml` file
    ///
    /// A pubspec without a `version:` line resolves to Flutter's default
    /// `1.0.0+1` rather than failing the build.
    pub fn from_pubspec(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path)
                .with_context("Resolving app version from pubspec.yaml"));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read {}: {}", path.display(), e)))?;

        match VERSION_LINE.captures(&content) {
            Some(caps) => Self::parse(&caps[1]),
            None => Ok(Self {
                name: DEFAULT_VERSION.to_string(),
                code: DEFAULT_CODE,
            }),
        }
    }

    /// Whether the version name is valid semver
    ///
    /// Diagnostic only; nothing in the build path rejects non-semver names.
    pub fn is_semver(&self) -> bool {
        semver::Version::parse(&self.name).is_ok()
    }
}

impl std::fmt::Display for FlutterVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.name, self.code)
    }
}
