//! Release artifact naming policy
//!
//! Release APKs are renamed to `NavControl_v<version>_<yyyyMMdd_HHmm>.apk`
//! so distributed builds sort chronologically and identify themselves at a
//! glance. Only the `release` build type is renamed; debug and profile
//! outputs keep whatever name the build produced.
//!
//! The timestamp is a parameter rather than a clock read so the policy is a
//! pure function. Build-time callers pass `Local::now().naive_local()`;
//! tests pass fixed values. Granularity is one minute: two release builds of
//! the same version within the same clock-minute produce the same name.
//! That collision window is a known property of the naming convention, kept
//! for compatibility with existing artifact archives.

use chrono::NaiveDateTime;

/// Build type that triggers renaming (exact, case-sensitive match)
pub const RELEASE_BUILD_TYPE: &str = "release";

/// Product prefix embedded in release artifact names
pub const ARTIFACT_PREFIX: &str = "NavControl";

/// One artifact produced by a build variant
///
/// `file_name` starts as whatever the build assigned and is overwritten by
/// [`VariantOutput::apply_release_name`] at most once, and only for the
/// release build type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantOutput {
    /// Build type that produced this output (e.g. "release", "debug")
    pub build_type: String,
    /// Version name of the build, embedded verbatim in the artifact name
    pub version_name: String,
    /// Current file name of the artifact
    pub file_name: String,
}

impl VariantOutput {
    /// Create an output for a variant
    pub fn new(
        build_type: impl Into<String>,
        version_name: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            build_type: build_type.into(),
            version_name: version_name.into(),
            file_name: file_name.into(),
        }
    }

    /// Whether this output belongs to the release build type
    pub fn is_release(&self) -> bool {
        self.build_type == RELEASE_BUILD_TYPE
    }

    /// Apply the release naming policy
    ///
    /// Assigns `NavControl_v<version>_<timestamp>.apk` as the file name iff
    /// the build type is exactly `release`. Any other build type is left
    /// untouched. Returns whether the name was assigned.
    pub fn apply_release_name(&mut self, timestamp: NaiveDateTime) -> bool {
        if !self.is_release() {
            return false;
        }
        self.file_name = release_file_name(&self.version_name, timestamp);
        true
    }
}

/// Format a timestamp as `yyyyMMdd_HHmm`
///
/// Always exactly 13 characters: 8 digits, an underscore, 4 digits.
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y%m%d_%H%M").to_string()
}

/// Construct a release artifact file name
///
/// The version name is embedded verbatim; no format validation is applied.
pub fn release_file_name(version_name: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{}_v{}_{}.apk",
        ARTIFACT_PREFIX,
        version_name,
        format_timestamp(timestamp)
    )
}
