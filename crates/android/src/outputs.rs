//! Build-output discovery and on-disk renaming
//!
//! Gradle leaves release APKs under `build/app/outputs/apk/release` and the
//! Flutter tool copies them to `build/app/outputs/flutter-apk`. This module
//! finds release APKs in either layout and applies the naming policy from
//! [`crate::naming`] to the files on disk. Debug and profile outputs are
//! never touched.

use crate::naming::{VariantOutput, RELEASE_BUILD_TYPE};
use crate::project::AndroidProject;
use chrono::NaiveDateTime;
use navcontrol_core::error::{Error, Result};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Suffix Gradle gives release APK outputs (`app-release.apk` etc.)
const RELEASE_APK_SUFFIX: &str = "-release.apk";

/// One artifact renamed on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamedArtifact {
    /// Path before renaming
    pub from: PathBuf,
    /// Path after renaming
    pub to: PathBuf,
    /// Size of the artifact in bytes
    pub size: u64,
}

/// Find release APKs under the project's build outputs
///
/// Matches files ending in `-release.apk` anywhere under
/// `build/app/outputs`, covering both the Gradle and Flutter output layouts.
/// A project that has not been built yields an empty list.
pub fn find_release_apks(project: &AndroidProject) -> Result<Vec<PathBuf>> {
    let outputs = project.outputs_dir();
    if !outputs.exists() {
        return Ok(Vec::new());
    }

    let mut apks = Vec::new();
    for entry in WalkDir::new(&outputs).follow_links(false) {
        let entry = entry.map_err(|e| {
            Error::io(format!("Failed to scan {}: {}", outputs.display(), e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(RELEASE_APK_SUFFIX) {
            apks.push(entry.into_path());
        }
    }

    apks.sort();
    Ok(apks)
}

/// Apply the release naming policy to the APKs of a finished build
///
/// Every discovered release APK is renamed in place to
/// `NavControl_v<version>_<timestamp>.apk`. Renames are planned up front:
/// the artifact name carries only the version and the minute, so sibling
/// release APKs in one directory (a split-per-abi build) all map to the same
/// target, and a stale artifact from an earlier run in the same minute may
/// already carry it. Either case aborts with a validation error before any
/// file is touched; a plain `fs::rename` would overwrite the first artifact
/// with the second. Returns the renames performed.
pub fn rename_release_artifacts(
    project: &AndroidProject,
    version_name: &str,
    timestamp: NaiveDateTime,
) -> Result<Vec<RenamedArtifact>> {
    let mut planned: Vec<(PathBuf, PathBuf)> = Vec::new();

    for path in find_release_apks(project)? {
        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut output =
            VariantOutput::new(RELEASE_BUILD_TYPE, version_name, original_name.clone());
        if !output.apply_release_name(timestamp) {
            continue;
        }
        if output.file_name == original_name {
            continue;
        }

        let target = path.with_file_name(&output.file_name);
        if target.exists() || planned.iter().any(|(_, t)| *t == target) {
            return Err(Error::validation(format!(
                "Release name collision: renaming {} would overwrite {}",
                path.display(),
                target.display()
            ))
            .with_suggestion(
                "The artifact name has one-minute granularity; remove stale artifacts or build a single universal APK instead of split-per-abi outputs",
            ));
        }
        planned.push((path, target));
    }

    let mut renamed = Vec::with_capacity(planned.len());
    for (from, to) in planned {
        std::fs::rename(&from, &to).map_err(|e| {
            Error::io(format!(
                "Failed to rename {} to {}: {}",
                from.display(),
                to.display(),
                e
            ))
        })?;

        let size = std::fs::metadata(&to).map(|m| m.len()).unwrap_or(0);
        renamed.push(RenamedArtifact { from, to, size });
    }

    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::Path;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 0)
            .unwrap()
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"apk-bytes").unwrap();
    }

    #[test]
    fn test_find_in_unbuilt_project() {
        let dir = tempfile::tempdir().unwrap();
        let project = AndroidProject::new(dir.path());
        assert!(find_release_apks(&project).unwrap().is_empty());
    }

    #[test]
    fn test_find_covers_both_layouts() {
        let dir = tempfile::tempdir().unwrap();
        let project = AndroidProject::new(dir.path());
        touch(&project.apk_output_dir().join("app-release.apk"));
        touch(&project.outputs_dir().join("apk/release/app-release.apk"));
        touch(&project.apk_output_dir().join("app-debug.apk"));

        let apks = find_release_apks(&project).unwrap();
        assert_eq!(apks.len(), 2);
        assert!(apks.iter().all(|p| p.ends_with("app-release.apk")));
    }

    #[test]
    fn test_rename_release_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let project = AndroidProject::new(dir.path());
        let original = project.apk_output_dir().join("app-release.apk");
        touch(&original);

        let renamed = rename_release_artifacts(&project, "1.2.0", ts()).unwrap();
        assert_eq!(renamed.len(), 1);
        assert_eq!(
            renamed[0].to,
            project
                .apk_output_dir()
                .join("NavControl_v1.2.0_20240305_1407.apk")
        );
        assert!(!original.exists());
        assert!(renamed[0].to.exists());
        assert_eq!(renamed[0].size, 9);
    }

    #[test]
    fn test_rename_leaves_debug_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let project = AndroidProject::new(dir.path());
        let debug = project.apk_output_dir().join("app-debug.apk");
        touch(&debug);

        let renamed = rename_release_artifacts(&project, "1.2.0", ts()).unwrap();
        assert!(renamed.is_empty());
        assert!(debug.exists());
    }

    #[test]
    fn test_rename_is_idempotent_within_a_minute() {
        let dir = tempfile::tempdir().unwrap();
        let project = AndroidProject::new(dir.path());
        touch(&project.apk_output_dir().join("app-release.apk"));

        let first = rename_release_artifacts(&project, "1.2.0", ts()).unwrap();
        assert_eq!(first.len(), 1);

        // Second pass finds no *-release.apk files left to rename.
        let second = rename_release_artifacts(&project, "1.2.0", ts()).unwrap();
        assert!(second.is_empty());
        assert!(first[0].to.exists());
    }

    #[test]
    fn test_split_abi_outputs_are_rejected_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let project = AndroidProject::new(dir.path());
        let arm64 = project.apk_output_dir().join("app-arm64-v8a-release.apk");
        let armv7 = project.apk_output_dir().join("app-armeabi-v7a-release.apk");
        touch(&arm64);
        touch(&armv7);

        // Both map to the same target name; the run must abort with no
        // renames rather than report two successes with one survivor.
        let err = rename_release_artifacts(&project, "1.2.0", ts()).unwrap_err();
        assert_eq!(err.code, navcontrol_core::ErrorCode::ValidationError);
        assert!(arm64.exists());
        assert!(armv7.exists());
    }

    #[test]
    fn test_stale_artifact_with_target_name_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let project = AndroidProject::new(dir.path());
        let stale = project
            .apk_output_dir()
            .join("NavControl_v1.2.0_20240305_1407.apk");
        touch(&stale);
        touch(&project.apk_output_dir().join("app-release.apk"));

        let err = rename_release_artifacts(&project, "1.2.0", ts()).unwrap_err();
        assert_eq!(err.code, navcontrol_core::ErrorCode::ValidationError);
        assert!(stale.exists());
        assert!(project.apk_output_dir().join("app-release.apk").exists());
    }

    #[test]
    fn test_rename_embeds_version_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let project = AndroidProject::new(dir.path());
        touch(&project.apk_output_dir().join("app-release.apk"));

        let renamed = rename_release_artifacts(&project, "2.0.0-rc.1", ts()).unwrap();
        assert_eq!(
            renamed[0].to.file_name().unwrap().to_string_lossy(),
            "NavControl_v2.0.0-rc.1_20240305_1407.apk"
        );
    }

    #[test]
    fn test_worked_example_matches_convention() {
        assert_eq!(
            crate::naming::release_file_name("1.2.0", ts()),
            "NavControl_v1.2.0_20240305_1407.apk"
        );
    }
}
