//! Project layout and build settings
//!
//! [`AndroidProject`] models the paths of the Flutter project this tooling
//! operates on. [`BuildSettings`] is the typed counterpart of the SDK and
//! language-level wiring in `android/app/build.gradle.kts`; values can be
//! overridden from an optional `navcontrol-tools.toml` at the project root
//! and are handed to Gradle as `-P` project properties.

use navcontrol_core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional settings file at the project root
pub const SETTINGS_FILE: &str = "navcontrol-tools.toml";

/// Paths of a Flutter project with an Android host
#[derive(Debug, Clone)]
pub struct AndroidProject {
    /// Flutter project root (the directory containing `pubspec.yaml`)
    pub root: PathBuf,
}

impl AndroidProject {
    /// Wrap a project root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open a project root, checking it looks like a Flutter project
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let project = Self::new(root);
        if !project.pubspec_path().exists() {
            return Err(Error::flutter(format!(
                "Not a Flutter project: {} has no pubspec.yaml",
                project.root.display()
            ))
            .with_suggestion("Run from the project root or pass --project-dir"));
        }
        Ok(project)
    }

    /// `pubspec.yaml` at the project root
    pub fn pubspec_path(&self) -> PathBuf {
        self.root.join("pubspec.yaml")
    }

    /// The Android host directory
    pub fn android_dir(&self) -> PathBuf {
        self.root.join("android")
    }

    /// Signing credentials file (`android/key.properties`)
    pub fn key_properties_path(&self) -> PathBuf {
        self.android_dir().join("key.properties")
    }

    /// Root of the app's build outputs
    pub fn outputs_dir(&self) -> PathBuf {
        self.root.join("build/app/outputs")
    }

    /// Directory Flutter writes APK outputs to
    pub fn apk_output_dir(&self) -> PathBuf {
        self.outputs_dir().join("flutter-apk")
    }

    /// Directory Gradle writes app bundle outputs to
    pub fn bundle_output_dir(&self) -> PathBuf {
        self.outputs_dir().join("bundle/release")
    }

    /// Optional tool settings file at the project root
    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }
}

/// Typed build settings mirrored into Gradle as `-P` properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildSettings {
    /// Android application id
    pub application_id: String,
    /// compileSdk level
    pub compile_sdk: u8,
    /// minSdk level
    pub min_sdk: u8,
    /// targetSdk level
    pub target_sdk: u8,
    /// Java/Kotlin language level (jvmTarget and source/target compatibility)
    pub jvm_target: u8,
    /// Whether core library desugaring is enabled
    pub core_library_desugaring: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            application_id: "com.example.navcontrol_app".to_string(),
            compile_sdk: 35,
            min_sdk: 23,
            target_sdk: 35,
            jvm_target: 17,
            core_library_desugaring: true,
        }
    }
}

impl BuildSettings {
    /// Load settings for a project
    ///
    /// Reads `navcontrol-tools.toml` at the project root when present,
    /// defaults otherwise.
    pub fn load(project: &AndroidProject) -> Result<Self> {
        let path = project.settings_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::io(format!("Failed to read {}: {}", path.display(), e)))?;
        let settings: Self = toml::from_str(&content).map_err(|e| {
            Error::config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check internal consistency of the SDK levels
    pub fn validate(&self) -> Result<()> {
        if self.application_id.is_empty() {
            return Err(Error::config_field("application-id", "must not be empty"));
        }
        if self.min_sdk > self.target_sdk {
            return Err(Error::config_field(
                "min-sdk",
                format!("{} exceeds target-sdk {}", self.min_sdk, self.target_sdk),
            ));
        }
        if self.target_sdk > self.compile_sdk {
            return Err(Error::config_field(
                "target-sdk",
                format!("{} exceeds compile-sdk {}", self.target_sdk, self.compile_sdk),
            ));
        }
        Ok(())
    }

    /// Render as Gradle `-P` project property arguments
    pub fn gradle_properties(&self) -> Vec<String> {
        vec![
            format!("-PapplicationId={}", self.application_id),
            format!("-PcompileSdk={}", self.compile_sdk),
            format!("-PminSdk={}", self.min_sdk),
            format!("-PtargetSdk={}", self.target_sdk),
            format!("-PjvmTarget={}", self.jvm_target),
            format!("-PcoreLibraryDesugaring={}", self.core_library_desugaring),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_project_paths() {
        let project = AndroidProject::new("/work/navcontrol_app");
        assert_eq!(
            project.key_properties_path(),
            PathBuf::from("/work/navcontrol_app/android/key.properties")
        );
        assert_eq!(
            project.apk_output_dir(),
            PathBuf::from("/work/navcontrol_app/build/app/outputs/flutter-apk")
        );
    }

    #[test]
    fn test_open_rejects_non_flutter_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AndroidProject::open(dir.path()).is_err());
    }

    #[test]
    fn test_open_accepts_flutter_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("pubspec.yaml")).unwrap();
        assert!(AndroidProject::open(dir.path()).is_ok());
    }

    #[test]
    fn test_default_settings_match_app_build() {
        let settings = BuildSettings::default();
        assert_eq!(settings.application_id, "com.example.navcontrol_app");
        assert_eq!(settings.jvm_target, 17);
        assert!(settings.core_library_desugaring);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("pubspec.yaml")).unwrap();
        let project = AndroidProject::new(dir.path());
        assert_eq!(BuildSettings::load(&project).unwrap(), BuildSettings::default());
    }

    #[test]
    fn test_load_overrides_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join(SETTINGS_FILE)).unwrap();
        writeln!(file, "application-id = \"com.navcontrol.fleet\"").unwrap();
        writeln!(file, "min-sdk = 26").unwrap();

        let settings = BuildSettings::load(&AndroidProject::new(dir.path())).unwrap();
        assert_eq!(settings.application_id, "com.navcontrol.fleet");
        assert_eq!(settings.min_sdk, 26);
        // Unspecified fields keep their defaults.
        assert_eq!(settings.jvm_target, 17);
    }

    #[test]
    fn test_validate_sdk_ordering() {
        let settings = BuildSettings {
            min_sdk: 36,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_gradle_properties_rendering() {
        let args = BuildSettings::default().gradle_properties();
        assert!(args.contains(&"-PjvmTarget=17".to_string()));
        assert!(args.contains(&"-PcompileSdk=35".to_string()));
    }
}
