//! Gradle build system integration
//!
//! Runs Gradle tasks through the project's wrapper in the android directory,
//! passing the typed [`BuildSettings`](crate::project::BuildSettings) down
//! as `-P` project properties.

use crate::project::{AndroidProject, BuildSettings};
use navcontrol_core::error::{Error, Result};
use navcontrol_core::process::{run_command_in_dir, CommandResult};

/// Resolve the platform's Gradle wrapper invocation
pub fn wrapper() -> &'static str {
    if cfg!(windows) {
        "gradlew.bat"
    } else {
        "./gradlew"
    }
}

/// Run a Gradle task in the project's android directory
pub fn run_task(
    project: &AndroidProject,
    task: &str,
    settings: &BuildSettings,
) -> Result<CommandResult> {
    let android_dir = project.android_dir();
    if !android_dir.join(wrapper().trim_start_matches("./")).exists() {
        return Err(Error::gradle(format!(
            "Gradle wrapper not found in {}",
            android_dir.display()
        ))
        .with_suggestion("Run from a Flutter project with an android/ host directory"));
    }

    let props = settings.gradle_properties();
    let mut args: Vec<&str> = vec![task];
    args.extend(props.iter().map(String::as_str));

    run_command_in_dir(wrapper(), &args, &android_dir)
}

/// Build the debug APK
pub fn assemble_debug(project: &AndroidProject, settings: &BuildSettings) -> Result<CommandResult> {
    run_task(project, "assembleDebug", settings)
}

/// Build the release APK
pub fn assemble_release(
    project: &AndroidProject,
    settings: &BuildSettings,
) -> Result<CommandResult> {
    run_task(project, "assembleRelease", settings)
}

/// Build the debug app bundle (AAB)
pub fn bundle_debug(project: &AndroidProject, settings: &BuildSettings) -> Result<CommandResult> {
    run_task(project, "bundleDebug", settings)
}

/// Build the release app bundle (AAB)
pub fn bundle_release(project: &AndroidProject, settings: &BuildSettings) -> Result<CommandResult> {
    run_task(project, "bundleRelease", settings)
}

/// Clean build artifacts
pub fn clean(project: &AndroidProject, settings: &BuildSettings) -> Result<CommandResult> {
    run_task(project, "clean", settings)
}
