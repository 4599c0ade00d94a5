//! NavControl Android CLI
//!
//! Release build, artifact naming and environment checks for the NavControl
//! Flutter app's Android host.

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use navcontrol_android::keystore::KeystoreConfig;
use navcontrol_android::project::{AndroidProject, BuildSettings};
use navcontrol_android::{gradle, outputs};
use navcontrol_cli::output::{format_duration, format_size, Status};
use navcontrol_core::error::exit_codes;
use navcontrol_core::process::command_exists;
use navcontrol_core::version::FlutterVersion;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "navcontrol-android")]
#[command(about = "Release tooling for the NavControl Android app")]
#[command(version)]
struct Cli {
    /// Flutter project root
    #[arg(long, default_value = ".", global = true)]
    project_dir: PathBuf,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the Android app
    Build {
        /// Build configuration: debug, release
        #[arg(long, default_value = "debug")]
        configuration: String,
        /// Build an app bundle (AAB) instead of an APK
        #[arg(long)]
        bundle: bool,
        /// Clean before building
        #[arg(long)]
        clean: bool,
        /// Skip the release artifact rename step
        #[arg(long)]
        no_rename: bool,
    },

    /// Rename an existing build's release APKs
    Rename {
        /// Version name to embed (default: resolved from pubspec.yaml)
        #[arg(long)]
        version: Option<String>,
    },

    /// Print the app version resolved from pubspec.yaml
    Version,

    /// Diagnose the project and signing setup
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean build artifacts
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let exit_code = match cli.command {
        Commands::Build {
            configuration,
            bundle,
            clean,
            no_rename,
        } => run_build(&cli.project_dir, &configuration, bundle, clean, no_rename),
        Commands::Rename { version } => run_rename(&cli.project_dir, version.as_deref()),
        Commands::Version => run_version(&cli.project_dir),
        Commands::Doctor { json } => run_doctor(&cli.project_dir, json),
        Commands::Clean => run_clean(&cli.project_dir),
    };

    std::process::exit(exit_code);
}

fn open_project(project_dir: &std::path::Path) -> Option<(AndroidProject, BuildSettings)> {
    let project = match AndroidProject::open(project_dir) {
        Ok(p) => p,
        Err(e) => {
            Status::error(&format!("{}", e));
            return None;
        }
    };
    let settings = match BuildSettings::load(&project) {
        Ok(s) => s,
        Err(e) => {
            Status::error(&format!("{}", e));
            return None;
        }
    };
    Some((project, settings))
}

fn run_build(
    project_dir: &std::path::Path,
    configuration: &str,
    bundle: bool,
    clean: bool,
    no_rename: bool,
) -> i32 {
    let Some((project, settings)) = open_project(project_dir) else {
        return exit_codes::CONFIG_ERROR;
    };

    if configuration != "debug" && configuration != "release" {
        Status::error(&format!("Unknown configuration: {}", configuration));
        return exit_codes::VALIDATION_ERROR;
    }

    // Signing credentials are validated before Gradle runs so a broken
    // key.properties fails here, with the field named, not mid-build.
    if configuration == "release" {
        match KeystoreConfig::load(&project.key_properties_path()) {
            Ok(keystore) => {
                if let Err(e) = keystore.validate(&project.android_dir()) {
                    Status::error(&format!("{}", e));
                    return exit_codes::CONFIG_ERROR;
                }
            }
            Err(e) => {
                Status::error(&format!("{}", e));
                return exit_codes::CONFIG_ERROR;
            }
        }
    }

    if clean {
        Status::info("Cleaning...");
        if let Err(e) = gradle::clean(&project, &settings) {
            Status::error(&format!("Clean failed: {}", e));
            return exit_codes::FAILURE;
        }
    }

    Status::info(&format!(
        "Building {} {}...",
        configuration,
        if bundle { "bundle" } else { "APK" }
    ));

    let started = Instant::now();
    let result = if bundle {
        if configuration == "release" {
            gradle::bundle_release(&project, &settings)
        } else {
            gradle::bundle_debug(&project, &settings)
        }
    } else if configuration == "release" {
        gradle::assemble_release(&project, &settings)
    } else {
        gradle::assemble_debug(&project, &settings)
    };

    match result {
        Ok(r) if r.success => {
            Status::success(&format!("Build succeeded in {}", format_duration(started.elapsed())));
        }
        Ok(r) => {
            // Gradle reports many failures on stdout; replay both streams.
            Status::error("Build failed");
            eprintln!("{}", r.combined_output());
            return exit_codes::FAILURE;
        }
        Err(e) => {
            Status::error(&format!("Build error: {}", e));
            return exit_codes::FAILURE;
        }
    }

    if configuration == "release" && !bundle && !no_rename {
        return rename_outputs(&project, None);
    }

    exit_codes::SUCCESS
}

fn run_rename(project_dir: &std::path::Path, version: Option<&str>) -> i32 {
    let project = match AndroidProject::open(project_dir) {
        Ok(p) => p,
        Err(e) => {
            Status::error(&format!("{}", e));
            return exit_codes::CONFIG_ERROR;
        }
    };
    rename_outputs(&project, version)
}

fn rename_outputs(project: &AndroidProject, version: Option<&str>) -> i32 {
    let version_name = match version {
        Some(v) => v.to_string(),
        None => match FlutterVersion::from_pubspec(&project.pubspec_path()) {
            Ok(v) => v.name,
            Err(e) => {
                Status::error(&format!("{}", e));
                return exit_codes::FAILURE;
            }
        },
    };

    // The naming policy itself is pure; the clock is read exactly once here.
    let now = Local::now().naive_local();
    match outputs::rename_release_artifacts(project, &version_name, now) {
        Ok(renamed) if renamed.is_empty() => {
            Status::warning("No release APKs found to rename");
            exit_codes::SUCCESS
        }
        Ok(renamed) => {
            for artifact in &renamed {
                Status::success(&format!(
                    "{} ({})",
                    artifact.to.display(),
                    format_size(artifact.size)
                ));
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&format!("Rename failed: {}", e));
            exit_codes::FAILURE
        }
    }
}

fn run_version(project_dir: &std::path::Path) -> i32 {
    let project = match AndroidProject::open(project_dir) {
        Ok(p) => p,
        Err(e) => {
            Status::error(&format!("{}", e));
            return exit_codes::CONFIG_ERROR;
        }
    };

    match FlutterVersion::from_pubspec(&project.pubspec_path()) {
        Ok(version) => {
            println!("{}", version);
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&format!("{}", e));
            exit_codes::FAILURE
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: String,
    ok: bool,
    detail: String,
}

fn run_doctor(project_dir: &std::path::Path, json: bool) -> i32 {
    let mut checks = Vec::new();

    let project = AndroidProject::open(project_dir);
    checks.push(DoctorCheck {
        name: "project".to_string(),
        ok: project.is_ok(),
        detail: match &project {
            Ok(p) => p.root.display().to_string(),
            Err(e) => e.message.clone(),
        },
    });

    if let Ok(project) = &project {
        match BuildSettings::load(project) {
            Ok(settings) => checks.push(DoctorCheck {
                name: "build-settings".to_string(),
                ok: true,
                detail: format!(
                    "{} (compileSdk {}, jvmTarget {})",
                    settings.application_id, settings.compile_sdk, settings.jvm_target
                ),
            }),
            Err(e) => checks.push(DoctorCheck {
                name: "build-settings".to_string(),
                ok: false,
                detail: e.message.clone(),
            }),
        }

        match FlutterVersion::from_pubspec(&project.pubspec_path()) {
            Ok(version) => {
                let semver_note = if version.is_semver() {
                    String::new()
                } else {
                    " (not semver; embedded verbatim in artifact names)".to_string()
                };
                checks.push(DoctorCheck {
                    name: "version".to_string(),
                    ok: true,
                    detail: format!("{}{}", version, semver_note),
                });
            }
            Err(e) => checks.push(DoctorCheck {
                name: "version".to_string(),
                ok: false,
                detail: e.message.clone(),
            }),
        }

        let keystore = KeystoreConfig::load(&project.key_properties_path())
            .and_then(|k| k.validate(&project.android_dir()).map(|()| k));
        checks.push(DoctorCheck {
            name: "signing".to_string(),
            ok: keystore.is_ok(),
            detail: match &keystore {
                Ok(k) => format!("key alias '{}'", k.key_alias),
                Err(e) => e.message.clone(),
            },
        });

        let wrapper = project
            .android_dir()
            .join(gradle::wrapper().trim_start_matches("./"));
        checks.push(DoctorCheck {
            name: "gradle-wrapper".to_string(),
            ok: wrapper.exists(),
            detail: wrapper.display().to_string(),
        });
    }

    let has_java = command_exists("java");
    checks.push(DoctorCheck {
        name: "java".to_string(),
        ok: has_java,
        detail: if has_java {
            "found in PATH".to_string()
        } else {
            "not found in PATH (Gradle needs a JVM)".to_string()
        },
    });

    let healthy = checks.iter().all(|c| c.ok);

    if json {
        match serde_json::to_string_pretty(&checks) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                Status::error(&format!("Failed to render report: {}", e));
                return exit_codes::FAILURE;
            }
        }
    } else {
        Status::header("Environment Check");
        for check in &checks {
            if check.ok {
                Status::success(&format!("{}: {}", check.name, check.detail));
            } else {
                Status::error(&format!("{}: {}", check.name, check.detail));
            }
        }
    }

    if healthy {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILURE
    }
}

fn run_clean(project_dir: &std::path::Path) -> i32 {
    let Some((project, settings)) = open_project(project_dir) else {
        return exit_codes::CONFIG_ERROR;
    };

    Status::info("Cleaning...");
    match gradle::clean(&project, &settings) {
        Ok(r) if r.success => {
            Status::success("Clean complete");
            exit_codes::SUCCESS
        }
        Ok(r) => {
            Status::error("Clean failed");
            eprintln!("{}", r.combined_output());
            exit_codes::FAILURE
        }
        Err(e) => {
            Status::error(&format!("Clean error: {}", e));
            exit_codes::FAILURE
        }
    }
}
