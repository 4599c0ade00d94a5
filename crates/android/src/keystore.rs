//! Release signing configuration
//!
//! The app signs release builds with credentials kept out of the repository
//! in `android/key.properties`. Gradle reads that file as an untyped map and
//! fails at the first dereference when a key is missing; here the four
//! required fields are validated up front so a broken credentials file is
//! reported before a build is attempted, with the offending field named.

use navcontrol_core::error::{Error, Result, ResultExt};
use navcontrol_core::properties::Properties;
use std::fmt;
use std::path::{Path, PathBuf};

/// Keys required in `key.properties`, as Gradle spells them.
const KEY_ALIAS: &str = "keyAlias";
const KEY_PASSWORD: &str = "keyPassword";
const STORE_FILE: &str = "storeFile";
const STORE_PASSWORD: &str = "storePassword";

/// Typed release signing configuration
#[derive(Clone)]
pub struct KeystoreConfig {
    /// Alias of the signing key within the keystore
    pub key_alias: String,
    /// Password for the signing key
    pub key_password: String,
    /// Path to the keystore file, as written in `key.properties`
    /// (relative paths are resolved against the android directory)
    pub store_file: PathBuf,
    /// Password for the keystore
    pub store_password: String,
}

// Manual Debug: credentials must not leak into logs or error output.
impl fmt::Debug for KeystoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystoreConfig")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"<redacted>")
            .field("store_file", &self.store_file)
            .field("store_password", &"<redacted>")
            .finish()
    }
}

impl KeystoreConfig {
    /// Load and validate `key.properties`
    ///
    /// Fails fast when the file is missing or any of the four required keys
    /// is absent or empty.
    pub fn load(path: &Path) -> Result<Self> {
        let props = Properties::load(path)
            .with_suggestion(
                "Create android/key.properties with keyAlias, keyPassword, storeFile and storePassword",
            )?;
        Self::from_properties(&props)
            .context(format!("While loading {}", path.display()))
    }

    /// Build the config from already-parsed properties
    pub fn from_properties(props: &Properties) -> Result<Self> {
        Ok(Self {
            key_alias: props.require(KEY_ALIAS)?.to_string(),
            key_password: props.require(KEY_PASSWORD)?.to_string(),
            store_file: PathBuf::from(props.require(STORE_FILE)?),
            store_password: props.require(STORE_PASSWORD)?.to_string(),
        })
    }

    /// Resolve the keystore path against the android directory
    pub fn resolved_store_file(&self, android_dir: &Path) -> PathBuf {
        if self.store_file.is_absolute() {
            self.store_file.clone()
        } else {
            android_dir.join(&self.store_file)
        }
    }

    /// Check that the referenced keystore file exists
    pub fn validate(&self, android_dir: &Path) -> Result<()> {
        let store = self.resolved_store_file(android_dir);
        if !store.exists() {
            return Err(Error::config_field(
                STORE_FILE,
                format!("keystore does not exist: {}", store.display()),
            )
            .with_suggestion("Check the storeFile path in key.properties"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = "keyAlias=upload\nkeyPassword=kpass\nstoreFile=upload.jks\nstorePassword=spass\n";

    fn props(content: &str) -> Properties {
        Properties::parse_str(content)
    }

    #[test]
    fn test_from_properties_complete() {
        let config = KeystoreConfig::from_properties(&props(FULL)).unwrap();
        assert_eq!(config.key_alias, "upload");
        assert_eq!(config.key_password, "kpass");
        assert_eq!(config.store_file, PathBuf::from("upload.jks"));
        assert_eq!(config.store_password, "spass");
    }

    #[test]
    fn test_each_missing_field_is_named() {
        for field in ["keyAlias", "keyPassword", "storeFile", "storePassword"] {
            let content: String = FULL
                .lines()
                .filter(|line| !line.starts_with(field))
                .map(|line| format!("{line}\n"))
                .collect();
            let err = KeystoreConfig::from_properties(&props(&content)).unwrap_err();
            assert!(
                err.message.contains(field),
                "error for missing {field} should name it: {}",
                err.message
            );
        }
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let config = KeystoreConfig::from_properties(&props(FULL)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("kpass"));
        assert!(!rendered.contains("spass"));
        assert!(rendered.contains("upload"));
    }

    #[test]
    fn test_load_missing_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let err = KeystoreConfig::load(&dir.path().join("key.properties")).unwrap_err();
        assert_eq!(err.code, navcontrol_core::ErrorCode::ConfigNotFound);
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.properties");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let config = KeystoreConfig::load(&path).unwrap();
        assert_eq!(config.key_alias, "upload");
    }

    #[test]
    fn test_resolved_store_file_relative() {
        let config = KeystoreConfig::from_properties(&props(FULL)).unwrap();
        let resolved = config.resolved_store_file(Path::new("/proj/android"));
        assert_eq!(resolved, PathBuf::from("/proj/android/upload.jks"));
    }

    #[test]
    fn test_validate_missing_keystore() {
        let dir = tempfile::tempdir().unwrap();
        let config = KeystoreConfig::from_properties(&props(FULL)).unwrap();
        let err = config.validate(dir.path()).unwrap_err();
        assert!(err.message.contains("storeFile"));
    }

    #[test]
    fn test_validate_existing_keystore() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("upload.jks")).unwrap();
        let config = KeystoreConfig::from_properties(&props(FULL)).unwrap();
        assert!(config.validate(dir.path()).is_ok());
    }
}
