//! Java-style `.properties` file parsing
//!
//! The Android side of the project keeps its signing credentials in
//! `android/key.properties`, the plain `key=value` format that Gradle's
//! `java.util.Properties` reads. This module parses the subset that file
//! actually uses: one `key=value` pair per line, `#` or `!` comment lines,
//! blank lines, and surrounding whitespace trimmed. Later duplicates of a
//! key win, matching `Properties.load` behavior.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// A parsed properties file
#[derive(Debug, Clone, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Parse properties from a string
    pub fn parse_str(content: &str) -> Self {
        let mut values = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            // Only the first separator splits; values may contain '='.
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                values.insert(key.to_string(), value.trim().to_string());
            }
        }

        Self { values }
    }

    /// Load and parse a properties file from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::config_not_found(path));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(Self::parse_str(&content))
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Get a required value, failing with the field name if absent or empty
    pub fn require(&self, key: &str) -> Result<&str> {
        match self.get(key) {
            Some(value) if !value.is_empty() => Ok(value),
            Some(_) => Err(Error::config_field(key, "value is empty")),
            None => Err(Error::config_field(key, "missing required key")),
        }
    }

    /// Number of parsed entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the file contained no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic_pairs() {
        let props = Properties::parse_str("keyAlias=upload\nstorePassword=secret123\n");
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("storePassword"), Some("secret123"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = "# signing credentials\n\n! legacy comment\nkeyAlias=upload\n";
        let props = Properties::parse_str(content);
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let props = Properties::parse_str("  storeFile =  ../keys/upload.jks  \n");
        assert_eq!(props.get("storeFile"), Some("../keys/upload.jks"));
    }

    #[test]
    fn test_parse_value_containing_equals() {
        let props = Properties::parse_str("keyPassword=a=b=c\n");
        assert_eq!(props.get("keyPassword"), Some("a=b=c"));
    }

    #[test]
    fn test_parse_duplicate_keys_last_wins() {
        let props = Properties::parse_str("keyAlias=old\nkeyAlias=new\n");
        assert_eq!(props.get("keyAlias"), Some("new"));
    }

    #[test]
    fn test_require_missing_key() {
        let props = Properties::parse_str("keyAlias=upload\n");
        let err = props.require("storePassword").unwrap_err();
        assert!(err.message.contains("storePassword"));
    }

    #[test]
    fn test_require_empty_value() {
        let props = Properties::parse_str("keyAlias=\n");
        let err = props.require("keyAlias").unwrap_err();
        assert!(err.message.contains("keyAlias"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Properties::load(Path::new("/nonexistent/key.properties")).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.properties");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "keyAlias=upload").unwrap();
        writeln!(file, "keyPassword=secret").unwrap();

        let props = Properties::load(&path).unwrap();
        assert_eq!(props.require("keyAlias").unwrap(), "upload");
        assert_eq!(props.require("keyPassword").unwrap(), "secret");
    }
}
