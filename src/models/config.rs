//! Configuration model loaded from external sources.
use std::path::Path;

use serde::Deserialize;
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Validate)]
/// Defaults applied by the command line front end.
pub struct StoreConfig {
    /// Base for relative target directories.
    #[validate(length(min = 1))]
    pub upload_path: String,
    /// Create a missing target directory when saving.
    #[serde(default)]
    pub create_directories: bool,
    /// Replace existing files when saving.
    #[serde(default)]
    pub overwrite_files: bool,
}

impl StoreConfig {
    /// Directory creation policy for one call: an explicit flag wins over the
    /// configured default in either direction.
    pub fn create_directories_or(&self, flag: Option<bool>) -> bool {
        flag.unwrap_or(self.create_directories)
    }

    /// File replacement policy for one call, same precedence as
    /// [`StoreConfig::create_directories_or`].
    pub fn overwrite_files_or(&self, flag: Option<bool>) -> bool {
        flag.unwrap_or(self.overwrite_files)
    }

    /// Place a relative `directory` under `upload_path`. Absolute and blank
    /// values pass through untouched.
    pub fn directory_for(&self, directory: &str) -> String {
        let trimmed = directory.trim();
        if trimmed.is_empty() || Path::new(trimmed).is_absolute() {
            return directory.to_string();
        }

        Path::new(&self.upload_path)
            .join(trimmed)
            .to_string_lossy()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat};

    use super::*;

    fn from_yaml(yaml: &str) -> StoreConfig {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn flags_default_to_disabled() {
        let config = from_yaml("upload_path: ./upload");

        assert_eq!(config.upload_path, "./upload");
        assert!(!config.create_directories);
        assert!(!config.overwrite_files);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_upload_path_fails_validation() {
        let config = from_yaml("upload_path: \"\"\noverwrite_files: true");

        assert!(config.overwrite_files);
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_flags_override_config_both_ways() {
        let config = from_yaml("upload_path: ./upload\ncreate_directories: true");

        assert!(config.create_directories_or(None));
        assert!(!config.create_directories_or(Some(false)));
        assert!(!config.overwrite_files_or(None));
        assert!(config.overwrite_files_or(Some(true)));
    }

    #[test]
    fn relative_directories_land_under_upload_path() {
        let config = from_yaml("upload_path: /srv/upload");

        assert_eq!(config.directory_for("hub/7"), "/srv/upload/hub/7");
        assert_eq!(config.directory_for("/tmp/x"), "/tmp/x");
        assert_eq!(config.directory_for("  "), "  ");
    }
}
