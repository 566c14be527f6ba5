//! Runtime configuration for `dashctl`.
//!
//! Settings resolve in three layers: built-in defaults, then an optional TOML
//! file, then command-line flags. The [`Config`] struct is the single source of
//! truth once resolved, independent of where each value came from.
//!
//! ```toml
//! items_per_page = 25
//! search_fields = ["name", "email", "phone"]
//! date_field = "listed_at"
//! debounce_ms = 300
//! columns = ["id", "address", "status", "listed_at"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::{ListArgs, TargetArgs};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Config`].
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A page must hold at least one record.
    #[error("items_per_page must be at least 1")]
    ZeroItemsPerPage,

    /// Nothing would be searched.
    #[error("search_fields must name at least one field")]
    NoSearchFields,

    /// The table would have no columns.
    #[error("columns must name at least one field")]
    NoColumns,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Records per page.
    pub items_per_page: usize,

    /// Fields the free-text search looks at, in order.
    pub search_fields: Vec<String>,

    /// Field tested by the date-range filter.
    pub date_field: String,

    /// Quiet period before typed numeric input is committed, in milliseconds.
    pub debounce_ms: u64,

    /// Fields shown as table columns.
    pub columns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            items_per_page: dashkit::paginator::DEFAULT_ITEMS_PER_PAGE,
            search_fields: vec!["name".to_string(), "email".to_string()],
            date_field: dashkit::filter::DEFAULT_DATE_FIELD.to_string(),
            debounce_ms: 500,
            columns: ["id", "name", "status", "created_at"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path` over the defaults, or returns the defaults when `path` is
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, does not parse, or
    /// holds invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        config.validate()?;
        Ok(config)
    }

    /// Checks value constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items_per_page == 0 {
            return Err(ConfigError::ZeroItemsPerPage);
        }
        if self.search_fields.is_empty() {
            return Err(ConfigError::NoSearchFields);
        }
        if self.columns.is_empty() {
            return Err(ConfigError::NoColumns);
        }
        Ok(())
    }

    /// Applies `list` flags on top of this config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a flag sets an invalid value.
    pub fn with_list_args(mut self, args: &ListArgs) -> Result<Self, ConfigError> {
        if let Some(n) = args.per_page {
            self.items_per_page = n;
        }
        if let Some(fields) = &args.fields {
            self.search_fields.clone_from(fields);
        }
        if let Some(field) = &args.date_field {
            self.date_field.clone_from(field);
        }
        if let Some(columns) = &args.columns {
            self.columns.clone_from(columns);
        }
        self.validate()?;
        Ok(self)
    }

    /// Applies `target` flags on top of this config.
    #[must_use]
    pub fn with_target_args(mut self, args: &TargetArgs) -> Self {
        if let Some(ms) = args.debounce_ms {
            self.debounce_ms = ms;
        }
        self
    }

    /// Returns the debounce window.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.items_per_page, 10);
        assert_eq!(config.search_fields, vec!["name", "email"]);
        assert_eq!(config.date_field, "created_at");
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.columns.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_without_path_is_default() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_load_partial_file_keeps_other_defaults() {
        let file = write_config("items_per_page = 25\ndate_field = \"listed_at\"\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.items_per_page, 25);
        assert_eq!(config.date_field, "listed_at");
        assert_eq!(config.search_fields, vec!["name", "email"]);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let file = write_config("items_per_page = 0\n");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroItemsPerPage));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let file = write_config("page_size = 5\n");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("here.toml"));
    }

    #[test]
    fn test_flags_override_file() {
        let args = ListArgs {
            per_page: Some(3),
            columns: Some(vec!["id".to_string()]),
            ..ListArgs::default()
        };
        let config = Config::default().with_list_args(&args).unwrap();
        assert_eq!(config.items_per_page, 3);
        assert_eq!(config.columns, vec!["id"]);

        let args = ListArgs {
            per_page: Some(0),
            ..ListArgs::default()
        };
        assert!(Config::default().with_list_args(&args).is_err());
    }

    #[test]
    fn test_target_override() {
        let args = TargetArgs {
            current: 0.0,
            ceiling: 1.0,
            step: None,
            debounce_ms: Some(5),
        };
        let config = Config::default().with_target_args(&args);
        assert_eq!(config.debounce(), Duration::from_millis(5));
    }
}
