//! Configuration management for the portal API.
//!
//! Parses `portal.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Programmatic settings can be applied during load via [`Overrides`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `portal.name`
//! - `portal.default_site`
//! - `identifiers.debug_pattern`

mod expand;

use std::path::{Path, PathBuf};

use portal_ident::SiteId;
use portal_model::Range;
use serde::Deserialize;

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Override portal container name.
    pub name: Option<String>,
    /// Override default site name.
    pub default_site: Option<String>,
    /// Override default page size.
    pub default_limit: Option<u32>,
    /// Override maximum page size.
    pub max_limit: Option<u32>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "portal.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Portal configuration.
    pub portal: PortalConfig,
    /// Identifier formatting configuration.
    pub identifiers: IdentifiersConfig,
    /// Query configuration.
    pub query: QueryConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Portal configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Portal container name.
    pub name: String,
    /// Site opened when a request names none.
    pub default_site: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            name: "portal".to_owned(),
            default_site: "classic".to_owned(),
        }
    }
}

/// Identifier formatting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IdentifiersConfig {
    /// Pattern for human-readable site labels, with `{kind}` and
    /// `{payload}` placeholders.
    pub debug_pattern: String,
}

impl Default for IdentifiersConfig {
    fn default() -> Self {
        Self {
            debug_pattern: "{kind}:{payload}".to_owned(),
        }
    }
}

/// Query configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size when a query names none.
    pub default_limit: u32,
    /// Largest page size a query may request.
    pub max_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: 15,
            max_limit: 1000,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`portal.default_site`").
        field: String,
        /// Error message (e.g., "${`PORTAL_SITE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `portal.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// Overrides are applied after loading and take precedence over file
    /// values. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&Overrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(name) = &overrides.name {
            self.portal.name.clone_from(name);
        }
        if let Some(default_site) = &overrides.default_site {
            self.portal.default_site.clone_from(default_site);
        }
        if let Some(default_limit) = overrides.default_limit {
            self.query.default_limit = default_limit;
        }
        if let Some(max_limit) = overrides.max_limit {
            self.query.max_limit = max_limit;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        Self::discover_config_from(&std::env::current_dir().ok()?)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_portal()?;
        self.validate_identifiers()?;
        self.validate_query()?;
        Ok(())
    }

    fn validate_portal(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.portal.name, "portal.name")?;
        require_non_empty(&self.portal.default_site, "portal.default_site")?;
        self.default_site()?;
        Ok(())
    }

    fn validate_identifiers(&self) -> Result<(), ConfigError> {
        let sample = SiteId::site("classic")
            .map_err(|e| ConfigError::Validation(format!("identifiers.debug_pattern: {e}")))?;
        self.debug_label(&sample)?;
        Ok(())
    }

    fn validate_query(&self) -> Result<(), ConfigError> {
        let QueryConfig {
            default_limit,
            max_limit,
        } = self.query;

        if default_limit == 0 {
            return Err(ConfigError::Validation(
                "query.default_limit must be greater than 0".to_owned(),
            ));
        }
        if max_limit < default_limit {
            return Err(ConfigError::Validation(format!(
                "query.max_limit ({max_limit}) cannot be less than query.default_limit ({default_limit})"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.portal.name = expand::expand_env(&self.portal.name, "portal.name")?;
        self.portal.default_site =
            expand::expand_env(&self.portal.default_site, "portal.default_site")?;
        self.identifiers.debug_pattern =
            expand::expand_env(&self.identifiers.debug_pattern, "identifiers.debug_pattern")?;
        Ok(())
    }

    /// Identifier of the default site.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `portal.default_site` is not a
    /// valid site name.
    pub fn default_site(&self) -> Result<SiteId, ConfigError> {
        SiteId::site(self.portal.default_site.as_str())
            .map_err(|e| ConfigError::Validation(format!("portal.default_site: {e}")))
    }

    /// Pagination window for a query, using the configured default limit
    /// and capping the requested limit at the configured maximum.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the effective limit is zero.
    pub fn range(&self, offset: u32, limit: Option<u32>) -> Result<Range, ConfigError> {
        let limit = limit
            .unwrap_or(self.query.default_limit)
            .min(self.query.max_limit);
        Range::of(offset, limit).map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Human-readable label of `site` using `identifiers.debug_pattern`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the pattern is malformed.
    pub fn debug_label(&self, site: &SiteId) -> Result<String, ConfigError> {
        site.format_with(Some(&self.identifiers.debug_pattern))
            .map_err(|e| ConfigError::Validation(format!("identifiers.debug_pattern: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.portal.name, "portal");
        assert_eq!(config.portal.default_site, "classic");
        assert_eq!(config.identifiers.debug_pattern, "{kind}:{payload}");
        assert_eq!(config.query.default_limit, 15);
        assert_eq!(config.query.max_limit, 1000);
        assert!(config.config_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.portal.name, "portal");
        assert_eq!(config.query.default_limit, 15);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[portal]
name = "intranet"
default_site = "acme"

[identifiers]
debug_pattern = "<{kind}> {payload}"

[query]
default_limit = 20
max_limit = 200
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.portal.name, "intranet");
        assert_eq!(config.default_site().unwrap(), SiteId::site("acme").unwrap());
        assert_eq!(config.query.default_limit, 20);
        assert_eq!(config.query.max_limit, 200);
        assert_eq!(
            config.debug_label(&SiteId::site("acme").unwrap()).unwrap(),
            "<site> acme"
        );
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        config.apply_overrides(&Overrides {
            default_site: Some("mobile".to_owned()),
            max_limit: Some(50),
            ..Default::default()
        });
        assert_eq!(config.portal.name, "portal");
        assert_eq!(config.portal.default_site, "mobile");
        assert_eq!(config.query.default_limit, 15);
        assert_eq!(config.query.max_limit, 50);
    }

    #[test]
    fn test_apply_overrides_empty() {
        let mut config = Config::default();
        config.apply_overrides(&Overrides::default());
        assert_eq!(config.portal.default_site, "classic");
        assert_eq!(config.query.max_limit, 1000);
    }

    #[test]
    fn test_range_uses_defaults_and_caps() {
        let config = Config::default();
        let range = config.range(30, None).unwrap();
        assert_eq!((range.offset(), range.limit()), (30, 15));
        assert_eq!(range.page(), 2);
        assert_eq!(config.range(0, Some(5000)).unwrap().limit(), 1000);
        assert!(config.range(0, Some(0)).is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PORTAL_CONFIG_TEST_SITE", "acme");
        }

        let toml = r#"
[portal]
default_site = "${PORTAL_CONFIG_TEST_SITE}"
name = "${PORTAL_CONFIG_TEST_NAME_UNSET:-portal}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.portal.default_site, "acme");
        assert_eq!(config.portal.name, "portal");

        unsafe {
            std::env::remove_var("PORTAL_CONFIG_TEST_SITE");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PORTAL_CONFIG_TEST_MISSING");
        }

        let toml = r#"
[identifiers]
debug_pattern = "${PORTAL_CONFIG_TEST_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("PORTAL_CONFIG_TEST_MISSING"));
        assert!(err.to_string().contains("identifiers.debug_pattern"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_empty_name() {
        let mut config = Config::default();
        config.portal.name = String::new();
        assert_validation_error(&config, &["portal.name", "cannot be empty"]);
    }

    #[test]
    fn test_validate_empty_default_site() {
        let mut config = Config::default();
        config.portal.default_site = String::new();
        assert_validation_error(&config, &["portal.default_site"]);
    }

    #[test]
    fn test_validate_debug_pattern_missing_payload() {
        let mut config = Config::default();
        config.identifiers.debug_pattern = "{kind}".to_owned();
        assert_validation_error(&config, &["identifiers.debug_pattern"]);
    }

    #[test]
    fn test_validate_debug_pattern_unknown_placeholder() {
        let mut config = Config::default();
        config.identifiers.debug_pattern = "{kind}:{payload}:{page}".to_owned();
        assert_validation_error(&config, &["identifiers.debug_pattern"]);
    }

    #[test]
    fn test_validate_zero_default_limit() {
        let mut config = Config::default();
        config.query.default_limit = 0;
        assert_validation_error(&config, &["query.default_limit", "greater than 0"]);
    }

    #[test]
    fn test_validate_max_below_default() {
        let mut config = Config::default();
        config.query.max_limit = 10;
        assert_validation_error(&config, &["query.max_limit", "query.default_limit"]);
    }

    #[test]
    fn test_validate_max_equal_default_passes() {
        let mut config = Config::default();
        config.query.max_limit = 15;
        assert!(config.validate().is_ok());
    }

    // File tests

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[portal]\ndefault_site = \"acme\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.portal.default_site, "acme");
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_applies_and_validates_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[query]\nmax_limit = 100\n").unwrap();

        let overrides = Overrides {
            default_limit: Some(500),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[query]\ndefault_limit = \"many\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sites").join("classic");
        std::fs::create_dir_all(&nested).unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        assert_eq!(Config::discover_config_from(&nested), Some(path));
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sites");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        let nearest = nested.join(CONFIG_FILENAME);
        std::fs::write(&nearest, "").unwrap();

        assert_eq!(Config::discover_config_from(&nested), Some(nearest));
    }
}
