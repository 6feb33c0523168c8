//! Configuration management for inkpost.
//!
//! Parses `inkpost.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `local.path`
//! - `rest.base_url`
//! - `rest.api_key`
//! - `rest.table`

mod expand;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override storage backend.
    pub backend: Option<StoreBackend>,
    /// Override local store file path.
    pub local_path: Option<PathBuf>,
    /// Override excerpt length.
    pub excerpt_length: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "inkpost.toml";

/// Default local store path, relative to the config directory.
const DEFAULT_LOCAL_PATH: &str = ".inkpost/posts.json";

/// Default excerpt length in characters.
const DEFAULT_EXCERPT_LENGTH: usize = 160;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage backend selection.
    pub store: StoreConfig,
    /// Local store configuration (paths are relative strings from TOML).
    local: LocalConfigRaw,
    /// REST data API configuration (optional section).
    pub rest: Option<RestConfig>,
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Resolved local store configuration (set after loading).
    #[serde(skip)]
    pub local_resolved: LocalConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Post storage backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON key-value file on local disk.
    #[default]
    Local,
    /// Hosted REST data API.
    Rest,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "rest" => Ok(Self::Rest),
            other => Err(format!(
                "unknown store backend '{other}', expected 'local' or 'rest'"
            )),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Rest => "rest",
        })
    }
}

/// Store section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Which backend holds the posts.
    pub backend: StoreBackend,
}

/// Raw local store configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LocalConfigRaw {
    path: Option<String>,
}

/// Resolved local store configuration with absolute paths.
#[derive(Debug, Default)]
pub struct LocalConfig {
    /// Key-value file holding the posts.
    pub path: PathBuf,
}

/// REST data API configuration.
#[derive(Debug, Deserialize)]
pub struct RestConfig {
    /// Project base URL.
    pub base_url: String,
    /// Publishable API key.
    pub api_key: String,
    /// Table holding the posts.
    #[serde(default = "default_table")]
    pub table: String,
}

impl RestConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "rest.base_url")?;
        require_http_url(&self.base_url, "rest.base_url")?;
        require_non_empty(&self.api_key, "rest.api_key")?;
        require_non_empty(&self.table, "rest.table")?;
        Ok(())
    }
}

fn default_table() -> String {
    "posts".to_owned()
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum excerpt length in characters.
    pub excerpt_length: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
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
        /// Config field path (e.g., "`rest.api_key`").
        field: String,
        /// Error message (e.g., "${`INKPOST_API_KEY`} not set").
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

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `inkpost.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate_render()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(backend) = settings.backend {
            self.store.backend = backend;
        }
        if let Some(local_path) = &settings.local_path {
            self.local_resolved.path.clone_from(local_path);
        }
        if let Some(excerpt_length) = settings.excerpt_length {
            self.render.excerpt_length = excerpt_length;
        }
    }

    /// Get validated REST configuration.
    ///
    /// Use this instead of accessing the `rest` field directly when the
    /// command talks to the data API.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_rest(&self) -> Result<&RestConfig, ConfigError> {
        let rest = self
            .rest
            .as_ref()
            .ok_or_else(|| ConfigError::Validation("[rest] section required in config".into()))?;
        rest.validate()?;
        Ok(rest)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            store: StoreConfig::default(),
            local: LocalConfigRaw::default(),
            rest: None,
            render: RenderConfig::default(),
            local_resolved: LocalConfig {
                path: base.join(DEFAULT_LOCAL_PATH),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The `[rest]` section is only checked when it is the selected backend.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        if self.store.backend == StoreBackend::Rest {
            self.require_rest()?;
        }
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        if self.render.excerpt_length == 0 {
            return Err(ConfigError::Validation(
                "render.excerpt_length must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.local.path {
            self.local.path = Some(expand::expand_env(path, "local.path")?);
        }

        if let Some(ref mut rest) = self.rest {
            rest.base_url = expand::expand_env(&rest.base_url, "rest.base_url")?;
            rest.api_key = expand::expand_env(&rest.api_key, "rest.api_key")?;
            rest.table = expand::expand_env(&rest.table, "rest.table")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.local_resolved = LocalConfig {
            path: config_dir.join(self.local.path.as_deref().unwrap_or(DEFAULT_LOCAL_PATH)),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.store.backend, StoreBackend::Local);
        assert_eq!(
            config.local_resolved.path,
            PathBuf::from("/test/.inkpost/posts.json")
        );
        assert_eq!(config.render.excerpt_length, 160);
        assert!(config.rest.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.store.backend, StoreBackend::Local);
        assert_eq!(config.render.excerpt_length, 160);
    }

    #[test]
    fn test_parse_rest_config() {
        let toml = r#"
[store]
backend = "rest"

[rest]
base_url = "https://project.supabase.co"
api_key = "publishable"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Rest);
        let rest = config.rest.unwrap();
        assert_eq!(rest.base_url, "https://project.supabase.co");
        assert_eq!(rest.api_key, "publishable");
        assert_eq!(rest.table, "posts");
    }

    #[test]
    fn test_parse_unknown_backend_fails() {
        let toml = r#"
[store]
backend = "sqlite"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("local".parse::<StoreBackend>(), Ok(StoreBackend::Local));
        assert_eq!("rest".parse::<StoreBackend>(), Ok(StoreBackend::Rest));
        assert!("s3".parse::<StoreBackend>().unwrap_err().contains("s3"));
        assert_eq!(StoreBackend::Rest.to_string(), "rest");
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[local]
path = "data/posts.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.local_resolved.path,
            PathBuf::from("/project/data/posts.json")
        );
    }

    #[test]
    fn test_resolve_paths_default_local_path() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.local_resolved.path,
            PathBuf::from("/project/.inkpost/posts.json")
        );
    }

    #[test]
    fn test_apply_cli_settings_backend() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            backend: Some(StoreBackend::Rest),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.store.backend, StoreBackend::Rest);
        assert_eq!(config.render.excerpt_length, 160); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_local_path() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            local_path: Some(PathBuf::from("/tmp/posts.json")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.local_resolved.path, PathBuf::from("/tmp/posts.json"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let config_before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.store.backend, config_before.store.backend);
        assert_eq!(config.local_resolved.path, config_before.local_resolved.path);
        assert_eq!(
            config.render.excerpt_length,
            config_before.render.excerpt_length
        );
    }

    #[test]
    fn test_expand_env_vars_rest() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_INKPOST_URL", "https://project.test.co");
            std::env::set_var("TEST_INKPOST_KEY", "my-key");
        }

        let toml = r#"
[rest]
base_url = "${TEST_INKPOST_URL}"
api_key = "${TEST_INKPOST_KEY}"
table = "${TEST_INKPOST_TABLE:-articles}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        let rest = config.rest.unwrap();
        assert_eq!(rest.base_url, "https://project.test.co");
        assert_eq!(rest.api_key, "my-key");
        assert_eq!(rest.table, "articles");

        unsafe {
            std::env::remove_var("TEST_INKPOST_URL");
            std::env::remove_var("TEST_INKPOST_KEY");
        }
    }

    #[test]
    fn test_expand_env_vars_local_path() {
        let toml = r#"
[local]
path = "${TEST_INKPOST_UNSET_DIR:-store}/posts.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.local_resolved.path,
            PathBuf::from("/project/store/posts.json")
        );
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_VAR_INKPOST_CONFIG_TEST");
        }

        let toml = r#"
[rest]
base_url = "https://project.supabase.co"
api_key = "${MISSING_VAR_INKPOST_CONFIG_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_VAR_INKPOST_CONFIG_TEST"));
        assert!(err.to_string().contains("rest.api_key"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(result: Result<(), ConfigError>, expected_substrings: &[&str]) {
        let err = result.expect_err("Expected validation to fail");
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

    fn valid_rest_config() -> RestConfig {
        RestConfig {
            base_url: "https://project.supabase.co".to_owned(),
            api_key: "key".to_owned(),
            table: "posts".to_owned(),
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_excerpt_length_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.render.excerpt_length = 0;
        assert_validation_error(config.validate(), &["excerpt_length", "greater than 0"]);
    }

    #[test]
    fn test_validate_rest_backend_requires_section() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.store.backend = StoreBackend::Rest;
        assert_validation_error(config.validate(), &["[rest]"]);
    }

    #[test]
    fn test_validate_local_backend_ignores_rest_section() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.rest = Some(RestConfig {
            api_key: String::new(),
            ..valid_rest_config()
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rest_config_validate_valid() {
        assert!(valid_rest_config().validate().is_ok());
    }

    #[test]
    fn test_rest_config_validate_empty_key() {
        let config = RestConfig {
            api_key: String::new(),
            ..valid_rest_config()
        };
        assert_validation_error(config.validate(), &["api_key", "empty"]);
    }

    #[test]
    fn test_rest_config_validate_invalid_url() {
        let config = RestConfig {
            base_url: "project.supabase.co".to_owned(),
            ..valid_rest_config()
        };
        assert_validation_error(config.validate(), &["base_url", "http"]);
    }

    #[test]
    fn test_require_rest_returns_validated() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.rest = Some(valid_rest_config());
        assert_eq!(config.require_rest().unwrap().table, "posts");
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/inkpost.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("inkpost.toml");
        std::fs::write(
            &path,
            r#"
[local]
path = "posts.json"

[render]
excerpt_length = 80
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.local_resolved.path, temp_dir.path().join("posts.json"));
        assert_eq!(config.render.excerpt_length, 80);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_applies_cli_settings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("inkpost.toml");
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            excerpt_length: Some(40),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.render.excerpt_length, 40);
    }

    #[test]
    fn test_load_rejects_zero_excerpt_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("inkpost.toml");
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            excerpt_length: Some(0),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("inkpost.toml");
        std::fs::write(&path, "[store\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
