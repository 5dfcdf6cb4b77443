//! Project configuration (`apidoc.toml`) parsing and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::url::{UrlResolver, DEFAULT_EXTERNAL_URL};

/// Name of the configuration file looked up in a project root.
pub const CONFIG_FILE: &str = "apidoc.toml";

/// Errors that can occur when loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// The complete apidoc.toml configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocConfig {
    pub project: ProjectSection,

    #[serde(default)]
    pub source: SourceSection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub links: LinksSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    /// Title shown on every page.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSection {
    /// Directories or files whose class-likes are documented.
    #[serde(default = "default_paths")]
    pub paths: Vec<PathBuf>,

    /// Glob patterns, relative to the project root.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Sources resolved for linking but not documented.
    #[serde(default)]
    pub reference: Vec<PathBuf>,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            exclude: Vec::new(),
            reference: Vec::new(),
        }
    }
}

fn default_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("src")]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Prefix of every generated link.
    #[serde(default)]
    pub base_url: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            base_url: String::new(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("docs")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinksSection {
    /// Namespaces linked to the external manual like the global one.
    #[serde(default)]
    pub builtin_namespaces: Vec<String>,

    /// External link template containing `{name}`.
    #[serde(default = "default_external_url")]
    pub external_url: String,
}

impl Default for LinksSection {
    fn default() -> Self {
        Self {
            builtin_namespaces: Vec::new(),
            external_url: default_external_url(),
        }
    }
}

fn default_external_url() -> String {
    DEFAULT_EXTERNAL_URL.to_string()
}

impl DocConfig {
    /// A configuration with defaults for everything but the name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            project: ProjectSection { name: name.into() },
            source: SourceSection::default(),
            output: OutputSection::default(),
            links: LinksSection::default(),
        }
    }

    /// Load a configuration from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.name.trim().is_empty() {
            return Err(ConfigError::invalid("project.name", "name cannot be empty"));
        }
        if self.source.paths.is_empty() {
            return Err(ConfigError::invalid(
                "source.paths",
                "at least one source path is required",
            ));
        }
        if !self.links.external_url.contains("{name}") {
            return Err(ConfigError::invalid(
                "links.external_url",
                format!("`{}` has no {{name}} placeholder", self.links.external_url),
            ));
        }
        self.exclude_patterns()?;
        Ok(())
    }

    /// Compiled `source.exclude` patterns.
    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>, ConfigError> {
        self.source
            .exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern)
                    .map_err(|e| ConfigError::invalid("source.exclude", format!("`{pattern}`: {e}")))
            })
            .collect()
    }

    /// Link resolver configured from `output` and `links`.
    #[must_use]
    pub fn url_resolver(&self) -> UrlResolver {
        UrlResolver::new(self.output.base_url.clone())
            .with_builtin_namespaces(self.links.builtin_namespaces.iter().cloned())
            .with_external_url(self.links.external_url.clone())
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = DocConfig::parse("[project]\nname = \"Acme\"\n").unwrap();
        assert_eq!(config.project.name, "Acme");
        assert_eq!(config.source.paths, vec![PathBuf::from("src")]);
        assert_eq!(config.output.dir, PathBuf::from("docs"));
        assert_eq!(config.links.external_url, DEFAULT_EXTERNAL_URL);
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
[project]
name = "My Library"

[source]
paths = ["lib", "src"]
exclude = ["**/Tests/**"]
reference = ["vendor/acme"]

[output]
dir = "build/api"
base_url = "/api/"

[links]
builtin_namespaces = ["Random", "Dom"]
external_url = "https://docs.example/{name}"
"#;
        let config = DocConfig::parse(toml).unwrap();
        assert_eq!(config.source.paths.len(), 2);
        assert_eq!(config.source.reference, vec![PathBuf::from("vendor/acme")]);
        assert_eq!(config.output.base_url, "/api/");
        let urls = config.url_resolver();
        assert_eq!(
            urls.resolve("Random\\Randomizer", "Random", false).as_deref(),
            Some("https://docs.example/random-randomizer")
        );
        assert_eq!(
            urls.resolve("App\\Box", "App", true).as_deref(),
            Some("/api/classes/app/box.html")
        );
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = DocConfig::parse("[project]\nname = \"Acme\"\ntheme = \"dark\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_values() {
        let empty = DocConfig::parse("[project]\nname = \" \"\n");
        assert!(matches!(empty, Err(ConfigError::Invalid { field: "project.name", .. })));

        let no_paths = DocConfig::parse("[project]\nname = \"A\"\n[source]\npaths = []\n");
        assert!(matches!(no_paths, Err(ConfigError::Invalid { field: "source.paths", .. })));

        let url = DocConfig::parse("[project]\nname = \"A\"\n[links]\nexternal_url = \"x\"\n");
        assert!(matches!(url, Err(ConfigError::Invalid { field: "links.external_url", .. })));

        let glob = DocConfig::parse("[project]\nname = \"A\"\n[source]\nexclude = [\"[\"]\n");
        assert!(matches!(glob, Err(ConfigError::Invalid { field: "source.exclude", .. })));
    }

    #[test]
    fn test_serialized_config_parses_back() {
        let config = DocConfig::new("Acme");
        let text = config.to_toml_string().unwrap();
        assert_eq!(DocConfig::parse(&text).unwrap(), config);
    }
}
