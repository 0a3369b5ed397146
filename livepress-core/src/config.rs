//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Main configuration struct matching config.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub profession: String,
    pub description: String,
    pub blog_name: String,

    #[serde(default = "default_url")]
    pub url: String,

    /// Prefix for "view source" links; the post's root-relative path is appended.
    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_copyright")]
    pub copyright: String,
}

fn default_url() -> String {
    String::from("http://localhost:4000")
}

fn default_language() -> String {
    String::from("en-gb")
}

fn default_copyright() -> String {
    String::from("MIT License")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_content")]
    pub content: PathBuf,

    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_content() -> PathBuf {
    PathBuf::from("blog")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("ui/static")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    4000
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Also subscribe to subdirectories of the content root.
    #[serde(default)]
    pub recursive: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parse configuration from YAML text; paths stay relative to the working directory
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("site.name", &self.site.name),
            ("site.blog_name", &self.site.blog_name),
            ("site.url", &self.site.url),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(key.to_string()));
            }
        }
        Ok(())
    }

    /// Get the content directory, resolved relative to config file
    pub fn content_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.content)
    }

    /// Get the static assets directory, resolved relative to config file
    pub fn static_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.static_dir)
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(parent) = self.config_path.as_deref().and_then(Path::parent) {
            parent.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Site origin without a trailing slash ("https://example.com")
    pub fn origin(&self) -> &str {
        self.site.url.trim_end_matches('/')
    }

    /// Absolute public URL for a site path ("/blog/x" -> "https://example.com/blog/x")
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.origin(), path.trim_start_matches('/'))
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: default_content(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"
site:
  name: "Jane Doe"
  profession: "Engineer"
  description: "Notes on systems"
  blog_name: "Jane's Blog"
"#;

    #[test]
    fn test_default_values() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.site.url, "http://localhost:4000");
        assert_eq!(config.site.language, "en-gb");
        assert_eq!(config.site.copyright, "MIT License");
        assert_eq!(config.site.repository, None);
        assert_eq!(config.paths.content, PathBuf::from("blog"));
        assert_eq!(config.paths.static_dir, PathBuf::from("ui/static"));
        assert_eq!(config.server.port, 4000);
        assert!(!config.watch.recursive);
    }

    #[test]
    fn test_paths_resolve_relative_to_config_file() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        let config_path = config_dir.join("config.yml");
        fs::write(&config_path, format!("{MINIMAL}paths:\n  content: \"../posts\"\n")).unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.content_dir(), config_dir.join("../posts"));
        assert_eq!(config.static_dir(), config_dir.join("ui/static"));
    }

    #[test]
    fn test_absolute_paths_kept() {
        let yaml = format!("{MINIMAL}paths:\n  content: \"/var/blog\"\n");
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.content_dir(), PathBuf::from("/var/blog"));
    }

    #[test]
    fn test_missing_field_rejected() {
        let yaml = MINIMAL.replace("\"Jane's Blog\"", "\"  \"");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "site.blog_name"));
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        let err = Config::from_yaml("site: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/config.yml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn test_public_url() {
        let yaml = format!("{MINIMAL}  url: \"https://example.com/\"\n");
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.public_url("/blog/x"), "https://example.com/blog/x");
        assert_eq!(config.public_url("rss.xml"), "https://example.com/rss.xml");
    }
}
