//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    file_mode::{FileModeProvider, HtmlFileMode},
    indentation::Indentation,
    location::LocationKind,
    site::TagHtmlConfig,
};

/// Main configuration structure for Quire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Tag page settings.
    #[serde(default)]
    pub tags: TagsConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site name.
    pub name: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Language code written into every document.
    #[serde(default = "default_language")]
    pub language: String,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for the generated site.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Content manifest describing the site graph.
    #[serde(default = "default_content")]
    pub content: PathBuf,

    /// Folder that theme resource paths are relative to.
    #[serde(default = "default_resource_root")]
    pub resource_root: PathBuf,

    /// Theme resources copied verbatim into the output.
    #[serde(default)]
    pub resources: Vec<PathBuf>,

    /// Indentation of generated HTML; compact when absent.
    #[serde(default)]
    pub indentation: Option<Indentation>,

    /// Worker threads; the global rayon pool when absent.
    #[serde(default)]
    pub threads: Option<usize>,

    /// Remove the output directory before building.
    #[serde(default = "default_true")]
    pub clean: bool,

    /// Stop starting new tasks once one has failed.
    #[serde(default = "default_true")]
    pub cancel_on_failure: bool,

    /// File modes for items, pages and tag pages.
    #[serde(default)]
    pub file_modes: FileModeConfig,
}

/// A file mode as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileModeSetting {
    /// `path.html`
    StandAlone,
    /// `path/index.html`
    #[default]
    Folders,
    /// `path`
    Literal,
    /// Template with `%@` replaced by the path.
    #[serde(untagged)]
    Format { format: String },
}

impl FileModeSetting {
    #[must_use]
    pub fn to_mode(&self) -> HtmlFileMode {
        match self {
            Self::StandAlone => HtmlFileMode::StandAlone,
            Self::Folders => HtmlFileMode::FoldersAndIndexFiles,
            Self::Literal => HtmlFileMode::literal(),
            Self::Format { format } => HtmlFileMode::format(format.clone()),
        }
    }
}

/// Per-kind file modes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileModeConfig {
    /// Mode for every kind without an override.
    #[serde(default)]
    pub default: FileModeSetting,

    #[serde(default)]
    pub items: Option<FileModeSetting>,

    #[serde(default)]
    pub pages: Option<FileModeSetting>,

    /// Mode for tag details pages.
    #[serde(default)]
    pub tags: Option<FileModeSetting>,
}

impl FileModeConfig {
    /// Build the provider applied to items, pages and tag details pages.
    #[must_use]
    pub fn provider(&self) -> FileModeProvider {
        let overrides = [
            (LocationKind::Item, &self.items),
            (LocationKind::Page, &self.pages),
            (LocationKind::TagDetails, &self.tags),
        ]
        .into_iter()
        .filter_map(|(kind, setting)| setting.as_ref().map(|s| (kind, s.to_mode())))
        .collect();

        FileModeProvider::by_kind(self.default.to_mode(), overrides)
    }
}

/// Tag page configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsConfig {
    /// Whether tag list and tag details pages are generated.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Folder of the tag pages.
    #[serde(default = "default_tags_base_path")]
    pub base_path: String,
}

impl TagsConfig {
    /// The tag HTML configuration, or `None` when tags are disabled.
    #[must_use]
    pub fn html_config(&self) -> Option<TagHtmlConfig> {
        self.enabled
            .then(|| TagHtmlConfig::new(self.base_path.as_str()))
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("QUIRE").separator("__")
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}

// Default value functions
fn default_language() -> String {
    "en".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_content() -> PathBuf {
    PathBuf::from("content.toml")
}

fn default_resource_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_tags_base_path() -> String {
    "tags".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            content: default_content(),
            resource_root: default_resource_root(),
            resources: Vec::new(),
            indentation: None,
            threads: None,
            clean: true,
            cancel_on_failure: true,
            file_modes: FileModeConfig::default(),
        }
    }
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_path: default_tags_base_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `QUIRE__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        Self::load_layered(path, environment())
    }

    fn load_layered(path: &Path, environment: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(environment)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.name.is_empty() {
            return Err(CoreError::config("site.name cannot be empty"));
        }

        if self.build.output_dir.as_os_str().is_empty() {
            return Err(CoreError::config("build.output_dir cannot be empty"));
        }

        if self.build.threads == Some(0) {
            return Err(CoreError::config("build.threads must be greater than zero"));
        }

        if self.tags.enabled && self.tags.base_path.trim_matches('/').is_empty() {
            return Err(CoreError::config("tags.base_path cannot be empty"));
        }

        let output_dir = without_cur_dir(&self.build.output_dir);
        let resource_root = without_cur_dir(&self.build.resource_root);
        if self.build.clean && resource_root.starts_with(&output_dir) {
            return Err(CoreError::config(format!(
                "build.output_dir '{}' contains build.resource_root '{}' and would be removed by build.clean",
                self.build.output_dir.display(),
                self.build.resource_root.display()
            )));
        }
        if output_dir == resource_root {
            tracing::warn!("build.output_dir equals build.resource_root; resources cannot be copied");
        }

        Ok(())
    }

    /// Resolve a configured path against the directory holding the config file.
    #[must_use]
    pub fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }
}
