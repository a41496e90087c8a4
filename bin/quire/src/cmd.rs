//! Command implementations.

pub mod build;
pub mod plan;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use quire_core::{Config, SiteGraph};
use quire_generator::{Publisher, Theme};

use crate::{manifest::ContentManifest, theme};

/// Everything a command needs: configuration, content and theme.
#[derive(Debug)]
pub struct Project {
    pub config: Config,
    /// Directory holding the configuration file; relative paths resolve against it.
    pub root: PathBuf,
    pub site: SiteGraph,
    pub theme: Theme,
}

impl Project {
    /// Load the configuration at `config_path` and the content manifest it names.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
        tracing::debug!(?config, "Loaded configuration");

        let root = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let manifest_path = Config::resolve_relative(&root, &config.build.content);
        let site = ContentManifest::load(&manifest_path)?
            .into_site(config.tags.html_config())
            .wrap_err("Invalid content manifest")?;

        let theme = theme::plain(&config).with_resources(
            Config::resolve_relative(&root, &config.build.resource_root),
            config.build.resources.iter().cloned(),
        );

        Ok(Self {
            config,
            root,
            site,
            theme,
        })
    }

    /// Output directory, `output` when given or the configured one.
    pub fn output_dir(&self, output: Option<&Path>) -> PathBuf {
        match output {
            Some(output) => output.to_path_buf(),
            None => Config::resolve_relative(&self.root, &self.config.build.output_dir),
        }
    }

    /// A publisher carrying every configured build option.
    pub fn publisher(&self, theme: Theme, output_dir: PathBuf) -> Publisher {
        let build = &self.config.build;
        Publisher::new(theme, output_dir)
            .with_indentation(build.indentation)
            .with_file_mode_provider(build.file_modes.provider())
            .with_threads(build.threads)
            .with_clean(build.clean)
            .with_cancel_on_failure(build.cancel_on_failure)
    }
}
