//! Build orchestration.
//!
//! Prepares the output directory and worker pool, then runs the HTML
//! generator over a site graph.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use quire_core::{FileModeProvider, Indentation, SiteGraph};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    context::PublishingContext,
    error::GenerationError,
    fs::{FileSystem, LocalFileSystem, OutputFolder},
    generator::HtmlGenerator,
    theme::Theme,
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error while preparing the output directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Cleaning the output directory would delete the theme resources.
    #[error(
        "output directory '{}' contains the theme resource root '{}'",
        .output.display(),
        .resources.display()
    )]
    OutputContainsResources { output: PathBuf, resources: PathBuf },

    /// The worker pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// One or more generation tasks failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of HTML files written.
    pub written: usize,

    /// Number of locations the theme skipped.
    pub skipped: usize,

    /// Number of resource files copied.
    pub resources: usize,

    /// Number of tasks cancelled before they started.
    pub not_started: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Publishes a site graph with a theme into an output directory.
pub struct Publisher {
    theme: Theme,
    output_dir: PathBuf,
    indentation: Option<Indentation>,
    file_mode_provider: FileModeProvider,
    threads: Option<usize>,
    clean: bool,
    cancel_on_failure: bool,
    file_system: Option<Arc<dyn FileSystem>>,
}

impl Publisher {
    /// Create a publisher writing to `output_dir` on the local disk.
    #[must_use]
    pub fn new(theme: Theme, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            theme,
            output_dir: output_dir.into(),
            indentation: None,
            file_mode_provider: FileModeProvider::default(),
            threads: None,
            clean: true,
            cancel_on_failure: true,
            file_system: None,
        }
    }

    #[must_use]
    pub fn with_indentation(mut self, indentation: Option<Indentation>) -> Self {
        self.indentation = indentation;
        self
    }

    #[must_use]
    pub fn with_file_mode_provider(mut self, provider: impl Into<FileModeProvider>) -> Self {
        self.file_mode_provider = provider.into();
        self
    }

    /// Run on a dedicated pool of `threads` workers instead of the global pool.
    #[must_use]
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Remove the output directory before generating. Local disk only.
    #[must_use]
    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    #[must_use]
    pub fn with_cancel_on_failure(mut self, cancel: bool) -> Self {
        self.cancel_on_failure = cancel;
        self
    }

    /// Write through `fs` instead of the local disk. Disables cleaning.
    #[must_use]
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Execute the full build.
    pub fn publish(&self, site: &SiteGraph) -> Result<BuildStats> {
        let start = Instant::now();

        info!(
            theme = self.theme.name(),
            output = %self.output_dir.display(),
            threads = ?self.threads,
            "starting build"
        );

        let fs = match &self.file_system {
            Some(fs) => fs.clone(),
            None => {
                if self.clean {
                    self.check_resources_outside_output()?;
                    self.clean_output()?;
                }
                Arc::new(LocalFileSystem) as Arc<dyn FileSystem>
            }
        };
        let output = OutputFolder::new(&self.output_dir, fs);

        let generate = || {
            HtmlGenerator::new(&self.theme, PublishingContext::new(site, &output))
                .with_indentation(self.indentation)
                .with_file_mode_provider(self.file_mode_provider.clone())
                .with_cancel_on_failure(self.cancel_on_failure)
                .generate()
        };

        let generated = match self.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(generate)?,
            None => generate()?,
        };

        let stats = BuildStats {
            written: generated.written,
            skipped: generated.skipped,
            resources: generated.resources,
            not_started: generated.not_started,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            written = stats.written,
            skipped = stats.skipped,
            resources = stats.resources,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Fail when removing the output directory would take the resource root with it.
    fn check_resources_outside_output(&self) -> Result<()> {
        if self.theme.resource_paths().is_empty() {
            return Ok(());
        }
        let output = absolute(&self.output_dir);
        let resources = absolute(self.theme.resource_root());
        if resources.starts_with(&output) {
            return Err(BuildError::OutputContainsResources { output, resources });
        }
        Ok(())
    }

    /// Clean the output directory.
    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}

fn absolute(path: &Path) -> PathBuf {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("theme", &self.theme)
            .field("output_dir", &self.output_dir)
            .field("indentation", &self.indentation)
            .field("threads", &self.threads)
            .field("clean", &self.clean)
            .field("cancel_on_failure", &self.cancel_on_failure)
            .field("custom_file_system", &self.file_system.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use quire_core::{Content, HtmlFileMode, Index, Page, Section};
    use tempfile::TempDir;

    use super::*;
    use crate::{
        document::{Element, Html},
        error::RenderError,
        fs::MemoryFileSystem,
        theme::RenderResult,
    };

    fn doc(title: &str) -> RenderResult {
        Ok(Box::new(Html::new(Element::new("h1").text(title))))
    }

    fn theme() -> Theme {
        Theme::new(
            "test",
            |_, _| doc("home"),
            |s, _| doc(&s.content.title),
            |i, _| doc(&i.content.title),
            |p, _| doc(&p.content.title),
        )
    }

    fn site() -> SiteGraph {
        SiteGraph::builder(Index::new(Content::titled("Home")))
            .section(Section::new("docs", Content::titled("Docs")))
            .unwrap()
            .page(Page::new("about", Content::titled("About")))
            .unwrap()
            .build()
    }

    #[test]
    fn test_build_empty_site() {
        let output_dir = TempDir::new().unwrap();

        let stats = Publisher::new(theme(), output_dir.path())
            .publish(&SiteGraph::default())
            .unwrap();

        assert_eq!(stats.written, 1);
        assert!(output_dir.path().join("index/index.html").exists());
    }

    #[test]
    fn test_clean_removes_stale_files() {
        let output_dir = TempDir::new().unwrap();
        fs::write(output_dir.path().join("stale.html"), "old").unwrap();

        Publisher::new(theme(), output_dir.path())
            .publish(&site())
            .unwrap();

        assert!(!output_dir.path().join("stale.html").exists());
        assert!(output_dir.path().join("docs/index.html").exists());
    }

    #[test]
    fn test_no_clean_keeps_existing_files() {
        let output_dir = TempDir::new().unwrap();
        fs::write(output_dir.path().join("keep.txt"), "mine").unwrap();

        Publisher::new(theme(), output_dir.path())
            .with_clean(false)
            .publish(&site())
            .unwrap();

        assert!(output_dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_refuses_to_clean_resource_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("style.css"), "body {}").unwrap();
        let theme = theme().with_resources(dir.path(), [PathBuf::from("style.css")]);

        let err = Publisher::new(theme.clone(), dir.path())
            .publish(&site())
            .unwrap_err();
        assert!(matches!(err, BuildError::OutputContainsResources { .. }));
        assert_eq!(fs::read_to_string(dir.path().join("style.css")).unwrap(), "body {}");

        // Without cleaning the copy would land on its own source.
        let err = Publisher::new(theme, dir.path())
            .with_clean(false)
            .publish(&site())
            .unwrap_err();
        assert!(matches!(err, BuildError::Generation(_)));
        assert_eq!(fs::read_to_string(dir.path().join("style.css")).unwrap(), "body {}");
    }

    #[test]
    fn test_refuses_to_clean_parent_of_resource_root() {
        let dir = TempDir::new().unwrap();
        let theme_dir = dir.path().join("theme");
        fs::create_dir_all(&theme_dir).unwrap();
        fs::write(theme_dir.join("style.css"), "body {}").unwrap();
        let theme = theme().with_resources(&theme_dir, [PathBuf::from("style.css")]);

        let err = Publisher::new(theme, dir.path()).publish(&site()).unwrap_err();

        assert!(err.to_string().contains("theme resource root"));
        assert!(theme_dir.join("style.css").exists());
    }

    #[test]
    fn test_resources_beside_output_are_copied() {
        let dir = TempDir::new().unwrap();
        let theme_dir = dir.path().join("theme");
        fs::create_dir_all(&theme_dir).unwrap();
        fs::write(theme_dir.join("style.css"), "body {}").unwrap();
        let theme = theme().with_resources(&theme_dir, [PathBuf::from("style.css")]);

        let stats = Publisher::new(theme, dir.path().join("public"))
            .publish(&site())
            .unwrap();

        assert_eq!(stats.resources, 1);
        assert!(dir.path().join("public/style.css").exists());
    }

    #[test]
    fn test_dedicated_thread_pool() {
        let fs = Arc::new(MemoryFileSystem::new());

        let stats = Publisher::new(theme(), "/site")
            .with_threads(Some(2))
            .with_file_mode_provider(HtmlFileMode::StandAlone)
            .with_file_system(fs.clone())
            .publish(&site())
            .unwrap();

        assert_eq!(stats.written, 3);
        assert!(fs.read(Path::new("/site/about.html")).is_some());
    }

    #[test]
    fn test_zero_threads_uses_default_pool_size() {
        let fs = Arc::new(MemoryFileSystem::new());

        // rayon treats zero as "pick a default".
        let stats = Publisher::new(theme(), "/site")
            .with_threads(Some(0))
            .with_file_system(fs)
            .publish(&site())
            .unwrap();

        assert_eq!(stats.written, 3);
    }

    #[test]
    fn test_generation_failure_surfaces() {
        let fs = Arc::new(MemoryFileSystem::new());
        let theme = Theme::new(
            "broken",
            |_, _| doc("home"),
            |_, _| Err(RenderError::message("boom")),
            |_, _| doc("item"),
            |_, _| doc("page"),
        );

        let err = Publisher::new(theme, "/site")
            .with_file_system(fs)
            .publish(&site())
            .unwrap_err();

        assert!(matches!(err, BuildError::Generation(_)));
        assert!(err.to_string().contains("docs"));
    }
}
