//! HTML generation orchestration.
//!
//! Fans out one task per location across the rayon pool and gathers their
//! results:
//!
//! ```text
//! generate()
//!     │
//!     ├── theme resources ──► one copy per resource path
//!     ├── index            ──► index/index.html
//!     ├── sections         ──► per section: section task ∥ its item tasks
//!     ├── pages            ──► one task per page
//!     └── tags (optional)  ──► tag list page ∥ one task per tag
//! ```
//!
//! No ordering exists between or within groups. Every task writes a distinct
//! path and only reads the immutable site graph.

use quire_core::{
    Content, FileModeProvider, HtmlFileMode, Indentation, TagDetailsPage, TagListPage,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    context::PublishingContext,
    error::GenerationError,
    group::{GenerationStats, TaskGroup},
    resources::ResourceCopier,
    task::{GenerationTask, RenderTarget},
    theme::Theme,
};

/// Generates every output file of a site with one theme.
#[derive(Debug)]
pub struct HtmlGenerator<'a> {
    theme: &'a Theme,
    context: PublishingContext<'a>,
    indentation: Option<Indentation>,
    file_mode_provider: FileModeProvider,
    cancel_on_failure: bool,
}

impl<'a> HtmlGenerator<'a> {
    /// Create a generator with compact output, folder file modes and cancellation on failure.
    #[must_use]
    pub fn new(theme: &'a Theme, context: PublishingContext<'a>) -> Self {
        Self {
            theme,
            context,
            indentation: None,
            file_mode_provider: FileModeProvider::default(),
            cancel_on_failure: true,
        }
    }

    #[must_use]
    pub fn with_indentation(mut self, indentation: Option<Indentation>) -> Self {
        self.indentation = indentation;
        self
    }

    /// File modes for items, pages and tag details pages.
    #[must_use]
    pub fn with_file_mode_provider(mut self, provider: impl Into<FileModeProvider>) -> Self {
        self.file_mode_provider = provider.into();
        self
    }

    /// Whether a failure stops tasks that have not started yet.
    #[must_use]
    pub fn with_cancel_on_failure(mut self, cancel: bool) -> Self {
        self.cancel_on_failure = cancel;
        self
    }

    /// Run every task on the current rayon pool and wait for all of them.
    ///
    /// Fails if any task failed, after all running tasks have settled.
    pub fn generate(&self) -> Result<GenerationStats, GenerationError> {
        info!(
            theme = self.theme.name(),
            output = %self.context.output_root().display(),
            locations = self.context.site().location_count(),
            "generating HTML"
        );

        let group = TaskGroup::new(self.cancel_on_failure);

        rayon::scope(|s| {
            s.spawn(|_| self.copy_theme_resources(&group));
            s.spawn(|_| self.generate_index(&group));
            s.spawn(|_| self.generate_sections(&group));
            s.spawn(|_| self.generate_pages(&group));
            s.spawn(|_| self.generate_tags(&group));
        });

        let stats = group.finish()?;
        info!(
            written = stats.written,
            skipped = stats.skipped,
            resources = stats.resources,
            "HTML generation complete"
        );
        Ok(stats)
    }

    fn run(&self, group: &TaskGroup, task: &GenerationTask<'_>) {
        group.run(|| task.run(self.theme, &self.context, self.indentation));
    }

    fn copy_theme_resources(&self, group: &TaskGroup) {
        ResourceCopier::new(self.context.output()).copy_into(
            self.theme.resource_paths(),
            self.theme.resource_root(),
            group,
        );
    }

    fn generate_index(&self, group: &TaskGroup) {
        let task = GenerationTask::new(
            RenderTarget::Index(self.context.index()),
            HtmlFileMode::FoldersAndIndexFiles,
        );
        self.run(group, &task);
    }

    fn generate_sections(&self, group: &TaskGroup) {
        self.context.sections().par_iter().for_each(|section| {
            rayon::join(
                || {
                    let task = GenerationTask::new(
                        RenderTarget::Section(section),
                        HtmlFileMode::FoldersAndIndexFiles,
                    );
                    self.run(group, &task);
                },
                || {
                    section.items().par_iter().for_each(|item| {
                        let task = GenerationTask::with_provider(
                            RenderTarget::Item(item),
                            &self.file_mode_provider,
                        );
                        self.run(group, &task);
                    });
                },
            );
        });
    }

    fn generate_pages(&self, group: &TaskGroup) {
        self.context.pages().par_iter().for_each(|(_, page)| {
            let task = GenerationTask::with_provider(RenderTarget::Page(page), &self.file_mode_provider);
            self.run(group, &task);
        });
    }

    fn generate_tags(&self, group: &TaskGroup) {
        let Some(config) = self.context.site().tag_html() else {
            debug!("tag pages disabled");
            return;
        };

        let tags = self.context.all_tags();
        let list_page = TagListPage::new(
            tags.clone(),
            config.base_path.clone(),
            config.list_content.clone().unwrap_or_default(),
        );

        rayon::join(
            || {
                let task = GenerationTask::new(
                    RenderTarget::TagList(&list_page),
                    HtmlFileMode::FoldersAndIndexFiles,
                );
                self.run(group, &task);
            },
            || {
                tags.par_iter().for_each(|tag| {
                    let details_page = TagDetailsPage::new(
                        tag.clone(),
                        self.context.path_for_tag(tag),
                        config.details_content(tag).unwrap_or_else(Content::default),
                    );
                    let task = GenerationTask::with_provider(
                        RenderTarget::TagDetails(&details_page),
                        &self.file_mode_provider,
                    );
                    self.run(group, &task);
                });
            },
        );
    }
}
