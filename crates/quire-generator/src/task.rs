//! A single unit of generation work.
//!
//! Render one location, serialize the document, resolve the output path and
//! write the file. Each step's failure is wrapped with the location's path.

use std::path::PathBuf;

use quire_core::{
    ContentPath, FileModeProvider, HtmlFileMode, Indentation, Index, Item, Location, Page,
    Section, TagDetailsPage, TagListPage,
};
use tracing::{debug, trace};

use crate::{
    context::PublishingContext,
    error::PublishingError,
    theme::{OptionalRenderResult, Theme},
};

/// The location to render, tagged with its variant.
#[derive(Debug, Clone, Copy)]
pub enum RenderTarget<'a> {
    Index(&'a Index),
    Section(&'a Section),
    Item(&'a Item),
    Page(&'a Page),
    TagList(&'a TagListPage),
    TagDetails(&'a TagDetailsPage),
}

impl<'a> RenderTarget<'a> {
    #[must_use]
    pub fn location(&self) -> &'a dyn Location {
        match *self {
            Self::Index(l) => l,
            Self::Section(l) => l,
            Self::Item(l) => l,
            Self::Page(l) => l,
            Self::TagList(l) => l,
            Self::TagDetails(l) => l,
        }
    }

    /// Invoke the theme's renderer for this variant.
    fn render(&self, theme: &Theme, context: &PublishingContext<'_>) -> OptionalRenderResult {
        match *self {
            Self::Index(index) => theme.render_index(index, context).map(Some),
            Self::Section(section) => theme.render_section(section, context).map(Some),
            Self::Item(item) => theme.render_item(item, context).map(Some),
            Self::Page(page) => theme.render_page(page, context).map(Some),
            Self::TagList(page) => theme.render_tag_list(page, context),
            Self::TagDetails(page) => theme.render_tag_details(page, context),
        }
    }
}

/// What a finished task did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// A file was written at this path.
    Written(PathBuf),
    /// The theme declined to render; nothing was written.
    Skipped,
}

/// Generation of one output file.
#[derive(Debug, Clone)]
pub struct GenerationTask<'a> {
    target: RenderTarget<'a>,
    file_mode: HtmlFileMode,
}

impl<'a> GenerationTask<'a> {
    /// A task with a fixed file mode.
    #[must_use]
    pub fn new(target: RenderTarget<'a>, file_mode: HtmlFileMode) -> Self {
        Self { target, file_mode }
    }

    /// A task whose file mode is picked by `provider` for this location.
    #[must_use]
    pub fn with_provider(target: RenderTarget<'a>, provider: &FileModeProvider) -> Self {
        let file_mode = provider.mode_for(target.location());
        Self::new(target, file_mode)
    }

    #[must_use]
    pub fn target(&self) -> RenderTarget<'a> {
        self.target
    }

    /// Output-relative path this task writes to.
    #[must_use]
    pub fn output_path(&self) -> ContentPath {
        self.file_mode.resolve(self.target.location())
    }

    /// Render, serialize and write.
    pub fn run(
        &self,
        theme: &Theme,
        context: &PublishingContext<'_>,
        indentation: Option<Indentation>,
    ) -> Result<TaskOutcome, PublishingError> {
        let location = self.target.location();
        trace!(kind = %location.kind(), path = %location.path(), "rendering");

        let document = self
            .target
            .render(theme, context)
            .map_err(|source| PublishingError::Render {
                kind: location.kind(),
                path: location.path().clone(),
                source,
            })?;

        let Some(document) = document else {
            debug!(kind = %location.kind(), path = %location.path(), "theme skipped location");
            return Ok(TaskOutcome::Skipped);
        };

        let path = self.output_path();
        let html = document
            .render(indentation)
            .map_err(|source| PublishingError::Serialize {
                path: path.clone(),
                source,
            })?;

        let written = context
            .create_output_file(&path, html.as_bytes())
            .map_err(|source| PublishingError::Write {
                path: context.output().target(&path),
                source,
            })?;

        Ok(TaskOutcome::Written(written))
    }
}
