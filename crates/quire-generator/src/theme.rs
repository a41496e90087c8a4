//! Themes: the rendering functions and resources that turn content into documents.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use quire_core::{Index, Item, Page, Section, TagDetailsPage, TagListPage};

use crate::{context::PublishingContext, document::Document, error::RenderError};

/// A rendered document, boxed so themes can return any serializer.
pub type RenderResult = Result<Box<dyn Document>, RenderError>;

/// Like [`RenderResult`], with `None` meaning "skip this page".
pub type OptionalRenderResult = Result<Option<Box<dyn Document>>, RenderError>;

type Renderer<T> = dyn Fn(&T, &PublishingContext<'_>) -> RenderResult + Send + Sync;
type OptionalRenderer<T> = dyn Fn(&T, &PublishingContext<'_>) -> OptionalRenderResult + Send + Sync;

/// Rendering functions for each location kind plus resources to copy.
#[derive(Clone)]
pub struct Theme {
    name: String,
    index: Arc<Renderer<Index>>,
    section: Arc<Renderer<Section>>,
    item: Arc<Renderer<Item>>,
    page: Arc<Renderer<Page>>,
    tag_list: Option<Arc<OptionalRenderer<TagListPage>>>,
    tag_details: Option<Arc<OptionalRenderer<TagDetailsPage>>>,
    resource_root: PathBuf,
    resource_paths: Vec<PathBuf>,
}

impl Theme {
    /// Create a theme from its four required renderers.
    ///
    /// Tag pages are skipped until [`Theme::with_tag_list`] and
    /// [`Theme::with_tag_details`] provide renderers for them.
    pub fn new<I, S, It, P>(name: impl Into<String>, index: I, section: S, item: It, page: P) -> Self
    where
        I: Fn(&Index, &PublishingContext<'_>) -> RenderResult + Send + Sync + 'static,
        S: Fn(&Section, &PublishingContext<'_>) -> RenderResult + Send + Sync + 'static,
        It: Fn(&Item, &PublishingContext<'_>) -> RenderResult + Send + Sync + 'static,
        P: Fn(&Page, &PublishingContext<'_>) -> RenderResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            index: Arc::new(index),
            section: Arc::new(section),
            item: Arc::new(item),
            page: Arc::new(page),
            tag_list: None,
            tag_details: None,
            resource_root: PathBuf::new(),
            resource_paths: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tag_list<F>(mut self, render: F) -> Self
    where
        F: Fn(&TagListPage, &PublishingContext<'_>) -> OptionalRenderResult + Send + Sync + 'static,
    {
        self.tag_list = Some(Arc::new(render));
        self
    }

    #[must_use]
    pub fn with_tag_details<F>(mut self, render: F) -> Self
    where
        F: Fn(&TagDetailsPage, &PublishingContext<'_>) -> OptionalRenderResult
            + Send
            + Sync
            + 'static,
    {
        self.tag_details = Some(Arc::new(render));
        self
    }

    /// Resources copied verbatim, relative to `root`.
    #[must_use]
    pub fn with_resources(
        mut self,
        root: impl Into<PathBuf>,
        paths: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        self.resource_root = root.into();
        self.resource_paths = paths.into_iter().collect();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn resource_root(&self) -> &Path {
        &self.resource_root
    }

    #[must_use]
    pub fn resource_paths(&self) -> &[PathBuf] {
        &self.resource_paths
    }

    pub fn render_index(&self, index: &Index, context: &PublishingContext<'_>) -> RenderResult {
        (self.index)(index, context)
    }

    pub fn render_section(&self, section: &Section, context: &PublishingContext<'_>) -> RenderResult {
        (self.section)(section, context)
    }

    pub fn render_item(&self, item: &Item, context: &PublishingContext<'_>) -> RenderResult {
        (self.item)(item, context)
    }

    pub fn render_page(&self, page: &Page, context: &PublishingContext<'_>) -> RenderResult {
        (self.page)(page, context)
    }

    /// `Ok(None)` when the theme has no tag list renderer or declines.
    pub fn render_tag_list(
        &self,
        page: &TagListPage,
        context: &PublishingContext<'_>,
    ) -> OptionalRenderResult {
        match &self.tag_list {
            Some(render) => render(page, context),
            None => Ok(None),
        }
    }

    /// `Ok(None)` when the theme has no tag details renderer or declines.
    pub fn render_tag_details(
        &self,
        page: &TagDetailsPage,
        context: &PublishingContext<'_>,
    ) -> OptionalRenderResult {
        match &self.tag_details {
            Some(render) => render(page, context),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Theme")
            .field("name", &self.name)
            .field("tag_list", &self.tag_list.is_some())
            .field("tag_details", &self.tag_details.is_some())
            .field("resource_root", &self.resource_root)
            .field("resource_paths", &self.resource_paths)
            .finish()
    }
}
