//! The site content graph.
//!
//! Built once by [`SiteGraphBuilder`] and read-only afterwards, so it can be
//! shared by reference across generation workers without synchronization.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    fmt,
    sync::Arc,
};

use crate::{
    content::{Content, ContentPath, Tag},
    error::{CoreError, Result},
    location::{Index, Item, Location, LocationKind, Page, Section},
};

type DetailsContentResolver = dyn Fn(&Tag) -> Option<Content> + Send + Sync;

/// How tag pages are generated.
#[derive(Clone)]
pub struct TagHtmlConfig {
    /// Folder holding the tag list page and one sub-path per tag.
    pub base_path: ContentPath,

    /// Content for the tag list page.
    pub list_content: Option<Content>,

    details_content: Option<Arc<DetailsContentResolver>>,
}

impl TagHtmlConfig {
    pub fn new(base_path: impl Into<ContentPath>) -> Self {
        Self {
            base_path: base_path.into(),
            list_content: None,
            details_content: None,
        }
    }

    #[must_use]
    pub fn with_list_content(mut self, content: Content) -> Self {
        self.list_content = Some(content);
        self
    }

    /// Resolve per-tag content for details pages.
    #[must_use]
    pub fn with_details_content<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&Tag) -> Option<Content> + Send + Sync + 'static,
    {
        self.details_content = Some(Arc::new(resolver));
        self
    }

    /// Content for a tag's details page, if the resolver provides any.
    #[must_use]
    pub fn details_content(&self, tag: &Tag) -> Option<Content> {
        self.details_content.as_ref().and_then(|resolve| resolve(tag))
    }
}

impl Default for TagHtmlConfig {
    fn default() -> Self {
        Self::new("tags")
    }
}

impl fmt::Debug for TagHtmlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagHtmlConfig")
            .field("base_path", &self.base_path)
            .field("list_content", &self.list_content)
            .field("details_content", &self.details_content.is_some())
            .finish()
    }
}

/// Complete, read-only model of a site.
#[derive(Debug, Clone, Default)]
pub struct SiteGraph {
    index: Index,
    sections: Vec<Section>,
    pages: BTreeMap<ContentPath, Page>,
    tag_html: Option<TagHtmlConfig>,
}

impl SiteGraph {
    /// Start building a graph around an index.
    pub fn builder(index: Index) -> SiteGraphBuilder {
        SiteGraphBuilder::new(index)
    }

    #[must_use]
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Sections in declaration order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn pages(&self) -> &BTreeMap<ContentPath, Page> {
        &self.pages
    }

    #[must_use]
    pub fn tag_html(&self) -> Option<&TagHtmlConfig> {
        self.tag_html.as_ref()
    }

    /// All items across every section.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    /// Every distinct tag, sorted.
    ///
    /// Tags are distinct by name. Two names that normalize alike, such as
    /// `Rust` and `rust`, are two tags sharing one [`path_for_tag`] and so one
    /// output file; keeping them apart is up to the content.
    ///
    /// [`path_for_tag`]: SiteGraph::path_for_tag
    #[must_use]
    pub fn all_tags(&self) -> Vec<Tag> {
        self.items()
            .flat_map(|item| item.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Items carrying `tag`, in section then declaration order.
    #[must_use]
    pub fn items_tagged(&self, tag: &Tag) -> Vec<&Item> {
        self.items().filter(|item| item.has_tag(tag)).collect()
    }

    /// Canonical path of a tag's details page: the tag base path joined with
    /// the normalized tag name.
    ///
    /// Not checked for collisions. A tag normalizing to an empty name maps to
    /// the base path itself, so in folder mode it is written over the tag list.
    #[must_use]
    pub fn path_for_tag(&self, tag: &Tag) -> ContentPath {
        let base = self
            .tag_html
            .as_ref()
            .map_or_else(|| TagHtmlConfig::default().base_path, |c| c.base_path.clone());
        base.join(tag.normalized())
    }

    /// Number of locations that may produce an output file.
    #[must_use]
    pub fn location_count(&self) -> usize {
        let tags = if self.tag_html.is_some() {
            1 + self.all_tags().len()
        } else {
            0
        };
        1 + self.sections.len() + self.items().count() + self.pages.len() + tags
    }
}

/// Incremental builder enforcing path uniqueness per location kind.
#[derive(Debug)]
pub struct SiteGraphBuilder {
    graph: SiteGraph,
    item_paths: HashSet<ContentPath>,
}

impl SiteGraphBuilder {
    pub fn new(index: Index) -> Self {
        Self {
            graph: SiteGraph {
                index,
                ..SiteGraph::default()
            },
            item_paths: HashSet::new(),
        }
    }

    /// Declare a section. Sections keep their declaration order.
    pub fn section(mut self, section: Section) -> Result<Self> {
        if self.graph.section(&section.id).is_some() {
            return Err(CoreError::duplicate(LocationKind::Section, section.id.clone()));
        }
        for item in &section.items {
            if !self.item_paths.insert(item.path.clone()) {
                return Err(CoreError::duplicate(LocationKind::Item, item.path.clone()));
            }
        }
        self.graph.sections.push(section);
        Ok(self)
    }

    /// Append an item to its already-declared section.
    pub fn item(mut self, item: Item) -> Result<Self> {
        let section = self
            .graph
            .sections
            .iter_mut()
            .find(|s| s.id == item.section_id)
            .ok_or_else(|| CoreError::UnknownSection(item.section_id.clone()))?;
        if !self.item_paths.insert(item.path.clone()) {
            return Err(CoreError::duplicate(LocationKind::Item, item.path));
        }
        section.items.push(item);
        Ok(self)
    }

    pub fn page(mut self, page: Page) -> Result<Self> {
        let path = page.path().clone();
        if self.graph.pages.contains_key(&path) {
            return Err(CoreError::duplicate(LocationKind::Page, path));
        }
        self.graph.pages.insert(path, page);
        Ok(self)
    }

    /// Enable tag list and tag details pages.
    #[must_use]
    pub fn tags(mut self, config: TagHtmlConfig) -> Self {
        self.graph.tag_html = Some(config);
        self
    }

    #[must_use]
    pub fn build(self) -> SiteGraph {
        self.graph
    }
}
