//! Locations: every content entity that produces an output file.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::{Content, ContentPath, Tag};

/// Path of the site index.
pub const INDEX_PATH: &str = "index";

/// The variant of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationKind {
    Index,
    Section,
    Item,
    Page,
    TagList,
    TagDetails,
}

impl LocationKind {
    /// Lowercase name used in logs and error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Section => "section",
            Self::Item => "item",
            Self::Page => "page",
            Self::TagList => "tag list",
            Self::TagDetails => "tag details",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content entity destined to produce exactly one output file.
pub trait Location {
    /// Logical path, before file-mode expansion.
    fn path(&self) -> &ContentPath;

    /// Semantic content.
    fn content(&self) -> &Content;

    /// Which variant this location is.
    fn kind(&self) -> LocationKind;
}

macro_rules! impl_location {
    ($ty:ty, $kind:expr) => {
        impl Location for $ty {
            fn path(&self) -> &ContentPath {
                &self.path
            }

            fn content(&self) -> &Content {
                &self.content
            }

            fn kind(&self) -> LocationKind {
                $kind
            }
        }
    };
}

/// The site's front page.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    path: ContentPath,
    pub content: Content,
}

impl Index {
    /// Create the index with its content. The path is always [`INDEX_PATH`].
    pub fn new(content: Content) -> Self {
        Self {
            path: ContentPath::new(INDEX_PATH),
            content,
        }
    }
}

impl Default for Index {
    fn default() -> Self {
        Self::new(Content::default())
    }
}

/// A section grouping an ordered list of items.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Identifier, also the section's path.
    pub id: String,
    pub(crate) path: ContentPath,
    pub content: Content,
    pub(crate) items: Vec<Item>,
}

impl Section {
    /// Create an empty section.
    pub fn new(id: impl Into<String>, content: Content) -> Self {
        let id = id.into();
        Self {
            path: ContentPath::new(id.as_str()),
            id,
            content,
            items: Vec::new(),
        }
    }

    /// Items in declaration order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

/// An entry owned by exactly one section.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Identifier of the owning section.
    pub section_id: String,
    pub(crate) path: ContentPath,
    pub tags: Vec<Tag>,
    pub content: Content,
}

impl Item {
    /// Create an item; its path is `<section>/<slug>`.
    pub fn new(section_id: impl Into<String>, slug: &str, content: Content) -> Self {
        let section_id = section_id.into();
        Self {
            path: ContentPath::new(section_id.as_str()).join(slug),
            section_id,
            tags: Vec::new(),
            content,
        }
    }

    /// Attach tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Whether the item carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }
}

/// A free-standing page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    path: ContentPath,
    pub content: Content,
}

impl Page {
    pub fn new(path: impl Into<ContentPath>, content: Content) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }
}

/// The page listing every tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TagListPage {
    pub tags: Vec<Tag>,
    path: ContentPath,
    pub content: Content,
}

impl TagListPage {
    pub fn new(tags: Vec<Tag>, path: impl Into<ContentPath>, content: Content) -> Self {
        Self {
            tags,
            path: path.into(),
            content,
        }
    }
}

/// The page for a single tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TagDetailsPage {
    pub tag: Tag,
    path: ContentPath,
    pub content: Content,
}

impl TagDetailsPage {
    pub fn new(tag: Tag, path: impl Into<ContentPath>, content: Content) -> Self {
        Self {
            tag,
            path: path.into(),
            content,
        }
    }
}

impl_location!(Index, LocationKind::Index);
impl_location!(Section, LocationKind::Section);
impl_location!(Item, LocationKind::Item);
impl_location!(Page, LocationKind::Page);
impl_location!(TagListPage, LocationKind::TagList);
impl_location!(TagDetailsPage, LocationKind::TagDetails);
