//! Content manifest - the TOML file describing a site's content graph.
//!
//! ```toml
//! [index]
//! title = "Home"
//!
//! [[sections]]
//! id = "posts"
//! title = "Posts"
//!
//! [[sections.items]]
//! slug = "hello-world"
//! title = "Hello, World!"
//! date = "2024-05-01T09:00:00Z"
//! tags = ["rust", "announcements"]
//! body = "<p>First post.</p>"
//!
//! [[pages]]
//! path = "about"
//! title = "About"
//! ```

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use quire_core::{Content, Index, Item, Page, Section, SiteGraph, Tag, TagHtmlConfig};
use serde::Deserialize;

/// Parsed content manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentManifest {
    #[serde(default)]
    pub index: Content,

    #[serde(default)]
    pub sections: Vec<SectionEntry>,

    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionEntry {
    pub id: String,

    #[serde(flatten)]
    pub content: Content,

    #[serde(default)]
    pub items: Vec<ItemEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemEntry {
    pub slug: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub content: Content,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageEntry {
    pub path: String,

    #[serde(flatten)]
    pub content: Content,
}

impl ContentManifest {
    /// Load a manifest from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read content manifest: {}", path.display()))?;
        Self::parse(&raw)
            .wrap_err_with(|| format!("Failed to parse content manifest: {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Build the site graph, with tag pages when `tags` is set.
    pub fn into_site(self, tags: Option<TagHtmlConfig>) -> Result<SiteGraph> {
        let mut builder = SiteGraph::builder(Index::new(self.index));

        for entry in self.sections {
            builder = builder.section(Section::new(entry.id.as_str(), entry.content))?;
            for item in entry.items {
                let tags = item.tags.into_iter().map(Tag::new);
                builder = builder
                    .item(Item::new(entry.id.as_str(), &item.slug, item.content).with_tags(tags))?;
            }
        }

        for page in self.pages {
            builder = builder.page(Page::new(page.path, page.content))?;
        }

        if let Some(tags) = tags {
            builder = builder.tags(tags);
        }

        Ok(builder.build())
    }
}
