//! The read-only view handed to every rendering function.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use quire_core::{ContentPath, Index, Item, Page, Section, SiteGraph, Tag};

use crate::fs::OutputFolder;

/// Site content plus output file creation, shared by all tasks of a run.
///
/// Nothing here mutates the graph, so workers read it concurrently.
#[derive(Debug, Clone, Copy)]
pub struct PublishingContext<'a> {
    site: &'a SiteGraph,
    output: &'a OutputFolder,
}

impl<'a> PublishingContext<'a> {
    pub fn new(site: &'a SiteGraph, output: &'a OutputFolder) -> Self {
        Self { site, output }
    }

    #[must_use]
    pub fn site(&self) -> &'a SiteGraph {
        self.site
    }

    #[must_use]
    pub fn index(&self) -> &'a Index {
        self.site.index()
    }

    #[must_use]
    pub fn sections(&self) -> &'a [Section] {
        self.site.sections()
    }

    #[must_use]
    pub fn pages(&self) -> &'a BTreeMap<ContentPath, Page> {
        self.site.pages()
    }

    #[must_use]
    pub fn all_tags(&self) -> Vec<Tag> {
        self.site.all_tags()
    }

    #[must_use]
    pub fn items_tagged(&self, tag: &Tag) -> Vec<&'a Item> {
        self.site.items_tagged(tag)
    }

    /// Canonical path of a tag's page, for cross-linking.
    #[must_use]
    pub fn path_for_tag(&self, tag: &Tag) -> ContentPath {
        self.site.path_for_tag(tag)
    }

    #[must_use]
    pub fn output(&self) -> &'a OutputFolder {
        self.output
    }

    #[must_use]
    pub fn output_root(&self) -> &'a Path {
        self.output.root()
    }

    /// Write a file at an output-relative path.
    pub fn create_output_file(&self, path: &ContentPath, contents: &[u8]) -> io::Result<PathBuf> {
        self.output.create_file(path, contents)
    }
}
