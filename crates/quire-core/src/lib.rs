//! Quire Core Library
//!
//! Content model, output path policy and configuration for the Quire publishing pipeline.

pub mod config;
pub mod content;
pub mod error;
pub mod file_mode;
pub mod indentation;
pub mod location;
pub mod site;

pub use config::Config;
pub use content::{Content, ContentPath, Tag};
pub use error::{CoreError, Result};
pub use file_mode::{FileModeProvider, HtmlFileMode};
pub use indentation::Indentation;
pub use location::{Index, Item, Location, LocationKind, Page, Section, TagDetailsPage, TagListPage};
pub use site::{SiteGraph, SiteGraphBuilder, TagHtmlConfig};
