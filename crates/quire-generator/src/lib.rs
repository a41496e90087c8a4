//! Quire Generator Library
//!
//! Concurrent HTML output generation for Quire sites.
//!
//! # Modules
//!
//! - [`document`] - Serializable documents and a minimal HTML tree
//! - [`fs`] - File system layer with local and in-memory backends
//! - [`context`] - Read-only view of the site handed to renderers
//! - [`theme`] - Rendering functions and resources
//! - [`task`] - Generation of a single output file
//! - [`group`] - Result collection and cancellation across tasks
//! - [`resources`] - Theme resource copying
//! - [`generator`] - Concurrent generation of a whole site
//! - [`build`] - Build orchestration

pub mod build;
pub mod context;
pub mod document;
pub mod error;
pub mod fs;
pub mod generator;
pub mod group;
pub mod resources;
pub mod task;
pub mod theme;

pub use build::{BuildError, BuildStats, Publisher};
pub use context::PublishingContext;
pub use document::{Document, Element, Html, Node};
pub use error::{GenerationError, PublishingError, RenderError, SerializeError};
pub use fs::{FileSystem, FsOperation, LocalFileSystem, MemoryFileSystem, OutputFolder};
pub use generator::HtmlGenerator;
pub use group::{GenerationStats, TaskGroup};
pub use resources::ResourceCopier;
pub use task::{GenerationTask, RenderTarget, TaskOutcome};
pub use theme::{OptionalRenderResult, RenderResult, Theme};
