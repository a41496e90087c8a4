//! Output path policy.
//!
//! An [`HtmlFileMode`] turns a location's logical path into the output-relative
//! path of its HTML file. Resolution is a pure function of the location: the
//! same location and mode always produce the same path. Custom modes are not
//! validated; a bad path only surfaces when the file is written.

use std::{fmt, sync::Arc};

use crate::{
    content::ContentPath,
    location::{Location, LocationKind},
};

/// Placeholder substituted by [`HtmlFileMode::format`].
pub const FORMAT_PLACEHOLDER: &str = "%@";

type PathProcessor = dyn Fn(&dyn Location) -> ContentPath + Send + Sync;

/// How HTML files are laid out on disk.
#[derive(Clone)]
pub enum HtmlFileMode {
    /// `section/item` becomes `section/item.html`.
    StandAlone,
    /// `section/item` becomes `section/item/index.html`.
    FoldersAndIndexFiles,
    /// Arbitrary mapping from location to path.
    Custom(Arc<PathProcessor>),
}

impl HtmlFileMode {
    /// A custom mode from a closure.
    pub fn custom<F>(processor: F) -> Self
    where
        F: Fn(&dyn Location) -> ContentPath + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(processor))
    }

    /// Use the location's path unchanged.
    #[must_use]
    pub fn literal() -> Self {
        Self::custom(|location| location.path().clone())
    }

    /// Substitute the location's path for every `%@` in `template`.
    ///
    /// `format("%@.htm")` maps `about` to `about.htm`.
    pub fn format(template: impl Into<String>) -> Self {
        let template = template.into();
        Self::custom(move |location| {
            ContentPath::new(template.replace(FORMAT_PLACEHOLDER, location.path().as_str()))
        })
    }

    /// Compute the output-relative path of `location`.
    #[must_use]
    pub fn resolve(&self, location: &dyn Location) -> ContentPath {
        match self {
            Self::StandAlone => location.path().with_suffix(".html"),
            Self::FoldersAndIndexFiles => location.path().join("index.html"),
            Self::Custom(processor) => processor(location),
        }
    }
}

impl Default for HtmlFileMode {
    fn default() -> Self {
        Self::FoldersAndIndexFiles
    }
}

impl fmt::Debug for HtmlFileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StandAlone => f.write_str("StandAlone"),
            Self::FoldersAndIndexFiles => f.write_str("FoldersAndIndexFiles"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

type ModeSelector = dyn Fn(&dyn Location) -> HtmlFileMode + Send + Sync;

/// Picks a file mode per location.
///
/// Applied to items, pages and tag details pages. Must stay free of side
/// effects since it is called from generation workers.
#[derive(Clone)]
pub struct FileModeProvider(Arc<ModeSelector>);

impl FileModeProvider {
    /// The same mode for every location.
    #[must_use]
    pub fn uniform(mode: HtmlFileMode) -> Self {
        Self::from_fn(move |_| mode.clone())
    }

    pub fn from_fn<F>(select: F) -> Self
    where
        F: Fn(&dyn Location) -> HtmlFileMode + Send + Sync + 'static,
    {
        Self(Arc::new(select))
    }

    /// Per-kind modes with a fallback for kinds not listed.
    #[must_use]
    pub fn by_kind(default: HtmlFileMode, overrides: Vec<(LocationKind, HtmlFileMode)>) -> Self {
        Self::from_fn(move |location| {
            let kind = location.kind();
            overrides
                .iter()
                .find(|(k, _)| *k == kind)
                .map_or_else(|| default.clone(), |(_, mode)| mode.clone())
        })
    }

    #[must_use]
    pub fn mode_for(&self, location: &dyn Location) -> HtmlFileMode {
        (self.0)(location)
    }
}

impl Default for FileModeProvider {
    fn default() -> Self {
        Self::uniform(HtmlFileMode::default())
    }
}

impl From<HtmlFileMode> for FileModeProvider {
    fn from(mode: HtmlFileMode) -> Self {
        Self::uniform(mode)
    }
}

impl fmt::Debug for FileModeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FileModeProvider(..)")
    }
}
