//! Error types for output generation.
//!
//! Every failure leaving a task is a [`PublishingError`] naming the path that
//! was being produced. A run collects them into a [`GenerationError`].

use std::{fmt, path::PathBuf};

use quire_core::{ContentPath, LocationKind};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error raised by a theme rendering function.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Plain failure message.
    #[error("{0}")]
    Message(String),

    /// Failure from another library.
    #[error(transparent)]
    Other(BoxError),
}

impl RenderError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn other(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(source))
    }
}

/// Error raised while serializing a document.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SerializeError {
    message: String,
}

impl SerializeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure of a single generation or resource-copy task.
#[derive(Debug, Error)]
pub enum PublishingError {
    /// The theme failed to render a location.
    #[error("failed to render {kind} '{path}'")]
    Render {
        kind: LocationKind,
        path: ContentPath,
        #[source]
        source: RenderError,
    },

    /// The rendered document could not be serialized.
    #[error("failed to serialize '{path}'")]
    Serialize {
        path: ContentPath,
        #[source]
        source: SerializeError,
    },

    /// The output file could not be created or written.
    #[error("failed to write '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A theme resource could not be copied.
    #[error("failed to copy theme resource '{}'", .path.display())]
    ResourceCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PublishingError {
    /// The path this failure is attributed to.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Render { path, .. } | Self::Serialize { path, .. } => path.to_string(),
            Self::Write { path, .. } | Self::ResourceCopy { path, .. } => {
                path.display().to_string()
            }
        }
    }
}

/// Every failure observed during one generation run.
#[derive(Debug)]
pub struct GenerationError {
    failures: Vec<PublishingError>,
}

impl GenerationError {
    /// Wrap collected failures. Callers never pass an empty list.
    pub(crate) fn new(failures: Vec<PublishingError>) -> Self {
        debug_assert!(!failures.is_empty());
        Self { failures }
    }

    /// The failure reported first.
    #[must_use]
    pub fn first(&self) -> Option<&PublishingError> {
        self.failures.first()
    }

    #[must_use]
    pub fn failures(&self) -> &[PublishingError] {
        &self.failures
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failures.as_slice() {
            [] => f.write_str("generation failed"),
            [only] => write!(f, "generation failed: {only}"),
            [first, rest @ ..] => write!(
                f,
                "generation failed: {first} (and {} more failure(s))",
                rest.len()
            ),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.first().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    fn render_failure(path: &str) -> PublishingError {
        PublishingError::Render {
            kind: LocationKind::Section,
            path: ContentPath::new(path),
            source: RenderError::message("boom"),
        }
    }

    #[test]
    fn test_render_error_names_path() {
        let err = render_failure("posts");
        assert_eq!(err.to_string(), "failed to render section 'posts'");
        assert_eq!(err.source().unwrap().to_string(), "boom");
        assert_eq!(err.path(), "posts");
    }

    #[test]
    fn test_library_error_passes_through_render_failure() {
        let err = PublishingError::Render {
            kind: LocationKind::Page,
            path: ContentPath::new("about"),
            source: RenderError::other(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "template missing",
            )),
        };
        assert_eq!(err.to_string(), "failed to render page 'about'");
        assert_eq!(err.source().unwrap().to_string(), "template missing");
    }

    #[test]
    fn test_write_error_names_path() {
        let err = PublishingError::Write {
            path: PathBuf::from("out/page.html"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("out/page.html"));
    }

    #[test]
    fn test_generation_error_display() {
        let single = GenerationError::new(vec![render_failure("a")]);
        assert_eq!(single.to_string(), "generation failed: failed to render section 'a'");

        let many = GenerationError::new(vec![render_failure("a"), render_failure("b")]);
        assert!(many.to_string().ends_with("(and 1 more failure(s))"));
        assert_eq!(many.failures().len(), 2);
    }

    #[test]
    fn test_generation_error_source_is_first_failure() {
        let err = GenerationError::new(vec![render_failure("a"), render_failure("b")]);
        assert_eq!(
            err.source().unwrap().to_string(),
            "failed to render section 'a'"
        );
    }
}
