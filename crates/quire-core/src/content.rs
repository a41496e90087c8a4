//! Content types and structures.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logical, output-relative path of a piece of content.
///
/// Segments are separated by `/`. Leading and trailing slashes are stripped on
/// construction, so `"/blog/post/"` and `"blog/post"` are the same path.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ContentPath(String);

impl ContentPath {
    /// Create a path, normalizing surrounding slashes.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim_matches('/');
        if trimmed.len() == path.len() {
            Self(path)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// The path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Append a segment (or a sub-path) to this path.
    #[must_use]
    pub fn join(&self, other: impl AsRef<str>) -> Self {
        let other = other.as_ref().trim_matches('/');
        match (self.is_empty(), other.is_empty()) {
            (true, _) => Self::new(other),
            (false, true) => self.clone(),
            (false, false) => Self(format!("{}/{other}", self.0)),
        }
    }

    /// Append a literal suffix to the last segment, e.g. an extension.
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{suffix}", self.0))
    }

    /// The path without its last segment, if it has more than one.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.rfind('/').map(|pos| Self(self.0[..pos].to_string()))
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ContentPath {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<ContentPath> for String {
    fn from(value: ContentPath) -> Self {
        value.0
    }
}

/// Semantic content attached to every location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Title shown in the rendered document.
    #[serde(default)]
    pub title: String,

    /// Short description/summary.
    #[serde(default)]
    pub description: Option<String>,

    /// Pre-rendered body markup.
    #[serde(default)]
    pub body: String,

    /// Publication date.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl Content {
    /// Create content with just a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A tag attached to items.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Create a tag from its display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The tag as written by the author.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// URL-safe form: lowercase, whitespace becomes `-`, other symbols are dropped.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0
            .chars()
            .filter_map(|c| {
                if c.is_whitespace() {
                    Some('-')
                } else if c.is_alphanumeric() {
                    Some(c)
                } else {
                    None
                }
            })
            .flat_map(char::to_lowercase)
            .collect()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_path_trims_slashes() {
        assert_eq!(ContentPath::new("/blog/post/").as_str(), "blog/post");
        assert_eq!(ContentPath::new("blog/post").as_str(), "blog/post");
    }

    #[test]
    fn test_content_path_join() {
        let base = ContentPath::new("tags");
        assert_eq!(base.join("rust").as_str(), "tags/rust");
        assert_eq!(base.join("/rust/").as_str(), "tags/rust");
        assert_eq!(ContentPath::default().join("rust").as_str(), "rust");
        assert_eq!(base.join("").as_str(), "tags");
    }

    #[test]
    fn test_content_path_segments_and_parent() {
        let path = ContentPath::new("a/b/c");
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(path.parent(), Some(ContentPath::new("a/b")));
        assert_eq!(ContentPath::new("a").parent(), None);
    }

    #[test]
    fn test_tag_normalized() {
        assert_eq!(Tag::new("Swift Concurrency").normalized(), "swift-concurrency");
        assert_eq!(Tag::new("C++").normalized(), "c");
        assert_eq!(Tag::new("rust").normalized(), "rust");
    }

    #[test]
    fn test_content_builders() {
        let content = Content::titled("Hello")
            .with_body("<p>Hi</p>")
            .with_description("greeting");
        assert_eq!(content.title, "Hello");
        assert_eq!(content.body, "<p>Hi</p>");
        assert_eq!(content.description.as_deref(), Some("greeting"));
    }
}
