//! Indentation policy for serialized documents.

use serde::{Deserialize, Serialize};

/// Indentation applied per nesting level.
///
/// Absence of an `Indentation` (`None`) means compact output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indentation {
    Spaces(usize),
    Tabs(usize),
}

impl Indentation {
    /// The string inserted for one nesting level.
    #[must_use]
    pub fn unit(&self) -> String {
        match *self {
            Self::Spaces(n) => " ".repeat(n),
            Self::Tabs(n) => "\t".repeat(n),
        }
    }

    /// The string inserted at `depth`.
    #[must_use]
    pub fn at_depth(&self, depth: usize) -> String {
        self.unit().repeat(depth)
    }
}
