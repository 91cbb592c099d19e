// File: src/error.rs
// Purpose: Error raised when a raw menu description has an invalid shape

use std::fmt;
use thiserror::Error;

/// One step in the path from the menu root to an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Positional entry, e.g. `[2]`
    Index(usize),
    /// Shorthand group keyed by its label, e.g. `["Admin"]`
    Group(String),
    /// The nested `items` of the previous entry
    Children,
}

/// Location of an item inside a raw menu tree
///
/// Displays as `[2].items[0]` or `["Admin"][1]`; the root itself
/// displays as `<root>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPath(Vec<PathSegment>);

impl ItemPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }

        for segment in &self.0 {
            match segment {
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Group(label) => write!(f, "[{:?}]", label)?,
                PathSegment::Children => write!(f, ".items")?,
            }
        }
        Ok(())
    }
}

/// A raw menu item could not be turned into a typed [`MenuItem`](crate::MenuItem)
///
/// This is a configuration defect: the page author wrote an item the menu
/// cannot understand. Matching problems (unknown routes, broken regular
/// expressions) never produce this error; they just leave the item inactive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid menu item at {path}: {reason}")]
pub struct InvalidItemError {
    pub path: ItemPath,
    pub reason: String,
}

impl InvalidItemError {
    pub(crate) fn new(path: &ItemPath, reason: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            reason: reason.into(),
        }
    }
}
