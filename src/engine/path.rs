//! Structural paths for conformance failures
//!
//! A path is collected innermost-first while a failure propagates out of
//! nested containers and rendered outer-to-inner, e.g. `items[2].name`.
//!
//! Rendering rules:
//! - an array index, or a key made only of ASCII digits, renders as `[n]`
//! - a key that is a valid identifier and not a reserved word renders verbatim
//! - any other key renders as a bracketed JSON string, e.g. `["first name"]`
//! - named segments are joined with `.`; bracketed segments take no separator

use crate::pattern::keywords::is_identifier_string;
use std::borrow::Cow;
use std::fmt;

/// One step of a structural path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Position inside an array
    Index(usize),
    /// Key inside a mapping
    Key(String),
}

impl PathSegment {
    /// Create a key segment
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }

    /// Render this segment on its own
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            PathSegment::Index(index) => Cow::Owned(format!("[{index}]")),
            PathSegment::Key(key) if is_numeric_key(key) => Cow::Owned(format!("[{key}]")),
            PathSegment::Key(key) if is_identifier_string(key) => Cow::Borrowed(key),
            PathSegment::Key(key) => Cow::Owned(quote_key(key)),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn is_numeric_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

fn quote_key(key: &str) -> String {
    serde_json::to_string(&[key]).unwrap_or_else(|_| format!("[{key:?}]"))
}

/// Path accumulated by a failure
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPath {
    // innermost segment first
    reversed: Vec<PathSegment>,
}

impl MatchPath {
    /// Returns true if no segment has been recorded
    pub fn is_empty(&self) -> bool {
        self.reversed.is_empty()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.reversed.len()
    }

    /// Add a segment on the outer side of the path
    pub fn prepend(&mut self, segment: PathSegment) {
        self.reversed.push(segment);
    }

    /// Segments, outermost first
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.reversed.iter().rev()
    }

    /// Render the path, or `None` when it is empty
    pub fn render(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut out = String::new();
        for segment in self.segments() {
            let rendered = segment.render();
            if !out.is_empty() && !rendered.starts_with('[') {
                out.push('.');
            }
            out.push_str(&rendered);
        }
        Some(out)
    }
}

impl fmt::Display for MatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render().as_deref().unwrap_or_default())
    }
}
