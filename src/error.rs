/// Error types for structural checking
use crate::engine::path::{MatchPath, PathSegment};
use std::fmt;
use thiserror::Error;

/// Main error type returned by the matching engine and the check entry points
#[derive(Error, Debug)]
pub enum CheckError {
    /// The value does not conform to the pattern
    #[error(transparent)]
    Mismatch(#[from] Mismatch),

    /// The pattern itself is malformed
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A `Where` predicate failed with an error that is not a conformance failure
    #[error("Where predicate raised an error: {0}")]
    Predicate(anyhow::Error),
}

impl CheckError {
    /// Returns true if this is a conformance failure
    pub fn is_mismatch(&self) -> bool {
        matches!(self, CheckError::Mismatch(_))
    }

    /// Returns the conformance failure, if this is one
    pub fn as_mismatch(&self) -> Option<&Mismatch> {
        match self {
            CheckError::Mismatch(mismatch) => Some(mismatch),
            _ => None,
        }
    }

    /// Prepend a path segment to a conformance failure; other errors pass through untouched
    pub(crate) fn prepend(self, segment: PathSegment) -> Self {
        match self {
            CheckError::Mismatch(mismatch) => CheckError::Mismatch(mismatch.prepend(segment)),
            other => other,
        }
    }
}

/// Result type alias for check operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// A conformance failure: the value did not match the pattern
///
/// The path is accumulated while the failure propagates out of nested
/// containers. It is folded into the message once, by the outermost
/// `check` call; until then [`Mismatch::message`] is just the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    reason: String,
    path: MatchPath,
    finalized: bool,
}

impl Mismatch {
    /// Create a failure with no path
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            path: MatchPath::default(),
            finalized: false,
        }
    }

    /// The reason the value failed, without the field suffix
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Human-readable message
    ///
    /// Once finalized by `check`, a non-empty path is appended as
    /// `" in field <path>"`.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Rendered structural path, if the failure happened below the root
    pub fn path(&self) -> Option<String> {
        self.path.render()
    }

    /// Path segments, outermost first
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.path.segments()
    }

    /// Whether the field suffix has been applied to the message
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub(crate) fn prepend(mut self, segment: PathSegment) -> Self {
        self.path.prepend(segment);
        self
    }

    pub(crate) fn finalize(mut self) -> Self {
        self.finalized = true;
        self
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path.render() {
            Some(path) if self.finalized => write!(f, "{} in field {}", self.reason, path),
            _ => f.write_str(&self.reason),
        }
    }
}

impl std::error::Error for Mismatch {}

/// Errors raised for malformed patterns
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// `OneOf` was built with zero choices
    #[error("Must provide at least one choice to OneOf")]
    EmptyOneOf,

    /// An array literal pattern did not have exactly one element
    #[error("Bad pattern: arrays must have one type element, got {len}")]
    BadArrayPattern {
        /// Number of elements in the offending literal
        len: usize,
    },

    /// A literal value cannot be interpreted as a pattern
    #[error("Bad pattern: unknown pattern type '{type_of}'")]
    UnknownLiteral {
        /// Runtime tag of the offending literal
        type_of: &'static str,
    },

    /// A declarative pattern definition is invalid
    #[error("Invalid pattern definition: {reason}")]
    Definition {
        /// Why the definition was rejected
        reason: String,
    },
}

/// Errors raised while loading checker configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An environment variable held a value that is not a boolean
    #[error("Invalid value '{value}' for environment variable {var}")]
    Env {
        /// Variable name
        var: String,
        /// Raw value found
        value: String,
    },
}
