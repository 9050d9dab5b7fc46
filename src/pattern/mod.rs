//! Pattern model
//!
//! A [`Pattern`] describes the expected shape of a [`Value`]. The set of
//! variants is closed; shorthand forms (a bare constructor, an array
//! literal) are kept as variants of their own and interpreted by
//! [`Pattern::normalize`] at match time.
//!
//! # Example
//!
//! ```
//! use conform_rs::{test, Pattern, Value};
//!
//! let user = Pattern::object([
//!     ("name", Pattern::string()),
//!     ("tags", Pattern::array_of(Pattern::string())),
//!     ("age", Pattern::optional(Pattern::integer())),
//! ]);
//!
//! let value = Value::object([
//!     ("name", Value::from("ada")),
//!     ("tags", Value::array(["admin"])),
//! ]);
//! assert!(test(&value, &user).unwrap());
//! ```

use crate::error::PatternError;
use crate::value::{Class, TypeTag, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub mod def;
pub mod keywords;
pub mod literal;

pub use def::PatternDef;

/// Predicate used by `Where` patterns
///
/// Returning `Ok(false)` is a conformance failure. Returning an error built
/// from a [`CheckError`](crate::CheckError) or [`Mismatch`](crate::Mismatch)
/// (for example by calling [`check`](crate::check) with `?`) propagates that
/// failure; any other error is reported as a predicate error.
pub type Predicate = Arc<dyn Fn(&Value) -> anyhow::Result<bool> + Send + Sync>;

/// Field patterns of an object pattern, by field name
pub type Fields = BTreeMap<String, Pattern>;

/// Primitive kinds matched by runtime tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `function`
    Function,
    /// `undefined`
    Undefined,
    /// `null`, matched by identity rather than by tag
    Null,
}

impl Kind {
    /// Kind name as used in failure messages
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Function => "function",
            Kind::Undefined => "undefined",
            Kind::Null => "null",
        }
    }

    /// Runtime tag this kind requires; `Null` has none of its own
    pub fn type_tag(self) -> Option<TypeTag> {
        match self {
            Kind::String => Some(TypeTag::String),
            Kind::Number => Some(TypeTag::Number),
            Kind::Boolean => Some(TypeTag::Boolean),
            Kind::Function => Some(TypeTag::Function),
            Kind::Undefined => Some(TypeTag::Undefined),
            Kind::Null => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A refinement predicate with an optional label for debugging
#[derive(Clone)]
pub struct Refinement {
    predicate: Predicate,
    label: Option<String>,
}

impl Refinement {
    /// Wrap a predicate
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            label: None,
        }
    }

    /// Attach a label shown by `Debug`
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Run the predicate
    pub fn evaluate(&self, value: &Value) -> anyhow::Result<bool> {
        (self.predicate)(value)
    }

    /// Label, if one was attached
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Where({label})"),
            None => f.write_str("Where(<predicate>)"),
        }
    }
}

/// Expected shape of a value
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches every value
    Any,
    /// Matches by runtime tag; boxed wrappers do not match
    Primitive(Kind),
    /// Number whose 32-bit truncation equals itself
    Integer,
    /// String following the identifier grammar and not a reserved word
    IdentifierString,
    /// Array whose every element matches
    ArrayOf(Box<Pattern>),
    /// Array literal shorthand; must hold exactly one element pattern
    List(Vec<Pattern>),
    /// Value accepted by a predicate
    Where(Refinement),
    /// `undefined` or the inner pattern
    Optional(Box<Pattern>),
    /// First matching choice wins; must not be empty
    OneOf(Vec<Pattern>),
    /// Object with the given fields; other keys are allowed
    ObjectIncluding(Fields),
    /// Non-empty object whose every value matches
    ObjectHash(Box<Pattern>),
    /// Class that extends `superclass` (or is it, when `match_superclass` is set)
    Subclass {
        /// Required ancestor
        superclass: Class,
        /// Whether `superclass` itself is accepted
        match_superclass: bool,
    },
    /// Instance of a class; builtin wrappers and `Object` are shorthands
    Constructor(Class),
    /// Object with exactly the given fields; non-`Optional` fields are required
    Object(Fields),
}

fn fields<K: Into<String>>(fields: impl IntoIterator<Item = (K, Pattern)>) -> Fields {
    fields
        .into_iter()
        .map(|(key, pattern)| (key.into(), pattern))
        .collect()
}

impl Pattern {
    /// Matches every value
    pub fn any() -> Self {
        Pattern::Any
    }

    /// `string`
    pub fn string() -> Self {
        Pattern::Primitive(Kind::String)
    }

    /// `number`, including NaN and infinities
    pub fn number() -> Self {
        Pattern::Primitive(Kind::Number)
    }

    /// `boolean`
    pub fn boolean() -> Self {
        Pattern::Primitive(Kind::Boolean)
    }

    /// `function`, including classes
    pub fn function() -> Self {
        Pattern::Primitive(Kind::Function)
    }

    /// `undefined`
    pub fn undefined() -> Self {
        Pattern::Primitive(Kind::Undefined)
    }

    /// `null`
    pub fn null() -> Self {
        Pattern::Primitive(Kind::Null)
    }

    /// Signed 32-bit integer
    pub fn integer() -> Self {
        Pattern::Integer
    }

    /// Identifier string
    pub fn identifier_string() -> Self {
        Pattern::IdentifierString
    }

    /// Array of elements matching `element`
    pub fn array_of(element: Pattern) -> Self {
        Pattern::ArrayOf(Box::new(element))
    }

    /// Array literal; validated when matched
    pub fn list(elements: Vec<Pattern>) -> Self {
        Pattern::List(elements)
    }

    /// Value accepted by `predicate`
    pub fn where_fn<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Pattern::Where(Refinement::new(Arc::new(predicate)))
    }

    /// `undefined` or `inner`
    pub fn optional(inner: Pattern) -> Self {
        Pattern::Optional(Box::new(inner))
    }

    /// First matching choice wins
    ///
    /// Fails with [`PatternError::EmptyOneOf`] when `choices` is empty.
    pub fn one_of(choices: Vec<Pattern>) -> Result<Self, PatternError> {
        if choices.is_empty() {
            return Err(PatternError::EmptyOneOf);
        }
        Ok(Pattern::OneOf(choices))
    }

    /// Object with the given fields and any number of other keys
    pub fn object_including<K: Into<String>>(
        field_patterns: impl IntoIterator<Item = (K, Pattern)>,
    ) -> Self {
        Pattern::ObjectIncluding(fields(field_patterns))
    }

    /// Non-empty object whose values all match `element`
    pub fn object_hash(element: Pattern) -> Self {
        Pattern::ObjectHash(Box::new(element))
    }

    /// Class extending `superclass`; with `match_superclass`, `superclass` itself too
    pub fn subclass(superclass: Class, match_superclass: bool) -> Self {
        Pattern::Subclass {
            superclass,
            match_superclass,
        }
    }

    /// Instance of `class`
    pub fn instance_of(class: Class) -> Self {
        Pattern::Constructor(class)
    }

    /// Object with exactly the given fields
    pub fn object<K: Into<String>>(field_patterns: impl IntoIterator<Item = (K, Pattern)>) -> Self {
        Pattern::Object(fields(field_patterns))
    }

    /// Short variant name, used in trace output
    pub fn variant_name(&self) -> &'static str {
        match self {
            Pattern::Any => "Any",
            Pattern::Primitive(_) => "Primitive",
            Pattern::Integer => "Integer",
            Pattern::IdentifierString => "IdentifierString",
            Pattern::ArrayOf(_) => "ArrayOf",
            Pattern::List(_) => "List",
            Pattern::Where(_) => "Where",
            Pattern::Optional(_) => "Optional",
            Pattern::OneOf(_) => "OneOf",
            Pattern::ObjectIncluding(_) => "ObjectIncluding",
            Pattern::ObjectHash(_) => "ObjectHash",
            Pattern::Subclass { .. } => "Subclass",
            Pattern::Constructor(_) => "Constructor",
            Pattern::Object(_) => "Object",
        }
    }
}

impl From<Kind> for Pattern {
    fn from(kind: Kind) -> Self {
        Pattern::Primitive(kind)
    }
}

impl From<Class> for Pattern {
    fn from(class: Class) -> Self {
        Pattern::Constructor(class)
    }
}

impl From<Vec<Pattern>> for Pattern {
    fn from(elements: Vec<Pattern>) -> Self {
        Pattern::List(elements)
    }
}
