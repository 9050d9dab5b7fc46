//! Literal pattern interpretation
//!
//! Shorthand forms are resolved here, once per node, before the engine
//! dispatches on the variant:
//!
//! - `Constructor(Object)` is the generic object marker, `ObjectIncluding({})`
//! - `Constructor(String | Number | Boolean | Function)` checks the runtime tag
//! - `List` must hold exactly one element pattern

use super::{Fields, Kind, Pattern};
use crate::error::PatternError;
use crate::value::{Builtin, Value};
use std::borrow::Cow;

impl Pattern {
    /// Resolve shorthand forms
    ///
    /// Returns the pattern unchanged when it is not a shorthand, and a
    /// [`PatternError`] when a shorthand is malformed.
    pub fn normalize(&self) -> Result<Cow<'_, Pattern>, PatternError> {
        match self {
            Pattern::Constructor(class) => Ok(match class.builtin() {
                Some(Builtin::Object) => Cow::Owned(Pattern::ObjectIncluding(Fields::new())),
                Some(Builtin::String) => Cow::Owned(Pattern::Primitive(Kind::String)),
                Some(Builtin::Number) => Cow::Owned(Pattern::Primitive(Kind::Number)),
                Some(Builtin::Boolean) => Cow::Owned(Pattern::Primitive(Kind::Boolean)),
                Some(Builtin::Function) => Cow::Owned(Pattern::Primitive(Kind::Function)),
                _ => Cow::Borrowed(self),
            }),
            Pattern::List(elements) if elements.len() != 1 => Err(PatternError::BadArrayPattern {
                len: elements.len(),
            }),
            Pattern::OneOf(choices) if choices.is_empty() => Err(PatternError::EmptyOneOf),
            _ => Ok(Cow::Borrowed(self)),
        }
    }

    /// Interpret a dynamic value as a pattern
    ///
    /// Classes become constructor patterns, `undefined` and `null` their
    /// kinds, arrays become array literals and plain objects field
    /// mappings. Any other value is not a pattern.
    pub fn from_literal(literal: &Value) -> Result<Pattern, PatternError> {
        match literal {
            Value::Class(class) => Ok(Pattern::Constructor(class.clone())),
            Value::Undefined => Ok(Pattern::Primitive(Kind::Undefined)),
            Value::Null => Ok(Pattern::Primitive(Kind::Null)),
            Value::Array(items) => items
                .iter()
                .map(Pattern::from_literal)
                .collect::<Result<Vec<_>, _>>()
                .map(Pattern::List),
            Value::Object(object) if object.is_plain() => object
                .fields()
                .iter()
                .map(|(key, value)| Ok((key.clone(), Pattern::from_literal(value)?)))
                .collect::<Result<Fields, _>>()
                .map(Pattern::Object),
            other => Err(PatternError::UnknownLiteral {
                type_of: other.type_of().as_str(),
            }),
        }
    }
}
