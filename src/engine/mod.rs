//! Matching engine
//!
//! [`matches`] walks a value and a pattern in lock-step and stops at the
//! first non-conforming node. Failures carry the path from the root to
//! that node; each container frame prepends its own key or index on the
//! way out.

use crate::error::{CheckError, Mismatch, PatternError, Result};
use crate::pattern::keywords::is_identifier_string;
use crate::pattern::{Fields, Kind, Pattern, Refinement};
use crate::value::{Builtin, Class, TypeTag, Value};
use std::collections::BTreeMap;
use tracing::{trace, warn};

pub mod path;

pub use path::{MatchPath, PathSegment};

static UNDEFINED: Pattern = Pattern::Primitive(Kind::Undefined);

fn mismatch(reason: impl Into<String>) -> CheckError {
    CheckError::Mismatch(Mismatch::new(reason))
}

/// Match `value` against `pattern`
///
/// Returns `Ok(())` when the value conforms, [`CheckError::Mismatch`] when
/// it does not, and any other [`CheckError`] for malformed patterns or
/// failing predicates. The path is not folded into the failure message;
/// use [`check`](crate::check) for that.
pub fn matches(value: &Value, pattern: &Pattern) -> Result<()> {
    let pattern = pattern.normalize()?;
    trace!(
        pattern = pattern.variant_name(),
        value_type = %value.type_of(),
        "Matching pattern node"
    );

    match pattern.as_ref() {
        Pattern::Any => Ok(()),
        Pattern::Primitive(Kind::Null) => match value {
            Value::Null => Ok(()),
            other => Err(mismatch(format!("Expected null, got {}", other.describe()))),
        },
        Pattern::Primitive(kind) => match_primitive(value, *kind),
        Pattern::Integer => match value {
            Value::Number(n) if is_int32(*n) => Ok(()),
            other => Err(mismatch(format!("Expected Integer, got {}", other.describe()))),
        },
        Pattern::IdentifierString => match value {
            Value::String(s) if is_identifier_string(s) => Ok(()),
            other => Err(mismatch(format!(
                "Expected identifier string, got {}",
                other.describe()
            ))),
        },
        Pattern::ArrayOf(element) => match_array(value, element),
        Pattern::List(elements) => match elements.as_slice() {
            [element] => match_array(value, element),
            _ => Err(PatternError::BadArrayPattern { len: elements.len() }.into()),
        },
        Pattern::Where(refinement) => match_refinement(value, refinement),
        Pattern::Optional(inner) => match_one_of(value, [&UNDEFINED, inner.as_ref()]),
        Pattern::OneOf(choices) => match_one_of(value, choices),
        Pattern::Constructor(class) => {
            if value.is_instance_of(class) {
                Ok(())
            } else {
                Err(mismatch(format!("Expected {}", class.name())))
            }
        }
        Pattern::ObjectIncluding(fields) => match_fields(value, fields, true),
        Pattern::ObjectHash(element) => match_hash(value, element),
        Pattern::Subclass {
            superclass,
            match_superclass,
        } => match_subclass(value, superclass, *match_superclass),
        Pattern::Object(fields) => match_fields(value, fields, false),
    }
}

fn match_primitive(value: &Value, kind: Kind) -> Result<()> {
    let actual = value.type_of();
    if kind.type_tag() == Some(actual) {
        return Ok(());
    }
    Err(mismatch(format!("Expected {kind}, got {actual}")))
}

/// ToInt32: truncate toward zero and wrap into the signed 32-bit range
fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    const TWO_32: f64 = 4_294_967_296.0;
    const TWO_31: f64 = 2_147_483_648.0;
    let wrapped = n.trunc().rem_euclid(TWO_32);
    let signed = if wrapped >= TWO_31 { wrapped - TWO_32 } else { wrapped };
    signed as i32
}

// Truncate and compare; `n % 1 == 0` would accept large floats like 1.348192308491824e+23
fn is_int32(n: f64) -> bool {
    f64::from(to_int32(n)) == n
}

fn match_array(value: &Value, element: &Pattern) -> Result<()> {
    let Value::Array(items) = value else {
        return Err(mismatch(format!("Expected array, got {}", value.describe())));
    };

    for (index, item) in items.iter().enumerate() {
        matches(item, element).map_err(|err| err.prepend(PathSegment::Index(index)))?;
    }
    Ok(())
}

fn match_refinement(value: &Value, refinement: &Refinement) -> Result<()> {
    match refinement.evaluate(value) {
        Ok(true) => Ok(()),
        Ok(false) => Err(mismatch("Failed Where validation")),
        Err(err) => Err(predicate_error(err)),
    }
}

fn predicate_error(err: anyhow::Error) -> CheckError {
    let err = match err.downcast::<CheckError>() {
        Ok(check_err) => return check_err,
        Err(err) => err,
    };
    match err.downcast::<Mismatch>() {
        Ok(mismatch) => CheckError::Mismatch(mismatch),
        Err(err) => {
            warn!(error = %err, "Where predicate raised an error");
            CheckError::Predicate(err)
        }
    }
}

fn match_one_of<'p>(value: &Value, choices: impl IntoIterator<Item = &'p Pattern>) -> Result<()> {
    for choice in choices {
        match matches(value, choice) {
            Ok(()) => return Ok(()),
            Err(CheckError::Mismatch(_)) => continue,
            Err(other) => return Err(other),
        }
    }
    Err(mismatch("Failed OneOf or Optional validation"))
}

fn match_hash(value: &Value, element: &Pattern) -> Result<()> {
    let Value::Object(object) = value else {
        return Err(mismatch(format!(
            "Expected object hash, got {}",
            value.describe()
        )));
    };
    if object.is_empty() {
        return Err(mismatch("Expected ObjectHash"));
    }

    for (key, item) in object.fields() {
        matches(item, element).map_err(|err| err.prepend(PathSegment::key(key.as_str())))?;
    }
    Ok(())
}

fn match_subclass(value: &Value, superclass: &Class, match_superclass: bool) -> Result<()> {
    match value {
        Value::Class(class) if match_superclass && class == superclass => Ok(()),
        Value::Class(class) if class.is_subclass_of(superclass) => Ok(()),
        // a plain function's prototype is a plain object
        Value::Function(_) if superclass.builtin() == Some(Builtin::Object) => Ok(()),
        _ => Err(mismatch(format!("Expected Subclass of {}", superclass.name()))),
    }
}

fn match_fields(value: &Value, fields: &Fields, unknown_keys_allowed: bool) -> Result<()> {
    match value {
        Value::Null => return Err(mismatch("Expected object, got null")),
        other if other.type_of() != TypeTag::Object => {
            return Err(mismatch(format!("Expected object, got {}", other.type_of())));
        }
        _ => {}
    }

    let mut required: BTreeMap<&str, &Pattern> = BTreeMap::new();
    let mut optional: BTreeMap<&str, &Pattern> = BTreeMap::new();
    for (key, pattern) in fields {
        match pattern {
            Pattern::Optional(inner) => optional.insert(key.as_str(), inner.as_ref()),
            other => required.insert(key.as_str(), other),
        };
    }

    for (key, item) in value.entries() {
        let outcome = if let Some(pattern) = required.remove(&*key) {
            matches(item, pattern)
        } else if let Some(pattern) = optional.get(&*key) {
            matches(item, pattern)
        } else if unknown_keys_allowed {
            Ok(())
        } else {
            Err(mismatch("Unknown key"))
        };
        outcome.map_err(|err| err.prepend(PathSegment::key(&*key)))?;
    }

    match required.keys().next() {
        Some(missing) => Err(mismatch(format!("Missing key '{missing}'"))),
        None => Ok(()),
    }
}
