//! Declarative pattern definitions
//!
//! Patterns can be written as data and loaded with serde, which is handy
//! for checking configuration files or API payloads against a shape kept
//! next to them.
//!
//! # Example
//!
//! ```
//! use conform_rs::{test, Pattern, Value};
//!
//! # fn example() -> anyhow::Result<()> {
//! let pattern = Pattern::from_yaml(r#"
//! name: string
//! ports: [integer]
//! labels:
//!   $hash: string
//! owner:
//!   $optional: identifier
//! "#)?;
//!
//! let value = Value::from(serde_json::json!({
//!     "name": "web",
//!     "ports": [80, 443],
//!     "labels": {"tier": "frontend"}
//! }));
//! assert!(test(&value, &pattern)?);
//! # Ok(())
//! # }
//! ```
//!
//! Grammar:
//! - a string names a type: `any`, `string`, `number`, `boolean`,
//!   `function`, `undefined`, `null`, `integer`, `identifier`, `object`,
//!   `array`, `date`
//! - a one-element sequence is an array of that element
//! - a mapping is an object with exactly those fields, unless its only key
//!   is one of the operators `$optional`, `$one_of`, `$including`, `$hash`

use super::{Fields, Pattern};
use crate::error::PatternError;
use crate::value::Class;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const OPTIONAL: &str = "$optional";
const ONE_OF: &str = "$one_of";
const INCLUDING: &str = "$including";
const HASH: &str = "$hash";

/// A pattern written as data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternDef {
    /// `null`
    Null,
    /// Type name
    Type(String),
    /// Array shorthand
    List(Vec<PatternDef>),
    /// Field mapping or operator
    Fields(BTreeMap<String, PatternDef>),
}

impl PatternDef {
    /// Build the pattern this definition describes
    pub fn into_pattern(self) -> Result<Pattern, PatternError> {
        match self {
            PatternDef::Null => Ok(Pattern::null()),
            PatternDef::Type(name) => type_pattern(&name),
            PatternDef::List(mut elements) => {
                if elements.len() != 1 {
                    return Err(definition_error(format!(
                        "array definitions must have one element, got {}",
                        elements.len()
                    )));
                }
                let element = elements.remove(0).into_pattern()?;
                Ok(Pattern::array_of(element))
            }
            PatternDef::Fields(mut fields) => {
                if fields.len() == 1 && fields.keys().all(|key| is_operator(key)) {
                    if let Some((operator, operand)) = fields.pop_first() {
                        return operator_pattern(&operator, operand);
                    }
                }
                Ok(Pattern::Object(build_fields(fields)?))
            }
        }
    }
}

fn is_operator(key: &str) -> bool {
    matches!(key, OPTIONAL | ONE_OF | INCLUDING | HASH)
}

fn operator_pattern(operator: &str, operand: PatternDef) -> Result<Pattern, PatternError> {
    match (operator, operand) {
        (OPTIONAL, operand) => Ok(Pattern::optional(operand.into_pattern()?)),
        (HASH, operand) => Ok(Pattern::object_hash(operand.into_pattern()?)),
        (ONE_OF, PatternDef::List(choices)) => {
            let choices = choices
                .into_iter()
                .map(PatternDef::into_pattern)
                .collect::<Result<Vec<_>, _>>()?;
            Pattern::one_of(choices)
        }
        (INCLUDING, PatternDef::Fields(fields)) => {
            Ok(Pattern::ObjectIncluding(build_fields(fields)?))
        }
        (ONE_OF, _) => Err(definition_error(format!("{ONE_OF} takes a sequence of definitions"))),
        (INCLUDING, _) => Err(definition_error(format!("{INCLUDING} takes a mapping of fields"))),
        (other, _) => Err(definition_error(format!("unknown operator '{other}'"))),
    }
}

fn build_fields(fields: BTreeMap<String, PatternDef>) -> Result<Fields, PatternError> {
    fields
        .into_iter()
        .map(|(key, def)| Ok((key, def.into_pattern()?)))
        .collect()
}

fn type_pattern(name: &str) -> Result<Pattern, PatternError> {
    Ok(match name {
        "any" => Pattern::any(),
        "string" => Pattern::string(),
        "number" => Pattern::number(),
        "boolean" => Pattern::boolean(),
        "function" => Pattern::function(),
        "undefined" => Pattern::undefined(),
        "null" => Pattern::null(),
        "integer" => Pattern::integer(),
        "identifier" => Pattern::identifier_string(),
        "object" => Pattern::instance_of(Class::object()),
        "array" => Pattern::instance_of(Class::array()),
        "date" => Pattern::instance_of(Class::date()),
        other => return Err(definition_error(format!("unknown type '{other}'"))),
    })
}

fn definition_error(reason: String) -> PatternError {
    PatternError::Definition { reason }
}

impl Pattern {
    /// Parse a YAML (or JSON) pattern definition
    pub fn from_yaml(source: &str) -> Result<Pattern, PatternError> {
        let def: PatternDef =
            serde_yaml::from_str(source).map_err(|e| definition_error(e.to_string()))?;
        def.into_pattern()
    }
}
