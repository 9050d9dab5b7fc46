//! Dynamic values inspected by the matching engine
//!
//! [`Value`] models a dynamically typed runtime: every value has a runtime
//! tag ([`TypeTag`]) and may be an instance of one or more [`Class`]es.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub mod class;

pub use class::{Builtin, Class, Function};

/// Runtime tag of a value, as reported by `typeof`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `undefined`
    Undefined,
    /// `object` (also null and arrays)
    Object,
    /// `boolean`
    Boolean,
    /// `number`
    Number,
    /// `string`
    String,
    /// `function` (functions and classes)
    Function,
}

impl TypeTag {
    /// Tag name
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Undefined => "undefined",
            TypeTag::Object => "object",
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Function => "function",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object: a set of named fields plus the class it was constructed from
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    class: Class,
    fields: BTreeMap<String, Value>,
}

impl Object {
    /// Create an empty plain object
    pub fn new() -> Self {
        Self::instance_of(Class::object())
    }

    /// Create an empty instance of `class`
    pub fn instance_of(class: Class) -> Self {
        Self {
            class,
            fields: BTreeMap::new(),
        }
    }

    /// Insert a field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Look up a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields in key order
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// The class this object was constructed from
    pub fn class(&self) -> &Class {
        &self.class
    }

    /// True if this is a plain `Object`, not an instance of another class
    pub fn is_plain(&self) -> bool {
        self.class == Class::object()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the object has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut object = Object::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

/// A dynamically typed value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Undefined,
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number value; NaN and infinities included
    Number(f64),
    /// String value - using Arc for cheap cloning
    String(Arc<str>),
    /// Plain callable
    Function(Function),
    /// Constructor
    Class(Class),
    /// Array of values
    Array(Vec<Value>),
    /// Object mapping keys to values
    Object(Object),
}

impl Value {
    /// Build a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Arc::from(s.as_ref()))
    }

    /// Build an array value
    pub fn array(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Build a plain object value
    pub fn object<K: Into<String>, V: Into<Value>>(
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Value::Object(fields.into_iter().collect())
    }

    /// Build an instance of `class` with the given fields
    pub fn instance<K: Into<String>, V: Into<Value>>(
        class: Class,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let mut object = Object::instance_of(class);
        for (key, value) in fields {
            object.insert(key, value);
        }
        Value::Object(object)
    }

    /// Runtime tag, as `typeof` reports it
    pub fn type_of(&self) -> TypeTag {
        match self {
            Value::Undefined => TypeTag::Undefined,
            Value::Null | Value::Array(_) | Value::Object(_) => TypeTag::Object,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Function(_) | Value::Class(_) => TypeTag::Function,
        }
    }

    /// The constructor of this value; primitives have none
    pub fn constructor(&self) -> Option<Class> {
        match self {
            Value::Array(_) => Some(Class::array()),
            Value::Function(_) | Value::Class(_) => Some(Class::function()),
            Value::Object(object) => Some(object.class().clone()),
            _ => None,
        }
    }

    /// `instanceof`: true if `class` is the constructor of this value or one of its ancestors
    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.constructor()
            .is_some_and(|constructor| constructor.inherits_from(class))
    }

    /// Enumerable entries: object fields, or array elements keyed by index
    pub fn entries(&self) -> Box<dyn Iterator<Item = (Cow<'_, str>, &Value)> + '_> {
        match self {
            Value::Object(object) => Box::new(
                object
                    .fields()
                    .iter()
                    .map(|(key, value)| (Cow::Borrowed(key.as_str()), value)),
            ),
            Value::Array(items) => Box::new(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, value)| (Cow::Owned(index.to_string()), value)),
            ),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Get the string content, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value for failure messages
    ///
    /// Numbers render the way `Number.prototype.toString` does (`4`,
    /// `1e-7`, `1.348192308491824e+23`), strings quoted, containers as
    /// compact JSON and callables by name.
    pub fn describe(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Number(n) => format_number(*n),
            Value::Function(function) => format!("function {}", function.name()),
            Value::Class(class) => format!("class {}", class.name()),
            other => {
                let mut out = String::new();
                other.write_json(&mut out);
                out
            }
        }
    }

    // JSON.stringify rules: non-finite numbers and callables become null
    // inside arrays and are skipped inside objects, as is undefined
    fn write_json(&self, out: &mut String) {
        match self {
            Value::Undefined | Value::Null | Value::Function(_) | Value::Class(_) => {
                out.push_str("null")
            }
            Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) if n.is_finite() => out.push_str(&format_number(*n)),
            Value::Number(_) => out.push_str("null"),
            Value::String(s) => out.push_str(&quote(s)),
            Value::Array(items) => {
                out.push('[');
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    item.write_json(out);
                }
                out.push(']');
            }
            Value::Object(object) => {
                out.push('{');
                let visible = object.fields().iter().filter(|(_, value)| {
                    !matches!(value, Value::Undefined | Value::Function(_) | Value::Class(_))
                });
                for (index, (key, value)) in visible.enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    out.push_str(&quote(key));
                    out.push(':');
                    value.write_json(out);
                }
                out.push('}');
            }
        }
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}

// Largest magnitude below which every integral f64 is exact
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Number to string with shortest round-trip digits, switching to
/// exponent notation outside `1e-6 <= |n| < 1e21`
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == f64::INFINITY {
        return "Infinity".to_string();
    }
    if n == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "1.348192308491824e23"
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let k = digits.len() as i32;
    let point = exponent + 1;

    let body = if k <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        let exponent = exponent.abs();
        if rest.is_empty() {
            format!("{first}e{sign}{exponent}")
        } else {
            format!("{first}.{rest}e{sign}{exponent}")
        }
    };

    if n < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Class> for Value {
    fn from(class: Class) -> Self {
        Value::Class(class)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(b),
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => {
                    tracing::warn!("Unable to convert JSON number {} to f64", n);
                    Value::Number(f64::NAN)
                }
            },
            JsonValue::String(s) => Value::String(Arc::from(s)),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Object(map.into_iter().collect()),
        }
    }
}

// Callables and undefined have no JSON form and serialize as null
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Undefined | Value::Null | Value::Function(_) | Value::Class(_) => {
                serializer.serialize_none()
            }
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => items.serialize(serializer),
            Value::Object(object) => object.fields().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        JsonValue::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Undefined.type_of(), TypeTag::Undefined);
        assert_eq!(Value::Null.type_of(), TypeTag::Object);
        assert_eq!(Value::from(f64::NAN).type_of(), TypeTag::Number);
        assert_eq!(Value::from("x").type_of(), TypeTag::String);
        assert_eq!(Value::array(vec![1, 2]).type_of(), TypeTag::Object);
        assert_eq!(Value::from(Function::anonymous()).type_of(), TypeTag::Function);
        assert_eq!(Value::from(Class::new("Test")).type_of(), TypeTag::Function);
        assert_eq!(
            Value::instance(Class::string(), Vec::<(String, Value)>::new()).type_of(),
            TypeTag::Object
        );
    }

    #[test]
    fn test_instance_of() {
        let parent = Class::new("Parent");
        let child = parent.extend("Child");
        let instance = Value::instance(child.clone(), [("name", "x")]);

        assert!(instance.is_instance_of(&child));
        assert!(instance.is_instance_of(&parent));
        assert!(instance.is_instance_of(&Class::object()));
        assert!(!instance.is_instance_of(&Class::array()));

        assert!(Value::array(Vec::<Value>::new()).is_instance_of(&Class::array()));
        assert!(Value::from(Function::anonymous()).is_instance_of(&Class::function()));
        assert!(!Value::from("s").is_instance_of(&Class::string()));
        assert!(!Value::Null.is_instance_of(&Class::object()));
    }

    #[test]
    fn test_entries() {
        let object = Value::object([("b", 2), ("a", 1)]);
        let keys: Vec<String> = object.entries().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["a", "b"]);

        let array = Value::array(["x", "y"]);
        let keys: Vec<String> = array.entries().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["0", "1"]);

        assert_eq!(Value::from(3).entries().count(), 0);
    }

    #[test]
    fn test_describe() {
        assert_eq!(Value::Undefined.describe(), "undefined");
        assert_eq!(Value::Null.describe(), "null");
        assert_eq!(Value::from(4).describe(), "4");
        assert_eq!(Value::from(8.5).describe(), "8.5");
        assert_eq!(Value::from(f64::INFINITY).describe(), "Infinity");
        assert_eq!(Value::from("hi").describe(), "\"hi\"");
        assert_eq!(Value::array(vec![1, 2]).describe(), "[1,2]");
        assert_eq!(Value::object([("a", true)]).describe(), "{\"a\":true}");
        assert_eq!(Value::from(Function::new("f")).describe(), "function f");
    }

    #[test]
    fn test_describe_numbers() {
        assert_eq!(format_number(1.348_192_308_491_824e23), "1.348192308491824e+23");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(0.000_001), "0.000001");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(123.456), "123.456");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_describe_containers_follow_json_stringify() {
        let value = Value::array([
            Value::from(1e-7),
            Value::from(f64::NAN),
            Value::Undefined,
            Value::from(Function::new("f")),
        ]);
        assert_eq!(value.describe(), "[1e-7,null,null,null]");

        let value = Value::object([
            ("big", Value::from(1.348_192_308_491_824e23)),
            ("gone", Value::Undefined),
            ("name", Value::from("a\"b")),
        ]);
        assert_eq!(
            value.describe(),
            r#"{"big":1.348192308491824e+23,"name":"a\"b"}"#
        );
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({
            "name": "x",
            "tags": ["a", "b"],
            "count": 3,
            "missing": null
        }));

        let Value::Object(object) = &value else {
            panic!("expected object");
        };
        assert!(object.is_plain());
        assert_eq!(object.get("count"), Some(&Value::Number(3.0)));
        assert_eq!(object.get("missing"), Some(&Value::Null));
        assert_eq!(object.get("tags"), Some(&Value::array(["a", "b"])));
    }

    #[test]
    fn test_deserialize_roundtrip_through_json() {
        let value: Value = serde_json::from_str(r#"{"a":[1,"two",false]}"#).unwrap();
        let back = serde_json::to_value(&value).unwrap();
        assert_eq!(back, json!({"a": [1, "two", false]}));
        assert_eq!(serde_json::to_string(&Value::from(2.5)).unwrap(), "2.5");
    }
}
