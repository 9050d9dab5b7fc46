//! Constructors and callables
//!
//! A [`Class`] is a named constructor with an optional superclass. Classes
//! and [`Function`]s compare by identity: two classes with the same name
//! are still different classes.

use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

/// Constructors that exist before any user code runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `Object`, root of every class chain
    Object,
    /// `Function`
    Function,
    /// `Array`
    Array,
    /// `String` (boxed wrapper)
    String,
    /// `Number` (boxed wrapper)
    Number,
    /// `Boolean` (boxed wrapper)
    Boolean,
    /// `Date`
    Date,
}

impl Builtin {
    /// Constructor name
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Object => "Object",
            Builtin::Function => "Function",
            Builtin::Array => "Array",
            Builtin::String => "String",
            Builtin::Number => "Number",
            Builtin::Boolean => "Boolean",
            Builtin::Date => "Date",
        }
    }

    /// The shared class object for this builtin
    pub fn class(self) -> Class {
        match self {
            Builtin::Object => OBJECT.clone(),
            Builtin::Function => FUNCTION.clone(),
            Builtin::Array => ARRAY.clone(),
            Builtin::String => STRING.clone(),
            Builtin::Number => NUMBER.clone(),
            Builtin::Boolean => BOOLEAN.clone(),
            Builtin::Date => DATE.clone(),
        }
    }
}

static OBJECT: Lazy<Class> =
    Lazy::new(|| Class::from_parts(Builtin::Object.name(), None, Some(Builtin::Object)));
static FUNCTION: Lazy<Class> = Lazy::new(|| builtin_subclass(Builtin::Function));
static ARRAY: Lazy<Class> = Lazy::new(|| builtin_subclass(Builtin::Array));
static STRING: Lazy<Class> = Lazy::new(|| builtin_subclass(Builtin::String));
static NUMBER: Lazy<Class> = Lazy::new(|| builtin_subclass(Builtin::Number));
static BOOLEAN: Lazy<Class> = Lazy::new(|| builtin_subclass(Builtin::Boolean));
static DATE: Lazy<Class> = Lazy::new(|| builtin_subclass(Builtin::Date));

fn builtin_subclass(builtin: Builtin) -> Class {
    Class::from_parts(builtin.name(), Some(OBJECT.clone()), Some(builtin))
}

struct ClassInner {
    name: Arc<str>,
    parent: Option<Class>,
    builtin: Option<Builtin>,
}

/// A constructor
#[derive(Clone)]
pub struct Class(Arc<ClassInner>);

impl Class {
    /// Create a class whose superclass is `Object`
    pub fn new(name: impl AsRef<str>) -> Self {
        Self::from_parts(name.as_ref(), Some(OBJECT.clone()), None)
    }

    /// Create a subclass of `self`
    pub fn extend(&self, name: impl AsRef<str>) -> Self {
        Self::from_parts(name.as_ref(), Some(self.clone()), None)
    }

    fn from_parts(name: &str, parent: Option<Class>, builtin: Option<Builtin>) -> Self {
        Class(Arc::new(ClassInner {
            name: Arc::from(name),
            parent,
            builtin,
        }))
    }

    /// `Object`
    pub fn object() -> Self {
        Builtin::Object.class()
    }

    /// `Function`
    pub fn function() -> Self {
        Builtin::Function.class()
    }

    /// `Array`
    pub fn array() -> Self {
        Builtin::Array.class()
    }

    /// `String`
    pub fn string() -> Self {
        Builtin::String.class()
    }

    /// `Number`
    pub fn number() -> Self {
        Builtin::Number.class()
    }

    /// `Boolean`
    pub fn boolean() -> Self {
        Builtin::Boolean.class()
    }

    /// `Date`
    pub fn date() -> Self {
        Builtin::Date.class()
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Direct superclass; `None` only for `Object`
    pub fn parent(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    /// Which builtin this is, if any
    pub fn builtin(&self) -> Option<Builtin> {
        self.0.builtin
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = &Class> {
        std::iter::successors(self.parent(), |class| class.parent())
    }

    /// True if `other` is a strict ancestor of `self`
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ancestors().any(|ancestor| ancestor == other)
    }

    /// True if `self` is `other` or one of its subclasses
    pub fn inherits_from(&self, other: &Class) -> bool {
        self == other || self.is_subclass_of(other)
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({})", self.name())
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle to a plain callable
#[derive(Clone)]
pub struct Function(Arc<str>);

impl Function {
    /// Create a named function
    pub fn new(name: impl AsRef<str>) -> Self {
        Function(Arc::from(name.as_ref()))
    }

    /// Create a function with an empty name
    pub fn anonymous() -> Self {
        Self::new("")
    }

    /// Function name, possibly empty
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Function {}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_shared() {
        assert_eq!(Class::object(), Class::object());
        assert_eq!(Class::array(), Builtin::Array.class());
        assert_ne!(Class::array(), Class::object());
        assert_eq!(Class::date().builtin(), Some(Builtin::Date));
    }

    #[test]
    fn test_identity_not_name() {
        let a = Class::new("Thing");
        let b = Class::new("Thing");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let f = Function::new("f");
        assert_ne!(f, Function::new("f"));
        assert_eq!(f, f.clone());
    }

    #[test]
    fn test_class_chain() {
        let parent = Class::new("Parent");
        let child = parent.extend("Child");
        let grandchild = child.extend("Grandchild");

        assert!(grandchild.is_subclass_of(&parent));
        assert!(grandchild.is_subclass_of(&Class::object()));
        assert!(!parent.is_subclass_of(&child));
        assert!(!child.is_subclass_of(&child));
        assert!(child.inherits_from(&child));

        let names: Vec<&str> = grandchild.ancestors().map(Class::name).collect();
        assert_eq!(names, vec!["Child", "Parent", "Object"]);
    }

    #[test]
    fn test_object_is_the_root() {
        assert!(Class::object().parent().is_none());
        assert_eq!(Class::date().parent(), Some(&Class::object()));
    }
}
