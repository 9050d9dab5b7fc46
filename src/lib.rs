//! Runtime structural validation for dynamic values
//!
//! This library decides whether a dynamically typed [`Value`] has the shape
//! described by a [`Pattern`]: primitive types, arrays, nested objects,
//! alternation, refinement predicates, subclass relations and homogeneous
//! hashes. A failing check says what was expected and where, down to the
//! offending field (`items[2].name`).
//!
//! # Example
//!
//! ```
//! use conform_rs::{check, test, Pattern, Value};
//!
//! let pattern = Pattern::object([(
//!     "items",
//!     Pattern::array_of(Pattern::object([("name", Pattern::string())])),
//! )]);
//!
//! let good = Value::object([(
//!     "items",
//!     Value::array([Value::object([("name", "widget")])]),
//! )]);
//! assert!(check(&good, &pattern).is_ok());
//!
//! let bad = Value::object([(
//!     "items",
//!     Value::array([Value::object([("name", 5)])]),
//! )]);
//! let err = check(&bad, &pattern).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Expected string, got number in field items[0].name"
//! );
//! assert!(!test(&bad, &pattern).unwrap());
//! ```
//!
//! # Disabling checks
//!
//! ```
//! use conform_rs::{Checker, Pattern, Value};
//!
//! let checker = Checker::builder().enabled(false).build();
//! assert!(checker.check(&Value::from(1), &Pattern::string()).is_ok());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

// Re-export commonly used items
pub use checker::{check, test, CheckConfig, Checker, CheckerBuilder};
pub use engine::{matches, MatchPath, PathSegment};
pub use error::{CheckError, ConfigError, Mismatch, PatternError, Result};
pub use pattern::{Fields, Kind, Pattern, PatternDef, Predicate, Refinement};
pub use value::{Builtin, Class, Function, Object, TypeTag, Value};

/// Dynamic values
pub mod value;

/// Pattern model
pub mod pattern;

/// Matching engine
pub mod engine;

/// Check entry points and configuration
pub mod checker;

/// Error types
pub mod error;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber with default settings
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_crate_root_check_finalizes_path() {
        let pattern = Pattern::array_of(Pattern::integer());
        let err = check(&Value::array([1.0, 2.5]), &pattern).unwrap_err();
        assert_eq!(err.to_string(), "Expected Integer, got 2.5 in field [1]");
    }
}
