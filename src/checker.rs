//! Check entry points
//!
//! [`check`] asserts that a value conforms and reports why it does not;
//! [`test`] only answers yes or no. Both are also available on a
//! [`Checker`], which can be switched off to turn every `check` call into
//! a no-op without touching call sites.

use crate::engine;
use crate::error::{CheckError, ConfigError, Mismatch, Result};
use crate::pattern::Pattern;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Environment variable that disables checking when set to a true value
pub const ENV_DISABLED: &str = "CONFORM_CHECK_DISABLED";

/// Environment variable that enables failure logging when set to a true value
pub const ENV_LOG_FAILURES: &str = "CONFORM_LOG_FAILURES";

/// Checker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Whether `check` validates at all
    pub enabled: bool,

    /// Emit a debug event for every conformance failure raised by `check`
    pub log_failures: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_failures: false,
        }
    }
}

impl CheckConfig {
    /// Parse configuration from YAML; missing keys take their defaults
    pub fn from_yaml(source: &str) -> std::result::Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Read configuration from `CONFORM_CHECK_DISABLED` and `CONFORM_LOG_FAILURES`
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(disabled) = parse_flag(ENV_DISABLED, lookup(ENV_DISABLED))? {
            config.enabled = !disabled;
        }
        if let Some(log_failures) = parse_flag(ENV_LOG_FAILURES, lookup(ENV_LOG_FAILURES))? {
            config.log_failures = log_failures;
        }
        Ok(config)
    }
}

fn parse_flag(var: &str, raw: Option<String>) -> std::result::Result<Option<bool>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "" | "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Env {
            var: var.to_string(),
            value: raw,
        }),
    }
}

/// Validates values against patterns
///
/// Clones share the on/off switch, so disabling one clone disables them
/// all.
#[derive(Debug, Clone)]
pub struct Checker {
    enabled: Arc<AtomicBool>,
    log_failures: bool,
}

impl Checker {
    /// Create a checker from configuration
    pub fn new(config: CheckConfig) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(config.enabled)),
            log_failures: config.log_failures,
        }
    }

    /// Start building a checker
    pub fn builder() -> CheckerBuilder {
        CheckerBuilder::new()
    }

    /// Turn `check` into a no-op
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Restore normal checking
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// Whether `check` currently validates
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Assert that `value` matches `pattern`
    ///
    /// A conformance failure comes back with its path folded into the
    /// message (`"Expected string, got number in field items[0].name"`).
    /// Construction and predicate errors pass through unchanged. While the
    /// checker is disabled this always returns `Ok(())`.
    pub fn check(&self, value: &Value, pattern: &Pattern) -> Result<()> {
        if !self.is_enabled() {
            trace!("Checking disabled, skipping");
            return Ok(());
        }

        engine::matches(value, pattern).map_err(|err| match err {
            CheckError::Mismatch(mismatch) => {
                let mismatch = mismatch.finalize();
                if self.log_failures {
                    log_failure(&mismatch);
                }
                CheckError::Mismatch(mismatch)
            }
            other => other,
        })
    }

    /// Report whether `value` matches `pattern`
    ///
    /// Only conformance failures become `Ok(false)`; malformed patterns
    /// and predicate errors are returned as errors. Not affected by
    /// [`Checker::disable`].
    pub fn test(&self, value: &Value, pattern: &Pattern) -> Result<bool> {
        match engine::matches(value, pattern) {
            Ok(()) => Ok(true),
            Err(CheckError::Mismatch(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }
}

fn log_failure(mismatch: &Mismatch) {
    debug!(
        reason = mismatch.reason(),
        path = mismatch.path().as_deref().unwrap_or(""),
        "Value failed check"
    );
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(CheckConfig::default())
    }
}

/// Builder for [`Checker`]
#[derive(Debug, Clone, Default)]
pub struct CheckerBuilder {
    config: CheckConfig,
}

impl CheckerBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: CheckConfig) -> Self {
        self.config = config;
        self
    }

    /// Set whether checking starts enabled
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set whether failures are logged
    pub fn log_failures(mut self, log_failures: bool) -> Self {
        self.config.log_failures = log_failures;
        self
    }

    /// Build the checker
    pub fn build(self) -> Checker {
        Checker::new(self.config)
    }
}

/// Assert that `value` matches `pattern`; see [`Checker::check`]
pub fn check(value: &Value, pattern: &Pattern) -> Result<()> {
    engine::matches(value, pattern).map_err(|err| match err {
        CheckError::Mismatch(mismatch) => CheckError::Mismatch(mismatch.finalize()),
        other => other,
    })
}

/// Report whether `value` matches `pattern`; see [`Checker::test`]
pub fn test(value: &Value, pattern: &Pattern) -> Result<bool> {
    Checker::default().test(value, pattern)
}
