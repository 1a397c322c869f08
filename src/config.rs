//! # Controller configuration.
//!
//! Provides [`ControllerConfig`] construction-time settings for an
//! [`AdmissionController`](crate::AdmissionController).
//!
//! ## Rules
//! - `limit` is fixed for the lifetime of the controller; it must be at least 1.
//! - `name` only labels log records and observer output.

use std::borrow::Cow;

use crate::error::ConfigError;

/// Default concurrency limit used by [`ControllerConfig::default`].
pub const DEFAULT_LIMIT: usize = 6;

/// Default controller name used in log records.
pub const DEFAULT_NAME: &str = "callgate";

/// Configuration for an admission controller.
///
/// ## Field semantics
/// - `limit`: maximum number of operations running at once (`0` is rejected by [`validate`](Self::validate))
/// - `name`: label attached to every log record the controller emits
///
/// ## Example
/// ```
/// use callgate::ControllerConfig;
///
/// let cfg = ControllerConfig::new(4).with_name("billing-api");
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.limit, 4);
///
/// assert!(ControllerConfig::new(0).validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Maximum number of concurrently running operations.
    pub limit: usize,

    /// Human-readable controller name.
    pub name: Cow<'static, str>,
}

impl ControllerConfig {
    /// Creates a configuration with the given limit and the default name.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            name: Cow::Borrowed(DEFAULT_NAME),
        }
    }

    /// Sets the controller name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Checks the configuration.
    ///
    /// ### Errors
    /// - [`ConfigError::ZeroLimit`] if `limit == 0`
    /// - [`ConfigError::EmptyName`] if `name` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    /// Default configuration:
    ///
    /// - `limit = 6`
    /// - `name = "callgate"`
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}
