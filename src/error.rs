//! Error types used by callgate.
//!
//! The controller adds no runtime error kinds of its own: [`AdmissionController::add`]
//! hands back whatever the submitted operation produced, so an operation's failure reaches
//! only the caller that submitted it.
//!
//! The one error enum here is [`ConfigError`], raised when a controller is built from an
//! invalid [`ControllerConfig`](crate::ControllerConfig).
//!
//! [`AdmissionController::add`]: crate::AdmissionController::add

use thiserror::Error;

/// # Errors produced while building a controller.
///
/// Returned by [`ControllerConfig::validate`](crate::ControllerConfig::validate),
/// [`AdmissionController::new`](crate::AdmissionController::new) and
/// [`AdmissionController::with_config`](crate::AdmissionController::with_config).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The concurrency limit was zero; no operation could ever be admitted.
    #[error("concurrency limit must be at least 1")]
    ZeroLimit,

    /// The controller name was empty.
    #[error("controller name must not be empty")]
    EmptyName,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use callgate::ConfigError;
    ///
    /// assert_eq!(ConfigError::ZeroLimit.as_label(), "config_zero_limit");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroLimit => "config_zero_limit",
            ConfigError::EmptyName => "config_empty_name",
        }
    }
}
