//! Built-in observers for controller lifecycle events.
//!
//! - [`LogWriter`] logs every [`ControllerEvent`](crate::ControllerEvent) through `tracing`.

mod log;

pub use log::LogWriter;
