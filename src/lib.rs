//! # callgate
//!
//! **callgate** is a client-side admission controller for async operations.
//!
//! It bounds how many operations (typically outbound calls) run at once, queues the
//! excess, and admits queued operations strictly in arrival order as running ones
//! settle. Every submitted operation runs exactly once; a failing operation only
//! affects the caller that submitted it.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  add(op #1)  │   │  add(op #2)  │   │  add(op #3)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  AdmissionController                                              │
//! │  - limit (fixed concurrency budget)                               │
//! │  - running set (ids of admitted operations)                       │
//! │  - wait queue (FIFO of one-shot wake signals)                     │
//! │  - Notifier (queued / admitted / settled / idle)                  │
//! └──────┬──────────────────┬──────────────────────────────┬──────────┘
//!        ▼                  ▼                              ▼
//!   ┌──────────┐       ┌──────────┐                 ┌─────────────┐
//!   │ running  │       │ running  │                 │   waiting   │
//!   │ op #1    │       │ op #2    │                 │   op #3     │
//!   └────┬─────┘       └──────────┘                 └──────▲──────┘
//!        │ settles (Ok / Err / panic / dropped)            │
//!        └──── release slot ──► hand off to queue head ────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Submitted ─┬─► Running ──► Settled(Ok | Err)
//!            └─► Waiting ──► Running ──► Settled(Ok | Err)
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types                                   |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Admission**     | Cap concurrency, FIFO queue, direct slot hand-off.            | [`AdmissionController`], [`Snapshot`]       |
//! | **Events**        | Named-event notifier and controller lifecycle events.         | [`Notifier`], [`ControllerEvent`]           |
//! | **Errors**        | Typed configuration errors.                                   | [`ConfigError`]                             |
//! | **Configuration** | Limit and name, validated at construction.                    | [`ControllerConfig`]                        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use callgate::{AdmissionController, ControllerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gate = AdmissionController::with_config(ControllerConfig::new(2).with_name("api"))?;
//!
//!     // Four calls, at most two in flight.
//!     let calls = (0..4).map(|i| {
//!         gate.add(move || async move {
//!             tokio::time::sleep(Duration::from_millis(10)).await;
//!             Ok::<_, String>(i * 10)
//!         })
//!     });
//!
//!     let results = futures::future::join_all(calls).await;
//!     assert_eq!(results, vec![Ok(0), Ok(10), Ok(20), Ok(30)]);
//!     assert!(gate.is_idle());
//!     Ok(())
//! }
//! ```
mod config;
mod controller;
mod error;
mod events;

#[cfg(feature = "logging")]
mod observers;

// ---- Public re-exports ----

pub use config::{ControllerConfig, DEFAULT_LIMIT, DEFAULT_NAME};
pub use controller::{AdmissionController, Snapshot};
pub use error::ConfigError;
pub use events::{ControllerEvent, Listener, Notifier, listener};

// Optional: expose a simple built-in logger (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
