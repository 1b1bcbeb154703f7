//! Simile notification core.
//!
//! Host-agnostic building blocks for the "similar component" search
//! trigger: the per-job [`NotificationConfig`], the administrator-set
//! [`ServerConfig`], the form-field [`validation`] rules and the
//! [`settings`] store that persists the server configuration.
//!
//! Nothing in this crate performs network I/O; delivery lives in
//! `simile-notifier`.

pub mod config;
pub mod error;
pub mod settings;
pub mod validation;

pub use config::{NotificationConfig, ServerConfig, DEFAULT_BASE_URL, REPOSITORY_PATH};
pub use error::CoreError;
pub use settings::{JsonFileStore, SettingsStore};
pub use validation::{Severity, ValidationResult};
