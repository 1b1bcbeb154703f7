//! Notification data model.
//!
//! [`NotificationConfig`] is the per-job value captured when a job is
//! saved. [`ServerConfig`] is the process-wide Simile location set by an
//! administrator and persisted through a [`SettingsStore`](crate::settings::SettingsStore).

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::validation::{self, ValidationResult};

/// Base URL used when no server URL has been configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/simile";

/// Path appended to the base URL to form the notification endpoint.
pub const REPOSITORY_PATH: &str = "/repository";

// ---------------------------------------------------------------------------
// NotificationConfig
// ---------------------------------------------------------------------------

/// Repository, branch and contact email for one job.
///
/// Immutable once built; a re-saved job produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    repository: String,
    branch: String,
    email: String,
}

impl NotificationConfig {
    /// Fields are stored as given, empty strings included. Use
    /// [`NotificationConfig::validate`] to surface problems.
    pub fn new(
        repository: impl Into<String>,
        branch: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            branch: branch.into(),
            email: email.into(),
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Run the field checks that have a validator, in form order.
    ///
    /// The branch name is free text and is not checked.
    pub fn validate(&self) -> Vec<(&'static str, ValidationResult)> {
        vec![
            ("repository", validation::validate_repository(&self.repository)),
            ("email", validation::validate_email(&self.email)),
        ]
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Location of the Simile service.
///
/// An unset `base_url` means [`DEFAULT_BASE_URL`]. A stored value is
/// trimmed on load the same way [`ServerConfig::new`] trims its input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(
        default,
        deserialize_with = "deserialize_base_url",
        skip_serializing_if = "Option::is_none"
    )]
    base_url: Option<String>,
}

impl ServerConfig {
    /// Build a configuration from an administrator-supplied URL.
    ///
    /// Blank input clears the setting. Anything else must be an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let config = Self {
            base_url: normalize(base_url),
        };
        config.check()?;
        Ok(config)
    }

    /// The configured URL, if any.
    pub fn configured_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Base URL to send notifications to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Full notification endpoint: the base URL followed by
    /// [`REPOSITORY_PATH`].
    pub fn endpoint(&self) -> String {
        format!("{}{REPOSITORY_PATH}", self.base_url().trim_end_matches('/'))
    }

    /// Re-check a value that did not come through [`ServerConfig::new`],
    /// e.g. one deserialized from disk.
    pub fn check(&self) -> Result<(), CoreError> {
        let Some(url) = self.base_url.as_deref() else {
            return Ok(());
        };
        let result = validation::validate_server_url(url);
        if result.is_error() {
            return Err(CoreError::Validation(format!(
                "server URL '{url}': {}",
                result.message
            )));
        }
        Ok(())
    }
}

fn normalize(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn deserialize_base_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(normalize))
}
