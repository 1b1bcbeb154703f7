//! Form-field validation for the Simile notification settings.
//!
//! Every check is a pure function from the raw field value to a
//! [`ValidationResult`]. Hosts call them on demand while a job is being
//! configured; an `Error` verdict is only displayed next to the field and
//! never prevents the configuration from being saved.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// Git web URL: `http`/`https` scheme, a colon, optional `//`, then a path of
/// word characters and `.@:/~-`, optionally ending in `.git`.
const REPOSITORY_PATTERN: &str = r"^(?i:https?):(?://)?[A-Za-z0-9_.@:/~-]+(?:\.git)?$";

/// Lowercase RFC 5322 subset (see <http://www.regexr.com/3c0ol>).
const EMAIL_PATTERN: &str = concat!(
    r"^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
    r"@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$",
);

static REPOSITORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(REPOSITORY_PATTERN).expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// Repositories shorter than this are flagged with a warning.
const MIN_REPOSITORY_LEN: usize = 4;

pub const MSG_REPOSITORY_REQUIRED: &str = "repository is required.";
pub const MSG_REPOSITORY_INVALID: &str =
    "not a valid web URL for a repository; use an http(s) URL.";
pub const MSG_REPOSITORY_SHORT: &str = "repository identifier looks unusually short.";
pub const MSG_EMAIL_INVALID: &str = "not a valid email address.";
pub const MSG_SERVER_URL_INVALID: &str = "not a valid server URL; use an http(s) URL.";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

/// Verdict for a single form field.
///
/// `message` is empty when `severity` is [`Severity::Ok`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub severity: Severity,
    pub message: String,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            severity: Severity::Ok,
            message: String::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

/// Check a Git repository web URL.
///
/// Empty input and non-http(s) URLs are errors; a matching but very short
/// value only earns a warning.
pub fn validate_repository(value: &str) -> ValidationResult {
    if value.is_empty() {
        return ValidationResult::error(MSG_REPOSITORY_REQUIRED);
    }
    if !REPOSITORY_RE.is_match(value) {
        return ValidationResult::error(MSG_REPOSITORY_INVALID);
    }
    if value.chars().count() < MIN_REPOSITORY_LEN {
        return ValidationResult::warning(MSG_REPOSITORY_SHORT);
    }
    ValidationResult::ok()
}

/// Check a contact email address.
pub fn validate_email(value: &str) -> ValidationResult {
    if EMAIL_RE.is_match(value) {
        ValidationResult::ok()
    } else {
        ValidationResult::error(MSG_EMAIL_INVALID)
    }
}

/// Check the administrator-set Simile base URL.
///
/// An empty value is accepted and means "use the default endpoint".
/// Anything else must be an absolute http(s) URL that a path segment can be
/// appended to, so a query string or fragment is rejected.
pub fn validate_server_url(value: &str) -> ValidationResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ValidationResult::ok();
    }

    match Url::parse(trimmed) {
        Ok(url) if is_base_url(&url) => ValidationResult::ok(),
        _ => ValidationResult::error(MSG_SERVER_URL_INVALID),
    }
}

fn is_base_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
        && url.has_host()
        && url.query().is_none()
        && url.fragment().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- repository --

    #[test]
    fn repository_empty_is_error() {
        let result = validate_repository("");
        assert_eq!(result, ValidationResult::error(MSG_REPOSITORY_REQUIRED));
    }

    #[test]
    fn repository_https_git_url_is_ok() {
        assert!(validate_repository("https://example.com/repo.git").is_ok());
    }

    #[test]
    fn repository_http_without_git_suffix_is_ok() {
        assert!(validate_repository("http://github.com/swt/simile").is_ok());
    }

    #[test]
    fn repository_with_user_and_port_is_ok() {
        assert!(validate_repository("https://git@example.com:8443/team/repo.git").is_ok());
    }

    #[test]
    fn repository_scheme_is_case_insensitive() {
        assert!(validate_repository("HTTPS://example.com/repo.git").is_ok());
    }

    #[test]
    fn repository_ssh_url_is_error() {
        let result = validate_repository("git@github.com:swt/simile.git");
        assert_eq!(result, ValidationResult::error(MSG_REPOSITORY_INVALID));
    }

    #[test]
    fn repository_other_scheme_is_error() {
        assert!(validate_repository("ftp://example.com/repo.git").is_error());
    }

    #[test]
    fn repository_without_scheme_is_error() {
        assert!(validate_repository("example.com/repo.git").is_error());
    }

    #[test]
    fn repository_with_whitespace_is_error() {
        assert!(validate_repository("https://example.com/my repo.git").is_error());
    }

    #[test]
    fn repository_query_string_is_error() {
        assert!(validate_repository("https://example.com/repo?x=1").is_error());
    }

    #[test]
    fn repository_scheme_only_is_error() {
        assert!(validate_repository("https:").is_error());
    }

    // -- email --

    #[test]
    fn email_simple_is_ok() {
        assert!(validate_email("a@b.com").is_ok());
    }

    #[test]
    fn email_with_dotted_local_part_is_ok() {
        assert!(validate_email("first.last+ci@mail.example.org").is_ok());
    }

    #[test]
    fn email_without_at_is_error() {
        assert_eq!(
            validate_email("not-an-email"),
            ValidationResult::error(MSG_EMAIL_INVALID)
        );
    }

    #[test]
    fn email_empty_is_error() {
        assert!(validate_email("").is_error());
    }

    #[test]
    fn email_without_dotted_host_is_error() {
        assert!(validate_email("dev@localhost").is_error());
    }

    #[test]
    fn email_host_label_cannot_end_with_hyphen() {
        assert!(validate_email("dev@example-.org").is_error());
    }

    #[test]
    fn email_is_case_sensitive() {
        // The pattern only admits lowercase letters.
        assert!(validate_email("Dev@Example.org").is_error());
    }

    #[test]
    fn email_with_trailing_text_is_error() {
        assert!(validate_email("dev@example.org extra").is_error());
    }

    // -- server url --

    #[test]
    fn server_url_empty_means_default() {
        assert!(validate_server_url("").is_ok());
        assert!(validate_server_url("   ").is_ok());
    }

    #[test]
    fn server_url_http_is_ok() {
        assert!(validate_server_url("http://simile.example.com:9000/simile").is_ok());
    }

    #[test]
    fn server_url_without_scheme_is_error() {
        assert_eq!(
            validate_server_url("simile.example.com"),
            ValidationResult::error(MSG_SERVER_URL_INVALID)
        );
    }

    #[test]
    fn server_url_non_http_scheme_is_error() {
        assert!(validate_server_url("ftp://simile.example.com").is_error());
    }

    #[test]
    fn server_url_scheme_is_case_insensitive() {
        assert!(validate_server_url("HTTPS://simile.example.com").is_ok());
    }

    #[test]
    fn server_url_with_query_is_error() {
        assert_eq!(
            validate_server_url("http://simile.example.com/simile?x=1"),
            ValidationResult::error(MSG_SERVER_URL_INVALID)
        );
    }

    #[test]
    fn server_url_with_fragment_is_error() {
        assert!(validate_server_url("http://simile.example.com/simile#frag").is_error());
    }

    #[test]
    fn server_url_with_empty_query_is_error() {
        assert!(validate_server_url("http://simile.example.com/simile?").is_error());
    }

    // -- general --

    #[test]
    fn checks_are_repeatable() {
        for value in ["", "https://example.com/repo.git", "nope"] {
            assert_eq!(validate_repository(value), validate_repository(value));
            assert_eq!(validate_email(value), validate_email(value));
        }
    }

    #[test]
    fn ok_result_has_empty_message() {
        let result = validate_email("a@b.com");
        assert_eq!(result.severity, Severity::Ok);
        assert!(result.message.is_empty());
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_value(ValidationResult::warning("short")).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["message"], "short");
    }
}
