//! Command handlers.
//!
//! Every handler writes its user-facing output to the supplied writer
//! (stdout in the binary) and leaves diagnostics to `tracing`.

use std::io::Write;
use std::time::Duration;

use simile_core::validation::{self, ValidationResult};
use simile_core::{JsonFileStore, NotificationConfig, ServerConfig, SettingsStore, Severity};
use simile_notifier::delivery::MSG_FAILURE;
use simile_notifier::{LogSink, NotificationOutcome, SimileNotifier, WriterSink};

use crate::cli::{CheckField, Cli, Command, ConfigAction, NotifyArgs};

/// How the process should exit after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    /// A `check` command produced an error verdict.
    Invalid,
}

/// Dispatch a parsed command line.
pub async fn run<W: Write>(cli: Cli, mut out: W) -> anyhow::Result<Exit> {
    let store = JsonFileStore::new(cli.config);

    match cli.command {
        Command::Check { field } => check(field, &mut out),
        Command::Notify(args) => notify(&store, args, &mut out).await,
        Command::Config { action } => config(&store, action, &mut out),
    }
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn check<W: Write>(field: CheckField, out: &mut W) -> anyhow::Result<Exit> {
    let result = match field {
        CheckField::Repository { value } => {
            validation::validate_repository(value.as_deref().unwrap_or_default())
        }
        CheckField::Email { value } => {
            validation::validate_email(value.as_deref().unwrap_or_default())
        }
        CheckField::ServerUrl { value } => {
            validation::validate_server_url(value.as_deref().unwrap_or_default())
        }
    };

    writeln!(out, "{}", render(&result))?;

    Ok(if result.is_error() {
        Exit::Invalid
    } else {
        Exit::Success
    })
}

/// One-line form of a verdict, e.g. `WARNING: repository identifier looks unusually short.`
pub fn render(result: &ValidationResult) -> String {
    match result.severity {
        Severity::Ok => "OK".to_string(),
        Severity::Warning => format!("WARNING: {}", result.message),
        Severity::Error => format!("ERROR: {}", result.message),
    }
}

// ---------------------------------------------------------------------------
// notify
// ---------------------------------------------------------------------------

/// Build-completion hook.
///
/// Always exits successfully: problems end up in the build log and the
/// outcome, never in the exit status.
async fn notify<W: Write>(
    store: &JsonFileStore,
    args: NotifyArgs,
    out: &mut W,
) -> anyhow::Result<Exit> {
    let job = NotificationConfig::new(args.repository, args.branch, args.email);
    for (field, result) in job.validate() {
        if !result.is_ok() {
            tracing::warn!(field, message = %result.message, "Sending notification with questionable field");
        }
    }

    let outcome = {
        let mut sink = WriterSink::new(&mut *out);
        match prepare(store, args.server_url.as_deref(), args.timeout_secs) {
            Ok((server, notifier)) => notifier.notify(&job, &server, &mut sink).await,
            Err(e) => {
                tracing::error!(error = %e, "Could not prepare Simile notification");
                let description = format!("{e:#}");
                sink.write_line(MSG_FAILURE);
                sink.write_line(&description);
                NotificationOutcome::failed(description)
            }
        }
    };

    if args.json {
        if let Err(e) = write_outcome(out, &outcome) {
            tracing::warn!(error = %e, "Failed to write notification outcome");
        }
    }
    Ok(Exit::Success)
}

fn write_outcome<W: Write>(out: &mut W, outcome: &NotificationOutcome) -> anyhow::Result<()> {
    writeln!(out, "{}", serde_json::to_string(outcome)?)?;
    out.flush()?;
    Ok(())
}

/// Resolve the server settings and build the HTTP client.
fn prepare(
    store: &JsonFileStore,
    server_url: Option<&str>,
    timeout_secs: Option<u64>,
) -> anyhow::Result<(ServerConfig, SimileNotifier)> {
    let server = match server_url {
        Some(url) => ServerConfig::new(url)?,
        None => store.load()?,
    };
    let notifier = match timeout_secs {
        Some(secs) => SimileNotifier::with_timeout(Duration::from_secs(secs))?,
        None => SimileNotifier::new()?,
    };
    Ok((server, notifier))
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn config<W: Write>(
    store: &JsonFileStore,
    action: ConfigAction,
    out: &mut W,
) -> anyhow::Result<Exit> {
    match action {
        ConfigAction::Show => {
            let server = store.load()?;
            match server.configured_url() {
                Some(url) => writeln!(out, "Simile URL: {url}")?,
                None => writeln!(out, "Simile URL: {} (default)", server.base_url())?,
            }
            writeln!(out, "Simile Endpoint: {}", server.endpoint())?;
        }
        ConfigAction::SetUrl { url } => {
            let server = ServerConfig::new(&url)?;
            store.save(&server)?;
            tracing::info!(path = %store.path().display(), url = %server.base_url(), "Saved Simile settings");
            writeln!(out, "Simile URL set to {}", server.base_url())?;
        }
        ConfigAction::Reset => {
            store.save(&ServerConfig::default())?;
            tracing::info!(path = %store.path().display(), "Reset Simile settings");
            writeln!(out, "Simile URL reset to {}", ServerConfig::default().base_url())?;
        }
    }
    Ok(Exit::Success)
}
