//! Command-line arguments for the `simile` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default location of the persisted server settings.
pub const DEFAULT_CONFIG_PATH: &str = "simile.json";

#[derive(Debug, Parser)]
#[command(name = "simile", version)]
#[command(about = "Simile - Search for similar components")]
#[command(
    after_help = "Environment:\n  SIMILE_CONFIG   Settings file\n  SIMILE_URL      Simile base URL override\n  RUST_LOG        Log filter for diagnostics on stderr"
)]
pub struct Cli {
    /// Settings file holding the Simile server URL.
    #[arg(long, global = true, env = "SIMILE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a single configuration field.
    Check {
        #[command(subcommand)]
        field: CheckField,
    },
    /// Tell Simile that a build has finished.
    Notify(NotifyArgs),
    /// Show or change the Simile server settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Field to validate. A missing value is checked as an empty string.
#[derive(Debug, Subcommand)]
pub enum CheckField {
    Repository { value: Option<String> },
    Email { value: Option<String> },
    ServerUrl { value: Option<String> },
}

#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Git repository web URL.
    #[arg(long, env = "SIMILE_REPOSITORY", default_value = "")]
    pub repository: String,

    /// Branch that was built.
    #[arg(long, env = "SIMILE_BRANCH", default_value = "")]
    pub branch: String,

    /// Contact address for search results.
    #[arg(long, env = "SIMILE_EMAIL", default_value = "")]
    pub email: String,

    /// Use this base URL instead of the stored setting.
    #[arg(long, env = "SIMILE_URL")]
    pub server_url: Option<String>,

    /// Give up on the request after this many seconds.
    #[arg(long, env = "SIMILE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Print the outcome as JSON after the log lines.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the configured URL and the resolved endpoint.
    Show,
    /// Validate and store a new base URL.
    SetUrl { url: String },
    /// Forget the stored URL and use the default.
    Reset,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_notify_flags() {
        let cli = Cli::try_parse_from([
            "simile",
            "notify",
            "--repository",
            "https://example.com/repo.git",
            "--branch",
            "main",
            "--email",
            "dev@example.org",
            "--server-url",
            "https://simile.example.com",
            "--json",
        ])
        .unwrap();

        let Command::Notify(args) = cli.command else {
            panic!("expected notify");
        };
        assert_eq!(args.repository, "https://example.com/repo.git");
        assert_eq!(args.branch, "main");
        assert_eq!(args.email, "dev@example.org");
        assert_eq!(args.server_url.as_deref(), Some("https://simile.example.com"));
        assert!(args.json);
    }

    #[test]
    fn check_value_is_optional() {
        let cli = Cli::try_parse_from(["simile", "check", "repository"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Check {
                field: CheckField::Repository { value: None }
            }
        ));
    }

    #[test]
    fn config_path_is_global() {
        let cli =
            Cli::try_parse_from(["simile", "config", "show", "--config", "/etc/simile.json"])
                .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/simile.json"));
    }

    #[test]
    fn set_url_requires_value() {
        assert!(Cli::try_parse_from(["simile", "config", "set-url"]).is_err());
    }
}
