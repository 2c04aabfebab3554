//! context-guard - lifecycle interceptors for an AI coding assistant
//!
//! The host runs one subcommand per lifecycle event, pipes the event JSON to
//! stdin, and appends whatever is printed on stdout to the assistant's
//! context.
//!
//! ## Commands
//!
//! - `pre-compact`: save checklist before history is compacted
//! - `session-start`: restoration checklist at session start or resume
//! - `prompt-submit`: persistence directives ahead of each prompt
//! - `settings`: print the host hook registration block
//!
//! Every interceptor exits 0, whatever it is fed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{error, warn, Level};

use context_guard_core::{
    run_pre_compact, run_prompt_submit, run_session_start, BackupStore, GuardConfig, HttpProbe,
};

#[derive(Parser, Debug)]
#[command(name = "context-guard")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lifecycle interceptors that preserve assistant working context", long_about = None)]
struct Cli {
    /// Enable verbose output on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run before conversation history is compacted
    PreCompact {
        /// Directory for transcript backups
        #[arg(long, env = "CONTEXT_GUARD_BACKUP_DIR")]
        backup_dir: Option<PathBuf>,
    },

    /// Run when a session starts, resumes, or is cleared
    SessionStart {
        /// Knowledge service health endpoint
        #[arg(long, env = "CONTEXT_GUARD_HEALTH_URL")]
        health_url: Option<String>,
    },

    /// Run on every submitted prompt
    PromptSubmit,

    /// Print the hooks block to register these interceptors with the host
    Settings,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version print to stdout and exit 0.
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            // Usage errors still exit 0, with nothing on stdout.
            context_guard_core::init_tracing(false, Level::WARN);
            error!(kind = ?e.kind(), "invalid invocation, nothing injected");
            let _ = e.print();
            return;
        }
    };

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    context_guard_core::init_tracing(cli.json, level);

    // A panic inside the task surfaces as a JoinError instead of a non-zero exit.
    match tokio::spawn(run(cli.command)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %format!("{e:#}"), "interceptor failed"),
        Err(e) => error!(error = %e, "interceptor panicked"),
    }
}

async fn run(command: Commands) -> Result<()> {
    let mut config = GuardConfig::from_env();

    let output: Vec<u8> = match command {
        Commands::PreCompact { backup_dir } => {
            if backup_dir.is_some() {
                config.backup_dir = backup_dir;
            }
            let input = read_stdin().await;
            let store: Option<BackupStore> = config.backup_store();
            line(run_pre_compact(&input, store.as_ref()))
        }
        Commands::SessionStart { health_url } => {
            if let Some(url) = health_url {
                config.health_url = url;
            }
            let input = read_stdin().await;
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let probe = HttpProbe::new(config.health_url.clone(), config.probe_timeout);
            line(run_session_start(&input, &cwd, &probe, config.git_timeout).await)
        }
        Commands::PromptSubmit => run_prompt_submit(&read_stdin().await),
        Commands::Settings => {
            let exe = std::env::current_exe()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "context-guard".to_string());
            line(serde_json::to_string_pretty(&hook_settings(&exe))?)
        }
    };

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(&output)
        .await
        .context("failed to write interceptor output")?;
    stdout.flush().await.context("failed to flush stdout")?;
    Ok(())
}

/// Read the whole event. An unreadable stdin is treated as empty input.
async fn read_stdin() -> Vec<u8> {
    let mut input = Vec::new();
    if let Err(e) = tokio::io::stdin().read_to_end(&mut input).await {
        warn!(error = %e, "failed to read event from stdin");
        input.clear();
    }
    input
}

fn line(mut text: String) -> Vec<u8> {
    text.push('\n');
    text.into_bytes()
}

fn hook_settings(exe: &str) -> Value {
    let entry = |subcommand: &str| {
        json!([{
            "hooks": [{
                "type": "command",
                "command": format!("{exe} {subcommand}"),
            }]
        }])
    };

    json!({
        "hooks": {
            "PreCompact": entry("pre-compact"),
            "SessionStart": entry("session-start"),
            "UserPromptSubmit": entry("prompt-submit"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["context-guard", "-v", "prompt-submit"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::PromptSubmit));

        let cli = Cli::try_parse_from([
            "context-guard",
            "pre-compact",
            "--backup-dir",
            "/tmp/backups",
        ])
        .unwrap();
        match cli.command {
            Commands::PreCompact { backup_dir } => {
                assert_eq!(backup_dir, Some(PathBuf::from("/tmp/backups")))
            }
            _ => panic!("expected pre-compact"),
        }
    }

    #[test]
    fn settings_register_all_three_events() {
        let settings = hook_settings("/usr/local/bin/context-guard");
        let hooks = settings["hooks"].as_object().unwrap();
        assert_eq!(hooks.len(), 3);
        assert_eq!(
            settings["hooks"]["UserPromptSubmit"][0]["hooks"][0]["command"],
            "/usr/local/bin/context-guard prompt-submit"
        );
        assert_eq!(
            settings["hooks"]["PreCompact"][0]["hooks"][0]["type"],
            "command"
        );
    }

    #[test]
    fn usage_errors_are_told_apart_from_help() {
        let err = Cli::try_parse_from(["context-guard", "post-compact"]).unwrap_err();
        assert!(err.use_stderr());

        let err = Cli::try_parse_from(["context-guard", "--help"]).unwrap_err();
        assert!(!err.use_stderr());
    }

    #[test]
    fn line_appends_newline() {
        assert_eq!(line("ok".to_string()), b"ok\n".to_vec());
    }
}
