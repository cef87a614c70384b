use clap::Parser;
use git_context_menu::commands::CommandId;
use git_context_menu::{
    self, CommandOutcome, NotificationLevel, Options, PrefixMatch, RecordingHost,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{fmt, EnvFilter};

fn parse_command(s: &str) -> std::result::Result<CommandId, String> {
    s.parse::<CommandId>().map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Command to run: addFile, addFolder, unstageFile, unstageFolder or showDiff
    #[arg(value_parser = parse_command)]
    command: CommandId,

    /// File or folder the command acts on
    path: Option<PathBuf>,

    /// Repository to use; may repeat, only the first repository found is used
    /// (defaults to the current directory)
    #[arg(short, long)]
    repo: Vec<PathBuf>,

    /// Only treat changes under `<PATH>/` as inside a folder when unstaging
    #[arg(short, long)]
    boundary_aware: bool,

    /// Print notifications and the command outcome as JSON
    #[arg(short, long)]
    json: bool,

    /// Log level
    #[arg(global = true, short, long, value_enum, default_value = "error")]
    log: LevelFilter,
}

fn print_report(host: &RecordingHost, outcome: &CommandOutcome) {
    for notification in host.notifications() {
        match notification.level {
            NotificationLevel::Information => println!("ℹ️  {}", notification.message),
            NotificationLevel::Warning => eprintln!("⚠️  {}", notification.message),
        }
    }

    for view in host.diffs() {
        println!("\n📄 {}", view.title);
        println!("==================");
        if view.patch.is_empty() {
            println!("(no differences)");
        } else {
            print!("{}", view.patch);
        }
    }

    if matches!(outcome, CommandOutcome::Skipped) {
        debug!("No repository or path; nothing was done");
    }
}

#[tokio::main]
async fn main() -> git_context_menu::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive(cli.log.into());

    fmt()
        .with_env_filter(env_filter)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .pretty()
        .init();

    let cwd = std::env::current_dir()?;
    let repos = if cli.repo.is_empty() {
        vec![cwd.clone()]
    } else {
        cli.repo
    };
    let target = cli
        .path
        .as_deref()
        .map(|path| git_context_menu::resolve_target(path, &cwd));
    let options = Options {
        prefix_match: if cli.boundary_aware {
            PrefixMatch::SegmentBoundary
        } else {
            PrefixMatch::Literal
        },
    };
    let command = cli.command;
    let json_output = cli.json;

    debug!(command = %command, target = ?target, repos = ?repos, "Running command");

    // Git calls block on child processes
    tokio::task::spawn_blocking(move || -> git_context_menu::Result<()> {
        let host = RecordingHost::new();
        let repo_paths: Vec<&Path> = repos.iter().map(PathBuf::as_path).collect();
        let extension = git_context_menu::activate(&repo_paths, &host, options)?;

        let target = target.map(|path| path.to_string_lossy().into_owned());
        let outcome = extension.execute_id(command, target.as_deref())?;
        extension.deactivate();

        if json_output {
            let report = json!({
                "command": command.to_string(),
                "notifications": host.notifications(),
                "result": outcome,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&report)
                    .map_err(|e| git_context_menu::Error::IoError(e.into()))?
            );
        } else {
            print_report(&host, &outcome);
        }
        Ok(())
    })
    .await
    .map_err(|e| git_context_menu::Error::IoError(std::io::Error::other(e)))?
}
