mod commands;
mod core;
mod docs;
mod release;
mod ui;

use clap::{Parser, Subcommand};
use commands::HeadingsFormat;
use crate::core::context::RepoContext;
use crate::core::error::{RelkitError, RelkitResult, print_error};
use log::LevelFilter;
use std::path::PathBuf;

/// Release orchestration and docs heading tooling for multi-package npm repositories
#[derive(Parser)]
#[command(name = "relkit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Repository root (default: current directory); docs frame paths resolve against it
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Release engineering
  // ============================================================================
  /// Release the package: bump versions, changelog, commit, tag, publish, push
  Release {
    /// Version to release (default: patch increment of the current version)
    #[arg(value_name = "VERSION")]
    new_version: Option<String>,
    /// Print the release plan without changing anything
    #[arg(long)]
    dry_run: bool,
  },

  /// Upgrade dependencies of every package that has tests
  BumpDependencies,

  /// Recreate package-lock.json files and yarn.lock
  BumpLockfiles,

  /// Link the package into boilerplates and examples with `yarn link`
  Link {
    /// Package to link (default: npm name of the published package)
    package: Option<String>,
  },

  // ============================================================================
  // Docs
  // ============================================================================
  /// Documentation heading tools
  #[command(subcommand)]
  Docs(DocsCommands),
}

#[derive(Subcommand)]
enum DocsCommands {
  /// Process the headings of a frame file (.json or .toml)
  Headings {
    /// Frame file
    frame: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: HeadingsFormat,
  },

  /// Parse a heading title
  Title {
    /// Title text, with inline code in backticks
    title: String,
    /// Print the text/code spans as JSON instead of HTML
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  // RUST_LOG still wins over the flag
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .parse_default_env()
    .format_timestamp(None)
    .init();

  let result = match cli.command {
    Commands::Release { new_version, dry_run } => {
      repo_context(cli.root).and_then(|ctx| commands::run_release(&ctx, new_version, dry_run))
    }
    Commands::BumpDependencies => repo_context(cli.root).and_then(|ctx| commands::run_bump_dependencies(&ctx)),
    Commands::BumpLockfiles => repo_context(cli.root).and_then(|ctx| commands::run_bump_lockfiles(&ctx)),
    Commands::Link { package } => repo_context(cli.root).and_then(|ctx| commands::run_link(&ctx, package)),

    Commands::Docs(docs_cmd) => match docs_cmd {
      DocsCommands::Headings { frame, format } => commands::run_docs_headings(&frame_path(cli.root, frame), format),
      DocsCommands::Title { title, json } => commands::run_docs_title(&title, json),
    },
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

/// Build the repository context once for release commands
fn repo_context(root: Option<PathBuf>) -> RelkitResult<RepoContext> {
  let root = match root {
    Some(root) => root,
    None => std::env::current_dir().map_err(|e| RelkitError::message(format!("Failed to get current directory: {}", e)))?,
  };
  RepoContext::build(&root)
}

/// Relative frame paths resolve against `--root` when it is given
fn frame_path(root: Option<PathBuf>, frame: PathBuf) -> PathBuf {
  match root {
    Some(root) if frame.is_relative() => root.join(frame),
    _ => frame,
  }
}

fn handle_error(err: RelkitError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
