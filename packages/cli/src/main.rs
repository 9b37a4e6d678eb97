mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    blocks, edit, init, list, new, publish, render, BlocksArgs, EditArgs, InitArgs, ListArgs,
    NewArgs, PublishArgs, RenderArgs,
};
use tracing_subscriber::EnvFilter;

/// Pagecraft CLI - block-based landing pages from the terminal
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Pagecraft project
    Init(InitArgs),

    /// Show the block palette
    Blocks(BlocksArgs),

    /// Create a blank draft page
    New(NewArgs),

    /// List pages
    List(ListArgs),

    /// Make a page publicly visible
    Publish(PublishArgs),

    /// Return a page to draft
    Unpublish(PublishArgs),

    /// Apply a file of edit operations to a page
    Edit(EditArgs),

    /// Render a page to HTML
    Render(RenderArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(command: Command) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();

    match command {
        Command::Init(args) => init(args, &cwd),
        Command::Blocks(args) => blocks(args),
        Command::New(args) => new(args, &cwd).await,
        Command::List(args) => list(args, &cwd).await,
        Command::Publish(args) => publish(args, true, &cwd).await,
        Command::Unpublish(args) => publish(args, false, &cwd).await,
        Command::Edit(args) => edit(args, &cwd).await,
        Command::Render(args) => render(args, &cwd).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli.command).await {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
