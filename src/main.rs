mod export;
mod menu;
mod models;
mod prompt;
mod search;
mod settings;
mod table;

use anyhow::Result;
use clap::Parser;
use menu::{print_banner, Menu, Session};
use prompt::TerminalPrompter;
use search::JobSpySearcher;
use settings::SettingsStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jobpacker")]
#[command(about = "Job harvester for Cleansheet - search job boards and export the results")]
struct Cli {
    /// Settings file (defaults to config.json next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory export files are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Python interpreter with python-jobspy installed
    #[arg(long, default_value = "python3")]
    python: String,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "jobpacker=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = SettingsStore::open(cli.config);
    tracing::debug!(path = %store.path().display(), "using settings file");
    let config = store.load();

    let searcher = JobSpySearcher::new(cli.python);
    let mut prompter = TerminalPrompter::new();

    print_banner();
    let mut menu = Menu::new(&store, &searcher, &mut prompter, cli.output_dir);
    menu.run(Session::new(config))?;

    Ok(())
}
