//! The gradebook binary: an interactive console for student records.

use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;

use gradebook_core::config::load_config_from;
use gradebook_core::Registry;

mod commands;
mod console;

use commands::Session;
use console::Console;

#[derive(Parser)]
#[command(
    name = "gradebook",
    version,
    about = "Student records, exam grades and reports from an interactive menu"
)]
struct Cli {
    /// Directory holding student_records/, marksheets/ and transcripts/
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradebook=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config_from(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let layout = config.layout();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());

    for failure in layout.ensure_directories() {
        console.line(format!("Warning: {failure}"))?;
    }

    let store = layout.record_store();
    let registry = match Registry::load(store.clone()) {
        Ok(registry) => registry,
        Err(e) => {
            console.line(format!("Warning: could not load student records: {e}"))?;
            Registry::new(store)
        }
    };
    tracing::info!("{} students loaded", registry.len());

    let mut session = Session { registry, layout };
    commands::run(&mut session, &mut console)
}
