use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod session;

use session::Session;

#[derive(Parser, Debug)]
#[command(name = "finsift", version, about = "Categorize bank-statement exports")]
struct Cli {
    /// Where the ruleset and session snapshot live (defaults to the
    /// platform data directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List categories and their keywords
    Categories,

    /// Create a new empty category
    AddCategory {
        name: String,
    },

    /// Parse a statement CSV and classify it
    Import {
        file: PathBuf,
    },

    /// Re-import a statement, apply a category-edit list, and learn from it
    ApplyEdits {
        file: PathBuf,

        /// CSV with `Row,Category` columns (0-based row into the debit table)
        edits: PathBuf,
    },

    /// Forget the session snapshot of corrected categories
    ClearSnapshot,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => directories::ProjectDirs::from("com", "finsift", "finsift")
            .context("could not determine a data directory; pass --data-dir")?
            .data_dir()
            .to_path_buf(),
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    let session = Session::new(&data_dir);

    match cli.command {
        Command::Categories => commands::list_categories(&session),
        Command::AddCategory { name } => commands::add_category(&session, &name),
        Command::Import { file } => commands::import(&session, &file),
        Command::ApplyEdits { file, edits } => commands::apply_edits(&session, &file, &edits),
        Command::ClearSnapshot => commands::clear_snapshot(&session),
    }
}
