mod index;
mod show;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "qbind",
    version,
    about = "Qualified-type binding and offline indexing",
    long_about = "qbind reads qualified-type manifests from a set of locations and records the \
                  discovered type names in a sorted, merge-safe index so that later runs can skip \
                  a full rescan."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index qualified types found in the given locations
    #[command(
        long_about = "Walks each location for *.qualified.json manifests and merges the discovered \
                            type names into META-INF/<namespace>/<category> under the output directory. \
                            Missing locations and malformed manifests are logged and skipped."
    )]
    Index {
        /// Manifest files or directories to scan
        #[arg(value_name = "LOCATIONS")]
        locations: Vec<PathBuf>,
        /// Directory receiving the index. Defaults to the current directory.
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Print a persisted index
    Show {
        /// Directory holding the index. Defaults to the current directory.
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Index category
        #[arg(long, default_value = qbind_api::models::names::NAMED)]
        category: String,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = qbind_runtime::init_logging("cli", true);

    match cli.command {
        Commands::Index { locations, output } => index::run(locations, output),
        Commands::Show { dir, category } => show::run(dir, &category),
    }
}

fn current_dir_or(dir: Option<PathBuf>) -> PathBuf {
    dir.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}
