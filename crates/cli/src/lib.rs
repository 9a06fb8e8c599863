mod clear;
mod status;
mod warm;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "trellis",
    version,
    about = "Declarative class discovery for theme code",
    long_about = "Trellis scans a theme's application code for classes carrying hook, content type, \
                  rendering extension, route and template controller markers, and registers them \
                  with the host in three lifecycle phases. Discovery results can be cached per project."
)]
pub struct Cli {
    /// Project root holding trellis.json, composer.json and the class catalog.
    /// Defaults to the current directory.
    #[arg(long, global = true, value_name = "PROJECT_PATH")]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rebuild the discovery cache
    #[command(
        name = "discovery:warm",
        long_about = "Clears the cache, scans the application directory and opt-in classes, runs every \
                      phase and stores the findings the configured strategy covers."
    )]
    Warm,
    /// Delete the discovery cache and its strategy tag
    #[command(name = "discovery:clear")]
    Clear,
    /// Report whether the discovery cache is enabled, present and valid
    #[command(name = "discovery:status")]
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = trellis_runtime::init_logging("cli", false);

    let project = match cli.project {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Warm => warm::run(&project),
        Commands::Clear => clear::run(&project),
        Commands::Status { json } => status::run(&project, json),
    }
}
