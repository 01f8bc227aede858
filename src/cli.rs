use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "marathon",
    version,
    about = "Plan the longest quality-climbing watch order and track progress"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Plan {
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    Fetch {
        url: String,
    },
    Next,
    Undo,
    List,
    Tui,
}
