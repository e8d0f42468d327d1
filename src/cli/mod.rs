//! CLI entry points

pub mod serve;

use clap::{Parser, Subcommand};

/// Botflow API - chatbot workflow builder backend
#[derive(Parser)]
#[command(name = "botflow-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
