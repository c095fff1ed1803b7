//! CLI module for the retrieval gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Retrieval Gateway - semantic search over per-tenant vector stores
#[derive(Parser)]
#[command(name = "retrieval-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),
}
