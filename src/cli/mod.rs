//! CLI module for qarag.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// qarag - grounded answers from question/answer transcripts
///
/// Splits a Q:/A: transcript into chunks, indexes them with embeddings, and answers
/// questions strictly from the retrieved chunks.
#[derive(Parser, Debug)]
#[command(name = "qarag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "QARAG_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chunk a transcript and (re)build the index
    Ingest {
        /// Plain-text transcript (defaults to source.path from the config)
        path: Option<String>,

        /// Print chunk statistics without embedding or writing the index
        #[arg(long)]
        dry_run: bool,
    },

    /// Ask a single question
    Ask {
        /// The question to ask
        question: String,

        /// Generation model (defaults to rag.model)
        #[arg(short, long)]
        model: Option<String>,

        /// Number of chunks to retrieve (defaults to rag.top_k)
        #[arg(short)]
        k: Option<usize>,

        /// Show the retrieved chunks under the answer
        #[arg(long)]
        sources: bool,
    },

    /// Show the chunks most similar to a query
    Search {
        /// Search query
        query: String,

        /// Number of results (defaults to rag.top_k)
        #[arg(short)]
        k: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive question loop
    Chat {
        /// Generation model (defaults to rag.model)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show what the stored index contains
    Inspect,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}
