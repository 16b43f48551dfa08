//! CLI definitions for Lotlift.

use clap::{Parser, Subcommand};

/// Lotlift CLI.
#[derive(Parser)]
#[command(name = "lotlift")]
#[command(about = "Lift dealer vehicle listings into Facebook Marketplace")]
#[command(version)]
pub(crate) struct Cli {
    /// Override headless browser mode (true/false)
    #[arg(long, global = true, value_name = "BOOL")]
    pub headless: Option<bool>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scan a dealer listing page into the history
    Scan {
        /// Listing page URL
        url: String,
    },

    /// List scanned listings, most recent first
    History,

    /// Show one stored listing in full
    Show {
        /// Listing URL (defaults to the most recently scanned)
        url: Option<String>,
    },

    /// Generate an AI description for a stored listing
    Describe {
        /// Listing URL (defaults to the most recently scanned)
        url: Option<String>,

        /// Ollama model to use; persisted as the selected model
        #[arg(long)]
        model: Option<String>,

        /// Instruction template for the prompt; persisted for later runs
        #[arg(long)]
        instructions: Option<String>,
    },

    /// List models installed on the Ollama server
    Models {
        /// Ollama server URL; persisted for later runs
        #[arg(long)]
        url: Option<String>,
    },

    /// Pull a model onto the Ollama server
    Pull {
        /// Model name, e.g. "llama3.2"
        model: String,
    },

    /// Download a stored listing's photos
    Download {
        /// Listing URL (defaults to the most recently scanned)
        url: Option<String>,
    },

    /// Autofill the Marketplace vehicle form from a stored listing
    Relist {
        /// Listing URL (defaults to the most recently scanned)
        url: Option<String>,
    },

    /// List known site definitions
    Sites,
}
