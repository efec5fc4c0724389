//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Classification hierarchy console: inspect, filter, and restructure
/// classification trees
#[derive(Parser, Debug)]
#[command(name = "classtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase debug output (-d, -dd, -ddd)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Record store file (default from config)
    #[arg(short = 'f', long, global = true)]
    pub file: Option<PathBuf>,

    /// Tenant domain (default from config)
    #[arg(long, global = true)]
    pub domain: Option<String>,

    /// Classification kind (default from config)
    #[arg(long, global = true)]
    pub kind: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the classification forest
    Tree,

    /// List nodes matching a filter
    Filter {
        /// Text to match against name or key (case-insensitive)
        #[arg(short, long, default_value = "")]
        text: String,

        /// Category to match exactly (case-insensitive)
        #[arg(short, long, default_value = "")]
        category: String,
    },

    /// Move a classification under a new parent
    Reparent {
        /// Id of the classification to move
        id: String,

        /// Id of the new parent; omit to move to root
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init,

    /// Show config paths
    Path,
}
