//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::{TermId, VocabularyId, VIRTUAL_ROOT};

/// Flatten taxonomy hierarchies into depth-annotated trees
#[derive(Parser, Debug)]
#[command(name = "taxotree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Term catalog file (default: `terms_file` setting)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Directory holding a local .taxotree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the flattened hierarchy of a vocabulary
    Tree {
        /// Vocabulary id
        vocabulary: VocabularyId,

        /// Start below this term (0: whole vocabulary)
        #[arg(short, long, default_value_t = VIRTUAL_ROOT)]
        root: TermId,

        /// Emit nodes with depth below this bound only
        #[arg(short, long)]
        max_depth: Option<usize>,

        /// Hide draft terms
        #[arg(long)]
        published_only: bool,

        /// Include draft terms even if settings hide them
        #[arg(long, conflicts_with = "published_only")]
        all: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Indent)]
        format: OutputFormat,

        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Report structural problems (cycles, dangling parents, unreachable terms)
    Check {
        /// Vocabulary ids (default: all)
        vocabularies: Vec<VocabularyId>,
    },

    /// List vocabularies of the catalog
    Vocabularies,

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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
}

/// Rendering of a flattened hierarchy.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per node, indented by depth
    Indent,
    /// Box-drawing tree
    Tree,
    /// TOML array of nodes
    Toml,
}
