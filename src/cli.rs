//! CLI argument parsing.
//!
//! Every flag is optional: a bare `devjoke` performs one complete run against
//! the current directory, which is how schedulers invoke it.
use clap::Parser;
use std::path::PathBuf;

/// Default number of jokes kept in `.jokes.json`.
pub const DEFAULT_HISTORY_CAP: usize = 10;

#[derive(Parser, Debug)]
#[command(
    name = "devjoke",
    version,
    about = "Fetch a programming joke and rotate it into a README",
    after_help = "Environment:\n  GEMINI_API_KEY   API credential (required)\n  GEMINI_API_BASE  Endpoint base URL override\n  GEMINI_MODEL     Model name override\n  RUST_LOG         Log filter (default: warn)\n\nExamples:\n  devjoke\n  devjoke --root ./site --history-cap 50\n  devjoke --document docs/JOKES.md --json"
)]
pub struct RootArgs {
    /// Directory holding the history, analytics, and target document
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Target document (relative paths resolve against --root)
    #[arg(long, value_name = "PATH")]
    pub document: Option<PathBuf>,

    /// Maximum number of jokes retained in history
    #[arg(long, value_name = "N", default_value_t = DEFAULT_HISTORY_CAP)]
    pub history_cap: usize,

    /// Print the final record as JSON instead of a one-line summary
    #[arg(long)]
    pub json: bool,

    /// Emit debug logging to stderr
    #[arg(long)]
    pub verbose: bool,
}
