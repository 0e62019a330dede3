//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Extract strings inside of '_()' calls into .po-like files, which can be
/// translated independently.
#[derive(Debug, Parser)]
#[command(
    name = "popie",
    author,
    version,
    about,
    after_help = "If you are a developer, you may have multiple module repositories next to \
                  the main strawberry.py repository. In that case use --detached: PoPie won't \
                  look for the strawberry.py file, but for the closest directory with a '.git/' \
                  subdirectory instead, and will keep the 'po/' directory there."
)]
pub struct Arguments {
    /// Run in detached mode (project root is the closest directory with '.git/')
    #[arg(long)]
    pub detached: bool,

    /// Return non-zero code if any of the .popie files changes
    #[arg(long)]
    pub strict: bool,

    /// Show changes of updated .popie files
    #[arg(long)]
    pub diff: bool,

    /// Language to keep a catalog for (overrides config file, may be repeated)
    #[arg(short, long = "language", value_name = "CODE")]
    pub languages: Vec<String>,

    /// Enable debug output
    #[arg(short, long, env = "POPIE_DEBUG", value_parser = clap::builder::FalseyValueParser::new())]
    pub verbose: bool,

    /// Paths to directories and files
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}
