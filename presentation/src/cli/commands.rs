//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for round results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every candidate, the scores and the winner
    Full,
    /// Only the winning song
    Winner,
    /// JSON output
    Json,
}

/// CLI arguments for SongMaster
#[derive(Parser, Debug)]
#[command(name = "songmaster")]
#[command(author, version, about = "Multi-agent song generation with an orchestrating judge")]
#[command(long_about = r#"
SongMaster asks several LLM agents to write the same song, has an
orchestrator model score every candidate and pick a winner, and can then
iterate on the winner using the orchestrator's critique.

Configuration files are loaded from (in priority order):
1. SONGMASTER_* environment variables
2. --config <path>       Explicit config file
3. ./songmaster.toml     Project-level config
4. ~/.config/songmaster/config.toml   Global config

Example:
  songmaster generate "a song about leaving a small town" --style "americana"
  songmaster generate "rain on the window" -s "dream pop" --iterations 2 --save
  songmaster iterate 5b0e... --request "rain on the window" -i "make the bridge darker"
  songmaster serve --port 3001
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Generate a song, optionally iterating on the winner
    Generate(GenerateArgs),
    /// Iterate on a song saved in the library
    Iterate(IterateArgs),
    /// Suggest fictional artists for an idea
    Artists(ArtistsArgs),
    /// Inspect or edit prompt templates
    #[command(subcommand)]
    Prompts(PromptsCommand),
    /// List saved songs
    Library,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides `[server] bind`)
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on (overrides `[server] port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Options shared by `generate` and `iterate`
#[derive(Args, Debug, Clone)]
pub struct RoundArgs {
    /// Agent ids from the config to use (default: all configured agents)
    #[arg(short, long = "agent", value_name = "ID")]
    pub agents: Vec<String>,

    /// Orchestrator model (overrides `[orchestrator] model`)
    #[arg(long, value_name = "MODEL")]
    pub orchestrator: Option<String>,

    /// Extra instructions for the agents
    #[arg(short, long, value_name = "TEXT")]
    pub instructions: Option<String>,

    /// Number of improvement rounds to run on the winner
    #[arg(short = 'n', long, default_value_t = 0)]
    pub iterations: u32,

    /// Save the final winner to the library
    #[arg(long)]
    pub save: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// What the song should be about
    pub description: String,

    /// Desired musical style
    #[arg(short, long, default_value = "")]
    pub style: String,

    /// Artist name to write for
    #[arg(long, value_name = "NAME")]
    pub artist: Option<String>,

    /// Artist style (with --artist)
    #[arg(long, value_name = "TEXT", requires = "artist")]
    pub artist_style: Option<String>,

    /// Artist characteristics (with --artist)
    #[arg(long, value_name = "TEXT", requires = "artist")]
    pub artist_traits: Option<String>,

    #[command(flatten)]
    pub round: RoundArgs,
}

#[derive(Args, Debug)]
pub struct IterateArgs {
    /// Id of the saved song to revise
    pub song_id: String,

    /// The original song description
    #[arg(short, long)]
    pub request: String,

    /// The original style (default: the saved song's style)
    #[arg(short, long)]
    pub style: Option<String>,

    #[command(flatten)]
    pub round: RoundArgs,
}

#[derive(Args, Debug)]
pub struct ArtistsArgs {
    /// Idea for the artist
    pub idea: String,

    /// Model to ask (default: `[provider] default_model`)
    #[arg(short, long)]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PromptsCommand {
    /// List the active templates
    List,
    /// Print one template
    Show {
        /// song_generation, orchestrator or artist_generation
        key: String,
    },
    /// Replace a template with the contents of a file
    Set {
        key: String,
        /// File holding the new template
        file: PathBuf,
    },
}
