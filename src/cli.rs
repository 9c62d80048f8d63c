use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codecanvas")]
#[command(about = "Import graphs for JS/TS/Python workspaces, one bounded neighborhood at a time")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Index a workspace and print statistics
    Index(IndexArgs),

    /// Materialize the graph around seed files and print it as a panel message
    Graph(GraphArgs),

    /// Serve panel messages over HTTP
    Serve(ServeArgs),

    /// Generate a starter .codecanvas.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Workspace root (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Additional glob to exclude (repeatable)
    #[arg(long = "exclude")]
    pub exclude: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct GraphArgs {
    /// Workspace root (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Seed file, absolute or relative to the workspace root (repeatable)
    #[arg(short, long = "seed")]
    pub seeds: Vec<PathBuf>,

    /// Node budget (defaults to graph.max_nodes from the config)
    #[arg(long)]
    pub max_nodes: Option<usize>,

    /// Anchor edges on declarations in the target files
    #[arg(long)]
    pub enrich: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Workspace root (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Port for HTTP server
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .codecanvas.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
