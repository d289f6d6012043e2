use clap::{
    Parser,
    Subcommand,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge replicate detections into RT consensus calls.
    Consensus(ConsensusArgs),
    /// Keep the annotations whose molecular species occur in a reference table.
    Filter(FilterArgs),
    /// Write a template configuration file.
    WriteTemplate(WriteTemplateArgs),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum PossibleMode {
    #[default]
    Clustered,
    Flat,
}

#[derive(Parser, Debug, Clone)]
pub struct ConsensusArgs {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the annotation table (will over-write the config file)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Path to the output table (will over-write the config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Consolidation mode (will over-write the config file)
    #[arg(short, long, value_enum)]
    pub mode: Option<PossibleMode>,

    /// RT tolerance in minutes (will over-write the config file)
    #[arg(short, long)]
    pub rt_tolerance: Option<f64>,
}

#[derive(Parser, Debug, Clone)]
pub struct FilterArgs {
    /// The annotation table to filter.
    #[arg(short, long)]
    pub input: PathBuf,

    /// The table whose molecular species are kept.
    #[arg(short, long)]
    pub reference: PathBuf,

    /// The path to the output table.
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct WriteTemplateArgs {
    /// The directory to write the template into.
    #[arg(short, long)]
    pub output_path: PathBuf,
}
