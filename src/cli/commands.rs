use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use crate::reporting::ExportFormat;

#[derive(Parser)]
#[command(name = "contract-bench", version, about = "Compare and benchmark smart contract vulnerability detectors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered tools and whether they can run
    Tools(ToolsArgs),
    /// Run tools against one contract and compare their findings
    Compare(CompareArgs),
    /// Score tools against a labeled dataset
    Benchmark(BenchmarkArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ToolsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct CompareArgs {
    /// Solidity source file
    pub file: PathBuf,

    /// Contract name (defaults to the file stem)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Known vulnerability types, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub ground_truth: Option<Vec<String>>,

    /// Tools to run, comma-separated (defaults to every available tool)
    #[arg(long, value_delimiter = ',')]
    pub tools: Option<Vec<String>>,

    /// Write the result to this file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Print the full result record as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct BenchmarkArgs {
    /// Dataset manifest (YAML or JSON)
    pub dataset: PathBuf,

    /// Tools to run, comma-separated (defaults to every available tool)
    #[arg(long, value_delimiter = ',')]
    pub tools: Option<Vec<String>>,

    /// Write every comparison result to this file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Print metrics as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(value_name = "CONFIG")]
    pub file: PathBuf,
}
