use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kcsefit",
    version,
    about = "KCSE mean grade and course fit calculator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute mean grade and total points for a student profile
    Mean(ProfileArgs),
    /// Check that a profile lists enough subjects, a language and a mathematics
    Validate(ProfileArgs),
    /// Rank courses by how well the student meets their subject requirements
    Fit(FitArgs),
    /// Coarse fit of the student's aggregate points against course cluster points
    Browse(BrowseArgs),
    /// Print the grade scale, mean grade bands and recognized subjects
    Catalog(OutputArgs),
    /// Write a default kcsefit.toml in the current directory
    Init(InitArgs),
}

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ProfileArgs {
    /// Student profile (.toml, .json, or a `Subject: Grade` text sheet)
    pub profile: PathBuf,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
    /// Course list (.toml or .json)
    pub courses: PathBuf,
    /// Split results into qualified and needs-review groups
    #[arg(long)]
    pub group: bool,
}

#[derive(Debug, Args, Clone)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
    /// Course list (.toml or .json)
    pub courses: PathBuf,
    /// Use these aggregate points instead of the computed total
    #[arg(long)]
    pub points: Option<f64>,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
}
