use crate::data::LayoutMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "climate-dashboard")]
#[command(about = "Malaysia climate CSV cleaning and chart dashboard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// CSV to open when the dashboard starts
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    #[arg(short, long, global = true, help = "JSON configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, help = "Override the column layout")]
    pub layout: Option<LayoutArg>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

/// Command-line spelling of [`LayoutMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// Exactly nine columns in DOSM order
    Positional,
    /// Columns already carry canonical names
    Labeled,
    /// Labeled when every required name is present
    Auto,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Positional => LayoutMode::Positional,
            LayoutArg::Labeled => LayoutMode::Labeled,
            LayoutArg::Auto => LayoutMode::Auto,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a CSV and write the canonical table
    Clean {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, help = "Output CSV file")]
        output: PathBuf,
    },

    /// Filter a CSV and write the table, report and charts
    Export {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, help = "Directory for the exported files")]
        output_dir: PathBuf,

        #[arg(long, help = "First year to keep [default: earliest in data]")]
        from_year: Option<i32>,

        #[arg(long, help = "Last year to keep [default: latest in data]")]
        to_year: Option<i32>,

        #[arg(long = "state", help = "State to keep, repeatable [default: all]")]
        states: Vec<String>,
    },
}
