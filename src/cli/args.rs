//! CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::GroupBy;

#[derive(Parser, Debug)]
#[command(name = "emocheckr")]
#[command(version)]
#[command(about = "Speech-emotion dataset indexing, feature extraction and classification")]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true, env = "EMOCHECKR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Catalogue a dataset directory and summarise it
    Index {
        /// Dataset root
        dir: PathBuf,

        /// Print the catalogue as JSON
        #[arg(long)]
        json: bool,

        /// List every record
        #[arg(long)]
        list: bool,
    },

    /// Descriptive features of a single file
    Features {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Extract features for a whole dataset
    Batch {
        /// Dataset root
        dir: PathBuf,

        /// Process only the first N files in catalogue order
        #[arg(short = 'n', long)]
        max_files: Option<usize>,

        /// Write the table to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Summarise one feature per group
        #[arg(short, long)]
        group_by: Option<GroupBy>,

        /// Feature summarised with --group-by
        #[arg(long, default_value = "pitch_mean")]
        feature: String,
    },

    /// WAV header properties
    Props { file: PathBuf },

    /// Convert a WAV file to 16-bit PCM at the target format
    Convert {
        input: PathBuf,
        output: PathBuf,

        /// Target channel count (only downmix to 1 is supported)
        #[arg(long)]
        channels: Option<u16>,

        /// Target sample rate in Hz
        #[arg(long)]
        rate: Option<u32>,

        /// Fail instead of writing the original bytes when conversion is impossible
        #[arg(long)]
        strict: bool,
    },

    /// Predict the emotion of a recording
    Predict {
        file: PathBuf,

        /// Model file (overrides config)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Label encoder JSON (overrides config)
        #[arg(long)]
        encoder: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Average duration of the catalogued recordings
    Duration { dir: PathBuf },

    /// Explain what each descriptive feature measures
    Describe {
        /// Include the cepstral coefficients
        #[arg(long)]
        mfcc: bool,
    },

    /// Print the effective configuration as JSON
    ShowConfig,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}
