// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::{Args, Command, OutputFormat};
pub use output::{
    format_batch_summary, format_catalogue_listing, format_conversion, format_csv,
    format_descriptions, format_features, format_group_statistics, format_json, format_prediction, format_properties, format_summary,
    format_table, Style,
};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::config::{ConfigBuilder, PipelineConfig};
use crate::core::analysis::{basic_feature_descriptions, mfcc_feature_descriptions};
use crate::core::wav::try_convert;
use crate::core::EmotionAnalyzer;
use crate::dataset::{average_duration, CatalogueSummary};
use crate::pipeline::feature_statistics;

/// Run a parsed command line
pub fn run(args: Args) -> Result<()> {
    let style = Style { color: !args.no_color };
    let config = PipelineConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    match args.command {
        Command::Index { dir, json, list } => {
            let analyzer = EmotionAnalyzer::with_config(config);
            let catalogue = analyzer.load_catalogue(&dir);
            if json {
                println!("{}", format_json(catalogue.as_ref())?);
            } else {
                print!("{}", format_summary(&CatalogueSummary::from_catalogue(&catalogue), style));
                if list {
                    println!();
                    print!("{}", format_catalogue_listing(&catalogue));
                }
            }
        }

        Command::Features { file, json } => {
            let analyzer = EmotionAnalyzer::with_config(config);
            let features = analyzer
                .extract_single_file_features(&file)
                .with_context(|| format!("No features extracted from {}", file.display()))?;
            if json {
                println!("{}", format_json(&features)?);
            } else {
                print!("{}", format_features(&file.display().to_string(), &features, style));
            }
        }

        Command::Batch {
            dir,
            max_files,
            output,
            format,
            group_by,
            feature,
        } => {
            let analyzer = EmotionAnalyzer::with_config(config);
            let catalogue = analyzer.load_catalogue(&dir);
            if catalogue.is_empty() {
                println!("{}", style.paint("No catalogued audio files found!", colorful::Color::Red));
                return Ok(());
            }

            let total = max_files.unwrap_or(usize::MAX).min(catalogue.len());
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .context("Invalid progress template")?
                    .progress_chars("#>-"),
            );
            let table = analyzer.extract_batch_features(&catalogue, max_files, |p| {
                pb.set_position(p.completed as u64);
                pb.set_message(p.filename.to_string());
            });
            pb.finish_and_clear();

            let rendered = match format {
                OutputFormat::Table => format_table(&table),
                OutputFormat::Json => format_json(table.as_ref())?,
                OutputFormat::Csv => format_csv(&table),
            };
            match &output {
                Some(path) => {
                    std::fs::write(path, &rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", rendered),
            }
            eprint!("{}", format_batch_summary(&table, style));

            if let Some(group_by) = group_by {
                let stats = feature_statistics(&table, &feature, group_by)?;
                print!("{}", format_group_statistics(&feature, group_by, &stats, style));
            }
        }

        Command::Props { file } => {
            let bytes = read_bytes(&file)?;
            match crate::core::wav::read_audio_properties(&bytes) {
                Ok(props) => print!("{}", format_properties(&file.display().to_string(), &props, style)),
                Err(e) => println!(
                    "{} {}: {}",
                    style.paint("✗", colorful::Color::Red),
                    file.display(),
                    e
                ),
            }
        }

        Command::Convert {
            input,
            output,
            channels,
            rate,
            strict,
        } => {
            let channels = channels.unwrap_or(config.normalize.target_channels);
            let rate = rate.unwrap_or(config.normalize.target_rate);
            let bytes = read_bytes(&input)?;

            if strict {
                let converted = try_convert(&bytes, channels, rate)
                    .with_context(|| format!("Cannot convert {}", input.display()))?;
                write_bytes(&output, &converted)?;
                println!("Converted -> {}", output.display());
            } else {
                let analyzer = EmotionAnalyzer::with_config(config);
                let result = analyzer.normalize_audio_to(&bytes, channels, rate);
                write_bytes(&output, &result.bytes)?;
                print!("{}", format_conversion(&output.display().to_string(), &result, style));
            }
        }

        Command::Predict {
            file,
            model,
            encoder,
            json,
        } => {
            let mut builder = ConfigBuilder::from_config(config);
            if let Some(model) = model {
                builder = builder.model_path(model);
            }
            if let Some(encoder) = encoder {
                builder = builder.encoder_path(encoder);
            }
            let analyzer = EmotionAnalyzer::with_config(builder.build()?);
            analyzer
                .load_predictor()
                .context("Failed to load emotion classifier")?;

            let result = analyzer
                .predict_emotion(&file)
                .with_context(|| format!("Prediction failed for {}", file.display()))?;
            if json {
                println!("{}", format_json(&result)?);
            } else {
                print!("{}", format_prediction(&file.display().to_string(), &result, style));
            }
        }

        Command::Duration { dir } => {
            let analyzer = EmotionAnalyzer::with_config(config);
            let catalogue = analyzer.load_catalogue(&dir);
            if catalogue.is_empty() {
                bail!("No catalogued audio files under {}", dir.display());
            }
            let avg = average_duration(&catalogue);
            println!("Average duration: {:.2}s over {} recordings", avg, catalogue.len());
        }

        Command::Describe { mfcc } => {
            let mut descriptions = basic_feature_descriptions();
            if mfcc {
                descriptions.extend(mfcc_feature_descriptions());
            }
            print!("{}", format_descriptions(&descriptions, style));
        }

        Command::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
