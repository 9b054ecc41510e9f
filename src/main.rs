use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::error;
use rayon::prelude::*;

use lumamark::config::{
    self, DEFAULT_COEFFICIENT_COL, DEFAULT_COEFFICIENT_ROW, DEFAULT_EXPECTED_LEN, DEFAULT_KEY,
    DEFAULT_STRENGTH,
};
use lumamark::pipeline;
use lumamark::{Coefficient, Framing, WatermarkConfig};

/// lumamark: hide a short text in the luminance of an image and read it back.
#[derive(Parser)]
#[command(name = "lumamark", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Parameters that must match between embedding and extraction.
#[derive(Args)]
struct MarkArgs {
    /// Key seeding block selection (default: 1234)
    #[arg(short, long, default_value_t = DEFAULT_KEY, allow_hyphen_values = true)]
    key: i64,

    /// Coefficient amplitude added on embed, weak-bit threshold on extract (default: 20.0)
    #[arg(long, default_value_t = DEFAULT_STRENGTH)]
    strength: f64,

    /// Row of the carrier DCT coefficient (default: 4)
    #[arg(long, default_value_t = DEFAULT_COEFFICIENT_ROW)]
    row: usize,

    /// Column of the carrier DCT coefficient (default: 3)
    #[arg(long, default_value_t = DEFAULT_COEFFICIENT_COL)]
    col: usize,

    /// Wrap the payload in a length/CRC frame
    #[arg(long)]
    checked: bool,
}

impl MarkArgs {
    fn to_config(&self) -> WatermarkConfig {
        WatermarkConfig {
            key: self.key,
            strength: self.strength,
            coefficient: Coefficient::new(self.row, self.col),
            framing: if self.checked {
                Framing::Checked
            } else {
                Framing::Raw
            },
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a payload into an image
    Embed {
        /// Input image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output image path (.png recommended)
        #[arg(short, long)]
        output: PathBuf,

        /// Text to embed (single-byte characters only)
        #[arg(short, long)]
        payload: String,

        #[command(flatten)]
        mark: MarkArgs,
    },

    /// Extract a payload from one or more images
    Extract {
        /// Input image paths
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Expected payload length in characters, ignored with --checked (default: 16)
        #[arg(short, long, default_value_t = DEFAULT_EXPECTED_LEN)]
        length: usize,

        #[command(flatten)]
        mark: MarkArgs,
    },

    /// Show how many bits and characters an image can carry
    Capacity {
        /// Input image path
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Embed {
            input,
            output,
            payload,
            mark,
        } => {
            let cfg = mark.to_config();
            let report = pipeline::embed::embed_file(&input, &output, &payload, &cfg)?;
            println!(
                "embedded {} bits ({} available) into {}",
                report.bits,
                report.capacity,
                output.display()
            );
        }

        Commands::Extract {
            inputs,
            length,
            mark,
        } => {
            let cfg = WatermarkConfig {
                expected_len: length,
                ..mark.to_config()
            };

            let progress = if inputs.len() > 1 {
                let bar = ProgressBar::new(inputs.len() as u64);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("[{elapsed_precise}] {bar:40.green/black} {pos}/{len} images ({eta})")?
                        .progress_chars("##-"),
                );
                bar
            } else {
                ProgressBar::hidden()
            };

            // Each image is independent; the engine shares no state between calls.
            let results: Vec<_> = inputs
                .par_iter()
                .map(|path| {
                    let result = pipeline::extract::extract_file(path, &cfg);
                    progress.inc(1);
                    (path, result)
                })
                .collect();
            progress.finish_and_clear();

            let mut failures = 0usize;
            for (path, result) in results {
                match result {
                    Ok(extraction) => println!(
                        "{}: {} ({:.0}% confidence)",
                        path.display(),
                        extraction.text,
                        extraction.confidence() * 100.0
                    ),
                    Err(e) => {
                        error!("{}: {:#}", path.display(), e);
                        failures += 1;
                    }
                }
            }
            if failures > 0 {
                anyhow::bail!("{} of {} images failed", failures, inputs.len());
            }
        }

        Commands::Capacity { input } => {
            let bits = pipeline::extract::capacity_of(&input)?;
            println!(
                "{}: {} bits, {} characters raw, {} characters checked",
                input.display(),
                bits,
                bits / 8,
                (bits / 8).saturating_sub(config::FRAME_HEADER_SIZE)
            );
        }
    }

    Ok(())
}
