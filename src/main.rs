//! vcf-decompose CLI entry point
//!
//! Splits every record of a VCF file into normalized single-alternate variants.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use vcf_decompose::formats::{self, DecodeOptions, OutputFormat, VariantDecoder};

/// Output encoding (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormatArg {
    /// One JSON object per record
    #[default]
    #[value(name = "json")]
    Json,
    /// Tab-separated columns
    #[value(name = "tsv")]
    Tsv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Tsv => OutputFormat::Tsv,
        }
    }
}

#[derive(Parser)]
#[command(name = "vcf-decompose")]
#[command(about = "Decompose multiallelic VCF records into normalized single-alternate variants")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a VCF file (plain, gzip or bzip2)
    Decode {
        /// Input VCF file
        input: PathBuf,
        /// Output file (optional, stdout if not specified)
        output: Option<PathBuf>,
        /// File identifier attached to every record
        #[arg(long = "file-id")]
        file_id: String,
        /// Study identifier attached to every record
        #[arg(long = "study-id")]
        study_id: String,
        /// Number of threads
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
        /// Output encoding
        #[arg(short = 'f', long = "output-format", default_value = "json")]
        output_format: OutputFormatArg,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Decode { input, output, file_id, study_id, threads, output_format } => {
            let decoder = VariantDecoder::new(file_id, study_id);
            let options = DecodeOptions {
                threads: threads.max(1),
                output_format: output_format.into(),
            };

            match &output {
                Some(path) => eprintln!("Decoding VCF file: {:?} -> {:?}", input, path),
                None => eprintln!("Decoding VCF file: {:?} -> stdout", input),
            }
            let stats = formats::decode_vcf(input, output, &decoder, &options)
                .map_err(|e| anyhow::anyhow!("Failed to decode VCF file: {}", e))?;

            eprintln!("\n=== Decoding Statistics ===");
            eprintln!("Data lines:      {}", stats.lines);
            eprintln!("Records:         {}", stats.records);
            eprintln!("Not variants:    {}", stats.not_variant_lines);
            eprintln!("Rejected lines:  {}", stats.rejected_lines);
            eprintln!("Skipped alleles: {}", stats.skipped_alleles);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
