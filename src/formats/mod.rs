//! VCF text decoding
//!
//! Tokenizer, per-sample and INFO handling, the line decoder built on them,
//! and the batch driver that runs the decoder over a file.

pub mod decoder;
pub mod info;
pub mod samples;
pub mod vcf;

pub use decoder::{DecodedLine, SkippedAllele, VariantDecoder};
pub use info::{add_record_attributes, format_quality, redistribute_info};
pub use samples::{parse_samples, GENOTYPE_KEY};
pub use vcf::{decode_vcf, decode_vcf_reader, DecodeOptions, DecodeStats, OutputFormat, RawRecord};
