//! vcf-decompose - split VCF records into normalized single-alternate variants
//!
//! Each VCF data line is decoded into one [`VariantRecord`] per alternate
//! allele. Alleles are trimmed to their minimal representation, genotypes
//! are rewritten so the record's own alternate is allele `1`, and per-allele
//! INFO values are redistributed.
//!
//! # Features
//!
//! - Zero-copy tokenizing of the input line
//! - Per-allele failure isolation: one bad sample drops one record, not the line
//! - Stateless decoder, safe to share across rayon workers
//! - Plain, gzip/BGZF and bzip2 input for batch decoding
//!
//! # Example
//!
//! ```
//! use vcf_decompose::VariantDecoder;
//!
//! let decoder = VariantDecoder::new("file-1", "study-1");
//! let records = decoder.decode("20\t100\t.\tA\tC,T\t.\t.\t.\tGT\t1/2").unwrap();
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].alternate, "T");
//! assert_eq!(records[1].source.samples[0]["GT"], "2/1");
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::core::{
    DecodeError, DecodeResult, Genotype, GenotypeError, NormalizedAllele, SampleData,
    SourceEntry, VariantRecord, VariantType, VcfDecomposeError,
};
pub use crate::formats::{
    decode_vcf, DecodeOptions, DecodeStats, DecodedLine, OutputFormat, RawRecord, SkippedAllele,
    VariantDecoder,
};
