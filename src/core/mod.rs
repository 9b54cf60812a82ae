//! Core decoding functionality
//!
//! This module contains the allele normalizer, the genotype remapper,
//! the decoded record model and the input line source.

pub mod error;
pub mod genotype;
pub mod io;
pub mod normalize;
mod variant;

pub use error::{
    DecodeError, DecodeResult, GenotypeError, GenotypeResult, Result, VcfDecomposeError,
};
pub use genotype::{map_to_multiallelic_index, remap_genotype, Genotype};
pub use io::{detect_compression, open_input, CompressionFormat, LineIterator, DEFAULT_BUFFER_SIZE};
pub use normalize::{normalize_alternates, normalize_suffix_first, secondary_alternates, NormalizedAllele};
pub use variant::{SampleData, SourceEntry, VariantRecord, VariantType, EMPTY_ALLELE, SV_THRESHOLD};
