//! Error types for vcf-decompose
//!
//! Defines all error types used throughout the library.

use thiserror::Error;

/// Main error type for batch decoding operations
#[derive(Debug, Error)]
pub enum VcfDecomposeError {
    /// Record decoding errors
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Output serialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Thread pool could not be created
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),
}

/// Errors raised while decoding a single VCF data line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The line cannot be split into a valid record (too few columns, bad number)
    #[error("Malformed record: {message}")]
    MalformedRecord { message: String },

    /// The line or one of its alternates does not describe a variant
    #[error("Not a variant: {message}")]
    NotAVariant { message: String },

    /// A sample column does not decode under the declared FORMAT
    #[error("Non-standard sample field in sample {sample}: {message}")]
    NonStandardSampleField { sample: usize, message: String },
}

impl DecodeError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            message: message.into(),
        }
    }

    pub fn not_a_variant(message: impl Into<String>) -> Self {
        Self::NotAVariant {
            message: message.into(),
        }
    }

    /// Whether this error rejects the whole line rather than a single allele
    pub fn is_line_level(&self) -> bool {
        !matches!(self, Self::NonStandardSampleField { .. })
    }
}

/// Errors that can occur while parsing a genotype string such as `0/1` or `1|.`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenotypeError {
    /// Genotype string is empty
    #[error("Empty genotype")]
    Empty,

    /// An allele call is neither a non-negative integer nor `.`
    #[error("Invalid allele call '{call}' in genotype '{genotype}'")]
    InvalidCall { genotype: String, call: String },
}

/// Result type alias for batch operations
pub type Result<T> = std::result::Result<T, VcfDecomposeError>;

/// Result type alias for line decoding operations
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Result type alias for genotype parsing
pub type GenotypeResult<T> = std::result::Result<T, GenotypeError>;
