//! VCF line decoder
//!
//! Turns one VCF data line into one [`VariantRecord`] per alternate allele.
//! Start/end assignment follows Ensembl conventions (see
//! [`normalize_suffix_first`](crate::core::normalize::normalize_suffix_first)).
//!
//! Failures are scoped: a malformed line, an ALT of `.` or an alternate equal
//! to the reference reject the whole line, while a sample that does not
//! decode for one alternate drops only that alternate's record.

use crate::core::error::{DecodeError, DecodeResult};
use crate::core::normalize::{normalize_alternates, secondary_alternates, NormalizedAllele};
use crate::core::{SourceEntry, VariantRecord};
use crate::formats::info::{add_record_attributes, redistribute_info};
use crate::formats::samples::parse_samples;
use crate::formats::vcf::RawRecord;

/// An alternate whose record could not be built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAllele {
    /// 0-based index in the ALT column
    pub allele_index: usize,
    /// `chrom:pos:ref>alt` as written in the line
    pub locus: String,
    pub error: DecodeError,
}

/// Per-allele outcome of decoding one line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedLine {
    /// Records in ALT column order
    pub records: Vec<VariantRecord>,
    pub skipped: Vec<SkippedAllele>,
}

impl DecodedLine {
    pub fn log_skipped(&self) {
        for skipped in &self.skipped {
            log::error!(
                "Variant {} will not be saved: {}",
                skipped.locus,
                skipped.error
            );
        }
    }
}

/// Decoder tagging every record with a file and a study identifier
///
/// Holds no per-line state; one instance can be shared between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDecoder {
    file_id: String,
    study_id: String,
}

impl VariantDecoder {
    pub fn new(file_id: impl Into<String>, study_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            study_id: study_id.into(),
        }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn study_id(&self) -> &str {
        &self.study_id
    }

    /// Decode a line, logging and dropping alternates whose samples do not decode
    pub fn decode(&self, line: &str) -> DecodeResult<Vec<VariantRecord>> {
        let decoded = self.decode_alleles(line)?;
        decoded.log_skipped();
        Ok(decoded.records)
    }

    /// Decode a line, reporting every dropped alternate alongside the records
    pub fn decode_alleles(&self, line: &str) -> DecodeResult<DecodedLine> {
        let raw = RawRecord::parse(line)?;
        let alleles = normalize_alternates(raw.position, raw.reference, &raw.alternates)?;

        let mut decoded = DecodedLine::default();
        for allele in &alleles {
            match self.build_record(&raw, &alleles, allele) {
                Ok(record) => decoded.records.push(record),
                Err(error) => decoded.skipped.push(SkippedAllele {
                    allele_index: allele.allele_index,
                    locus: raw.locus(allele.allele_index),
                    error,
                }),
            }
        }

        Ok(decoded)
    }

    fn build_record(
        &self,
        raw: &RawRecord<'_>,
        alleles: &[NormalizedAllele],
        allele: &NormalizedAllele,
    ) -> DecodeResult<VariantRecord> {
        let samples = parse_samples(&raw.format, &raw.samples, allele.allele_index)?;

        let mut source = SourceEntry::new(
            self.file_id.as_str(),
            self.study_id.as_str(),
            raw.format.iter().map(|key| key.to_string()).collect(),
            secondary_alternates(allele.allele_index, alleles),
        );
        source.samples = samples;

        // INFO after samples: NS, DP and MQ are computed from them
        redistribute_info(&mut source, raw.info, allele.allele_index);
        add_record_attributes(&mut source, raw.line, raw.quality, raw.filter);

        Ok(VariantRecord::new(
            raw.chromosome,
            allele.start,
            allele.end,
            allele.reference.as_str(),
            allele.alternate.as_str(),
            raw.ids.iter().map(|id| id.to_string()).collect(),
            source,
        ))
    }
}
