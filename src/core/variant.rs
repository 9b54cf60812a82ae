//! Decoded variant records
//!
//! One [`VariantRecord`] is produced per alternate allele of a VCF line.
//! All maps and sets are ordered so that serialization is reproducible.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Alleles longer than this are structural variants rather than indels
pub const SV_THRESHOLD: usize = 50;

/// Placeholder written for an empty allele in tabular output
pub const EMPTY_ALLELE: &str = "-";

/// Per-sample data: FORMAT key -> value, iterated in key order
pub type SampleData = BTreeMap<String, String>;

/// Variant class derived from the normalized alleles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VariantType {
    /// Single nucleotide variant
    Snv,
    /// Multi-nucleotide variant (equal-length substitution)
    Mnv,
    /// Insertion or deletion up to [`SV_THRESHOLD`] bases
    Indel,
    /// Structural variant
    Sv,
}

impl VariantType {
    /// Classify a normalized (reference, alternate) pair
    pub fn classify(reference: &str, alternate: &str) -> Self {
        let ref_len = reference.chars().count();
        let alt_len = alternate.chars().count();
        let length = ref_len.max(alt_len);

        if ref_len == alt_len {
            if length > 1 {
                VariantType::Mnv
            } else {
                VariantType::Snv
            }
        } else if length <= SV_THRESHOLD {
            VariantType::Indel
        } else {
            VariantType::Sv
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantType::Snv => "SNV",
            VariantType::Mnv => "MNV",
            VariantType::Indel => "INDEL",
            VariantType::Sv => "SV",
        }
    }
}

/// Study/file-specific data attached to a variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    pub file_id: String,
    pub study_id: String,
    /// FORMAT keys in column order
    pub format: Vec<String>,
    /// Alternates of the original line other than the one this record represents
    pub secondary_alternates: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub samples: Vec<SampleData>,
}

impl SourceEntry {
    pub fn new(
        file_id: impl Into<String>,
        study_id: impl Into<String>,
        format: Vec<String>,
        secondary_alternates: Vec<String>,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            study_id: study_id.into(),
            format,
            secondary_alternates,
            attributes: BTreeMap::new(),
            samples: Vec::new(),
        }
    }

    /// Insert or replace an attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Value of a FORMAT key for one sample
    pub fn sample_value(&self, sample: usize, key: &str) -> Option<&str> {
        self.samples
            .get(sample)
            .and_then(|data| data.get(key))
            .map(String::as_str)
    }
}

/// A normalized single-alternate variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantRecord {
    pub chromosome: String,
    /// 1-based inclusive start
    pub start: u64,
    /// 1-based inclusive end
    pub end: u64,
    pub reference: String,
    pub alternate: String,
    pub ids: BTreeSet<String>,
    #[serde(rename = "type")]
    pub variant_type: VariantType,
    /// max(len(reference), len(alternate))
    pub length: usize,
    pub source: SourceEntry,
}

impl VariantRecord {
    pub fn new(
        chromosome: impl Into<String>,
        start: u64,
        end: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
        ids: BTreeSet<String>,
        source: SourceEntry,
    ) -> Self {
        let reference = reference.into();
        let alternate = alternate.into();
        let variant_type = VariantType::classify(&reference, &alternate);
        let length = reference.chars().count().max(alternate.chars().count());

        Self {
            chromosome: chromosome.into(),
            start,
            end,
            reference,
            alternate,
            ids,
            variant_type,
            length,
            source,
        }
    }

    /// Render the record as one tab-separated line:
    /// CHROM, START, END, REF, ALT, TYPE, IDS, SECONDARY, ATTRIBUTES, then one
    /// column per sample with its `key=value` pairs joined by `:`.
    ///
    /// The `src` attribute is left out since it repeats the input line.
    pub fn to_tsv_line(&self) -> String {
        let mut output = String::with_capacity(256);

        output.push_str(&self.chromosome);
        output.push('\t');
        output.push_str(&self.start.to_string());
        output.push('\t');
        output.push_str(&self.end.to_string());
        output.push('\t');
        output.push_str(allele_or_dash(&self.reference));
        output.push('\t');
        output.push_str(allele_or_dash(&self.alternate));
        output.push('\t');
        output.push_str(self.variant_type.as_str());
        output.push('\t');
        output.push_str(&join_or_dot(self.ids.iter(), ";"));
        output.push('\t');
        output.push_str(&join_or_dot(self.source.secondary_alternates.iter(), ","));
        output.push('\t');

        let attributes = self
            .source
            .attributes
            .iter()
            .filter(|(key, _)| key.as_str() != "src")
            .map(|(key, value)| {
                if value.is_empty() {
                    key.clone()
                } else {
                    format!("{}={}", key, value)
                }
            });
        output.push_str(&join_or_dot(attributes, ";"));

        for sample in &self.source.samples {
            output.push('\t');
            let fields = sample.iter().map(|(key, value)| format!("{}={}", key, value));
            output.push_str(&join_or_dot(fields, ":"));
        }

        output
    }
}

fn allele_or_dash(allele: &str) -> &str {
    if allele.is_empty() {
        EMPTY_ALLELE
    } else {
        allele
    }
}

fn join_or_dot<I, S>(items: I, separator: &str) -> String
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for (i, item) in items.enumerate() {
        if i > 0 {
            joined.push_str(separator);
        }
        joined.push_str(item.as_ref());
    }
    if joined.is_empty() {
        joined.push('.');
    }
    joined
}
