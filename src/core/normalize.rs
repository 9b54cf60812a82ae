//! Allele normalization
//!
//! Reduces a (reference, alternate) pair to its minimal representation.
//! Trailing shared bases are removed first, then leading ones, which puts
//! indels on the leftmost anchor in the same way Ensembl VEP reports them:
//! <http://www.ensembl.org/info/docs/tools/vep/vep_formats.html#vcf>

use crate::core::error::{DecodeError, DecodeResult};

/// Minimal representation of one alternate allele of a VCF record
///
/// `start` and `end` are 1-based and inclusive. For insertions the pair may
/// describe an empty span on the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAllele {
    pub start: u64,
    pub end: u64,
    pub reference: String,
    pub alternate: String,
    /// 0-based position of the allele in the original ALT column
    pub allele_index: usize,
}

/// Number of trailing characters shared by `a` and `b`, in bytes
fn common_suffix_bytes(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}

/// Number of leading characters shared by `a` and `b`, as (chars, bytes)
fn common_prefix(a: &str, b: &str) -> (usize, usize) {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .fold((0, 0), |(chars, bytes), (x, _)| (chars + 1, bytes + x.len_utf8()))
}

/// Calculate the start, end, reference and alternate of a variant whose
/// reference and alternate differ.
///
/// The suffix is trimmed before the span length is measured, and the span
/// length is measured before the prefix is trimmed: the prefix length is
/// already accounted for by `start`.
///
/// # Examples
/// ```
/// use vcf_decompose::core::normalize::normalize_suffix_first;
///
/// let allele = normalize_suffix_first(100, "A", "AGG").unwrap();
/// assert_eq!((allele.start, allele.end), (101, 102));
/// assert_eq!(allele.reference, "");
/// assert_eq!(allele.alternate, "GG");
/// ```
pub fn normalize_suffix_first(
    position: u64,
    reference: &str,
    alternate: &str,
) -> DecodeResult<NormalizedAllele> {
    if reference == alternate {
        return Err(DecodeError::not_a_variant(format!(
            "reference and alternate at {} are identical: {}",
            position, alternate
        )));
    }

    // Remove the trailing bases
    let suffix = common_suffix_bytes(reference, alternate);
    let reference = &reference[..reference.len() - suffix];
    let alternate = &alternate[..alternate.len() - suffix];

    let length = reference.chars().count().max(alternate.chars().count()) as u64;
    // end is inclusive
    let end = match length.checked_sub(1) {
        Some(span) => offset_position(position, span)?,
        None => position.saturating_sub(1),
    };

    // Remove the leading bases
    let (prefix_chars, prefix_bytes) = common_prefix(reference, alternate);

    Ok(NormalizedAllele {
        start: offset_position(position, prefix_chars as u64)?,
        end,
        reference: reference[prefix_bytes..].to_string(),
        alternate: alternate[prefix_bytes..].to_string(),
        allele_index: 0,
    })
}

fn offset_position(position: u64, offset: u64) -> DecodeResult<u64> {
    position.checked_add(offset).ok_or_else(|| {
        DecodeError::malformed(format!(
            "Position {} is too large for an allele spanning {} more bases",
            position, offset
        ))
    })
}

/// Normalize every alternate of a record against the shared reference.
///
/// The result is parallel to `alternates`: element `i` carries
/// `allele_index == i`. The input is left untouched. Fails on the first
/// alternate that equals the reference.
pub fn normalize_alternates<S: AsRef<str>>(
    position: u64,
    reference: &str,
    alternates: &[S],
) -> DecodeResult<Vec<NormalizedAllele>> {
    alternates
        .iter()
        .enumerate()
        .map(|(allele_index, alternate)| {
            normalize_suffix_first(position, reference, alternate.as_ref()).map(|allele| {
                NormalizedAllele {
                    allele_index,
                    ..allele
                }
            })
        })
        .collect()
}

/// Every normalized alternate except the one at `allele_index`, in original order
pub fn secondary_alternates(allele_index: usize, alleles: &[NormalizedAllele]) -> Vec<String> {
    alleles
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != allele_index)
        .map(|(_, allele)| allele.alternate.clone())
        .collect()
}
