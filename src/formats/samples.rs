//! Per-sample column decoding
//!
//! Each sample column is split on `:` and paired with the FORMAT keys.
//! Samples may drop trailing keys (only GT is mandatory), so pairing stops
//! at the sample's own field count. The genotype is remapped for the
//! alternate being built; every other value is copied as-is.

use crate::core::error::{DecodeError, DecodeResult};
use crate::core::genotype::remap_genotype;
use crate::core::SampleData;

/// FORMAT key holding the genotype
pub const GENOTYPE_KEY: &str = "GT";

/// Decode all sample columns of a record for alternate `allele_index`.
///
/// Fails with `NonStandardSampleField` when a sample has more fields than
/// FORMAT declares, or when its genotype cannot be remapped.
pub fn parse_samples(
    format: &[&str],
    samples: &[&str],
    allele_index: usize,
) -> DecodeResult<Vec<SampleData>> {
    samples
        .iter()
        .enumerate()
        .map(|(sample, column)| parse_sample(format, sample, column, allele_index))
        .collect()
}

fn parse_sample(
    format: &[&str],
    sample: usize,
    column: &str,
    allele_index: usize,
) -> DecodeResult<SampleData> {
    let mut fields: Vec<&str> = column.split(':').collect();
    // trailing empty fields carry nothing ("0/1:" is "0/1")
    while fields.len() > 1 && fields.last() == Some(&"") {
        fields.pop();
    }

    if fields.len() > format.len() {
        return Err(DecodeError::NonStandardSampleField {
            sample,
            message: format!(
                "sample has {} fields but FORMAT declares {}: '{}'",
                fields.len(),
                format.len(),
                column
            ),
        });
    }

    let mut data = SampleData::new();
    for (key, value) in format.iter().zip(fields) {
        let value = if key.eq_ignore_ascii_case(GENOTYPE_KEY) {
            remap_genotype(value, allele_index).map_err(|e| DecodeError::NonStandardSampleField {
                sample,
                message: e.to_string(),
            })?
        } else {
            value.to_string()
        };
        data.insert(key.to_string(), value);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_samples_keys_sorted() {
        let samples = parse_samples(&["GT", "DP", "AD"], &["0/1:30:10,20"], 0).unwrap();
        let keys: Vec<&str> = samples[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["AD", "DP", "GT"]);
        assert_eq!(samples[0]["DP"], "30");
    }

    #[test]
    fn test_trailing_keys_may_be_omitted() {
        let samples = parse_samples(&["GT", "DP", "GQ"], &["0/1:30", "1/1"], 0).unwrap();
        assert_eq!(samples[0].len(), 2);
        assert_eq!(samples[1].len(), 1);
        assert!(!samples[1].contains_key("DP"));
    }

    #[test]
    fn test_trailing_empty_field_ignored() {
        let samples = parse_samples(&["GT"], &["0/1:"], 0).unwrap();
        assert_eq!(samples[0]["GT"], "0/1");
    }

    #[test]
    fn test_genotype_remapped() {
        let samples = parse_samples(&["GT", "DP"], &["1/2:7", "0|1:3"], 1).unwrap();
        assert_eq!(samples[0]["GT"], "2/1");
        assert_eq!(samples[1]["GT"], "0|2");
        assert_eq!(samples[0]["DP"], "7");
    }

    #[test]
    fn test_genotype_key_case_insensitive() {
        let samples = parse_samples(&["gt"], &["1/2"], 1).unwrap();
        assert_eq!(samples[0]["gt"], "2/1");
    }

    #[test]
    fn test_too_many_fields() {
        let result = parse_samples(&["GT"], &["0/1", "0/1:30"], 0);
        assert!(matches!(
            result,
            Err(DecodeError::NonStandardSampleField { sample: 1, .. })
        ));
    }

    #[test]
    fn test_samples_without_format() {
        let result = parse_samples(&[], &["0/1"], 0);
        assert!(matches!(
            result,
            Err(DecodeError::NonStandardSampleField { sample: 0, .. })
        ));
    }

    #[test]
    fn test_bad_genotype_only_fails_when_remapped() {
        assert!(parse_samples(&["GT"], &["0/1", "./x"], 0).is_ok());
        let result = parse_samples(&["GT"], &["0/1", "./x"], 1);
        assert!(matches!(
            result,
            Err(DecodeError::NonStandardSampleField { sample: 1, .. })
        ));
    }

    #[test]
    fn test_no_samples() {
        assert!(parse_samples(&["GT"], &[], 2).unwrap().is_empty());
    }
}
