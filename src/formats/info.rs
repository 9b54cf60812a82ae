//! INFO redistribution across decomposed records
//!
//! Per-allele lists (`ACC`, `AC`, `AF`) keep only the value of the alternate
//! being built. `NS`, `DP`, `MQ` and `MQ0` are recomputed from the samples
//! of the record.
//! Any other key is copied verbatim into every record.

use crate::core::{SampleData, SourceEntry};

/// Attribute holding the original VCF line
pub const SOURCE_LINE_KEY: &str = "src";

pub const QUALITY_KEY: &str = "QUAL";

pub const FILTER_KEY: &str = "FILTER";

/// Redistribute the INFO column into `source.attributes` for `allele_index`.
///
/// Recomputed keys read `source.samples`, so samples must be parsed first.
pub fn redistribute_info(source: &mut SourceEntry, info: &str, allele_index: usize) {
    for entry in info.split(';').filter(|entry| !entry.is_empty()) {
        let Some((key, value)) = entry.split_once('=') else {
            // Flag without value
            source.add_attribute(entry, "");
            continue;
        };

        match key {
            "ACC" | "AC" | "AF" => match value.split(',').nth(allele_index) {
                Some(allele_value) => source.add_attribute(key, allele_value),
                None => log::warn!(
                    "INFO {}={} has no value for alternate {}, key skipped",
                    key,
                    value,
                    allele_index
                ),
            },
            "NS" => {
                let samples = source.samples.len();
                source.add_attribute(key, samples.to_string());
            }
            "DP" => {
                let depth = total_depth(&source.samples);
                source.add_attribute(key, depth.to_string());
            }
            "MQ" | "MQ0" => {
                let (mq, mq0) = mapping_quality(&source.samples);
                source.add_attribute("MQ", mq.to_string());
                source.add_attribute("MQ0", mq0.to_string());
            }
            _ => source.add_attribute(key, value),
        }
    }
}

/// Add the attributes that do not depend on INFO: `QUAL`, `FILTER` and `src`.
pub fn add_record_attributes(
    source: &mut SourceEntry,
    line: &str,
    quality: Option<f32>,
    filter: &str,
) {
    if let Some(quality) = quality {
        source.add_attribute(QUALITY_KEY, format_quality(quality));
    }
    if !filter.is_empty() {
        source.add_attribute(FILTER_KEY, filter);
    }
    source.add_attribute(SOURCE_LINE_KEY, line);
}

/// Render a quality score the way a Java `float` prints
///
/// Plain decimal with at least one fractional digit for magnitudes in
/// `[1e-3, 1e7)` and for zero (`30.0`, `0.5`), scientific otherwise
/// (`1.0E-4`, `1.5E7`).
pub fn format_quality(quality: f32) -> String {
    if quality.is_nan() {
        return "NaN".to_string();
    }
    if quality.is_infinite() {
        return if quality > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = quality.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let mut text = quality.to_string();
        if !text.contains('.') {
            text.push_str(".0");
        }
        return text;
    }

    let text = format!("{:e}", quality);
    match text.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            format!("{}E{}", mantissa, exponent)
        }
        Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
        None => text,
    }
}

/// Parse a non-negative integer written with digits only
fn parse_count(value: Option<&String>) -> Option<u64> {
    let value = value?;
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Sum of the numeric per-sample `DP` values
fn total_depth(samples: &[SampleData]) -> u64 {
    samples
        .iter()
        .filter_map(|sample| parse_count(sample.get("DP")))
        .fold(0u64, |acc, dp| acc.saturating_add(dp))
}

/// Sum of squared per-sample `GQ` values and the number of samples with `GQ == 0`
fn mapping_quality(samples: &[SampleData]) -> (u64, u64) {
    samples
        .iter()
        .filter_map(|sample| parse_count(sample.get("GQ")))
        .fold((0u64, 0u64), |(mq, mq0), gq| {
            (
                mq.saturating_add(gq.saturating_mul(gq)),
                mq0 + u64::from(gq == 0),
            )
        })
}
