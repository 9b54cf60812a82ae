//! VCF line tokenizer and batch decoding
//!
//! [`RawRecord::parse`] splits one data line into typed, borrowed fields.
//! [`decode_vcf`] drives a [`VariantDecoder`] over a whole file and writes
//! the resulting records as JSON Lines or TSV.

use crate::core::error::{DecodeError, DecodeResult, Result, VcfDecomposeError};
use crate::core::io::{open_input, LineIterator};
use crate::core::VariantRecord;
use crate::formats::decoder::{DecodedLine, VariantDecoder};
use memchr::memchr;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

/// CHROM, POS, ID, REF, ALT, QUAL, FILTER, INFO
pub const MIN_FIELDS: usize = 8;

/// Column index of FORMAT; samples follow it
pub const FORMAT_COLUMN: usize = 8;

/// Missing value marker
pub const MISSING_VALUE: &str = ".";

/// One VCF data line split into typed fields
///
/// Fields borrow from the input line. Missing markers are already resolved:
/// an absent ID is an empty set, an absent REF/FILTER/INFO is `""`, an absent
/// QUAL is `None`, and an absent FORMAT is an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord<'a> {
    /// The full line, without its line terminator
    pub line: &'a str,
    pub chromosome: &'a str,
    /// 1-based position
    pub position: u64,
    pub ids: BTreeSet<&'a str>,
    pub reference: &'a str,
    /// Never empty
    pub alternates: Vec<&'a str>,
    pub quality: Option<f32>,
    pub filter: &'a str,
    pub info: &'a str,
    pub format: Vec<&'a str>,
    /// Raw per-sample columns in order
    pub samples: Vec<&'a str>,
}

impl<'a> RawRecord<'a> {
    /// Tokenize a VCF data line
    ///
    /// Fails with `MalformedRecord` on fewer than 8 columns or a non-numeric
    /// POS/QUAL, and with `NotAVariant` when ALT is `.`.
    pub fn parse(line: &'a str) -> DecodeResult<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        let fields = split_fields(line);

        if fields.len() < MIN_FIELDS {
            return Err(DecodeError::malformed(format!(
                "Not enough fields provided (min {}), found {}",
                MIN_FIELDS,
                fields.len()
            )));
        }

        let chromosome = fields[0];
        let position: u64 = fields[1].parse().map_err(|_| {
            DecodeError::malformed(format!("Invalid number in field POS: '{}'", fields[1]))
        })?;

        // "." is stored as an empty set, not as a set with an empty string
        let ids = if fields[2] == MISSING_VALUE {
            BTreeSet::new()
        } else {
            fields[2].split(';').collect()
        };

        let reference = or_empty(fields[3]);

        if fields[4] == MISSING_VALUE {
            return Err(DecodeError::not_a_variant(format!(
                "Alternate allele is a '.', this is a reference position, not a variant: {}:{}:{}>{}",
                chromosome, position, reference, fields[4]
            )));
        }
        let alternates = split_alternates(fields[4]);
        if alternates.is_empty() {
            return Err(DecodeError::malformed(format!(
                "No alternate alleles in field ALT: '{}'",
                fields[4]
            )));
        }

        let quality = if fields[5] == MISSING_VALUE {
            None
        } else {
            Some(fields[5].parse::<f32>().map_err(|_| {
                DecodeError::malformed(format!("Invalid number in field QUAL: '{}'", fields[5]))
            })?)
        };

        let format = match fields.get(FORMAT_COLUMN) {
            Some(format) if *format != MISSING_VALUE => format.split(':').collect(),
            _ => Vec::new(),
        };

        let samples = fields
            .get(FORMAT_COLUMN + 1..)
            .map(|samples| samples.to_vec())
            .unwrap_or_default();

        Ok(Self {
            line,
            chromosome,
            position,
            ids,
            reference,
            alternates,
            quality,
            filter: or_empty(fields[6]),
            info: or_empty(fields[7]),
            format,
            samples,
        })
    }

    /// `chrom:pos:ref>alt` for log messages
    pub fn locus(&self, allele_index: usize) -> String {
        format!(
            "{}:{}:{}>{}",
            self.chromosome,
            self.position,
            self.reference,
            self.alternates.get(allele_index).copied().unwrap_or(MISSING_VALUE)
        )
    }
}

/// Split a line on tabs
fn split_fields(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut fields = Vec::with_capacity(10);
    let mut start = 0;

    while let Some(offset) = memchr(b'\t', &bytes[start..]) {
        fields.push(&line[start..start + offset]);
        start += offset + 1;
    }
    fields.push(&line[start..]);

    fields
}

/// Split ALT on commas, dropping trailing empty entries (`C,` is just `C`)
fn split_alternates(field: &str) -> Vec<&str> {
    let mut alternates: Vec<&str> = field.split(',').collect();
    if field.is_empty() {
        return alternates;
    }
    while alternates.last().is_some_and(|alternate| alternate.is_empty()) {
        alternates.pop();
    }
    alternates
}

#[inline]
fn or_empty(field: &str) -> &str {
    if field == MISSING_VALUE {
        ""
    } else {
        field
    }
}

/// Output encoding for decoded records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Tab-separated, see [`VariantRecord::to_tsv_line`]
    Tsv,
}

/// Batch decoding options
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Number of threads (1 = sequential)
    pub threads: usize,
    pub output_format: OutputFormat,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            output_format: OutputFormat::Json,
        }
    }
}

/// Decoding statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// Data lines seen (headers and blank lines excluded)
    pub lines: usize,
    /// Records written
    pub records: usize,
    /// Lines rejected as malformed
    pub rejected_lines: usize,
    /// Lines rejected as not being variants
    pub not_variant_lines: usize,
    /// Alleles dropped because a sample did not decode
    pub skipped_alleles: usize,
}

impl DecodeStats {
    fn record(&mut self, outcome: &DecodeResult<DecodedLine>) {
        self.lines += 1;
        match outcome {
            Ok(decoded) => {
                self.records += decoded.records.len();
                self.skipped_alleles += decoded.skipped.len();
            }
            Err(DecodeError::NotAVariant { .. }) => self.not_variant_lines += 1,
            Err(_) => self.rejected_lines += 1,
        }
    }

    fn merge(&mut self, other: &DecodeStats) {
        self.lines += other.lines;
        self.records += other.records;
        self.rejected_lines += other.rejected_lines;
        self.not_variant_lines += other.not_variant_lines;
        self.skipped_alleles += other.skipped_alleles;
    }
}

/// Chunk size for parallel processing
const CHUNK_SIZE: usize = 10000;

/// Decode a VCF file (plain, gzip or bzip2)
///
/// # Arguments
/// * `input` - Input VCF file path
/// * `output` - Output path, or `None` for stdout
/// * `decoder` - Decoder carrying the file and study identifiers
/// * `options` - Thread count and output encoding
///
/// # Returns
/// Decoding statistics
pub fn decode_vcf<P: AsRef<Path>>(
    input: P,
    output: Option<P>,
    decoder: &VariantDecoder,
    options: &DecodeOptions,
) -> Result<DecodeStats> {
    let reader = open_input(input.as_ref())?;

    match output {
        Some(path) => {
            let file = std::fs::File::create(path.as_ref())?;
            let writer = BufWriter::with_capacity(128 * 1024, file);
            decode_vcf_reader(reader, writer, decoder, options)
        }
        None => {
            let writer = BufWriter::new(std::io::stdout().lock());
            decode_vcf_reader(reader, writer, decoder, options)
        }
    }
}

/// Decode VCF lines from any reader into any writer
pub fn decode_vcf_reader<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    decoder: &VariantDecoder,
    options: &DecodeOptions,
) -> Result<DecodeStats> {
    if options.threads > 1 {
        decode_parallel(reader, writer, decoder, options)
    } else {
        decode_sequential(reader, writer, decoder, options.output_format)
    }
}

fn is_data_line(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#')
}

/// Sequential decoding (single-threaded)
fn decode_sequential<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    decoder: &VariantDecoder,
    output_format: OutputFormat,
) -> Result<DecodeStats> {
    let mut lines = LineIterator::new(reader);
    let mut stats = DecodeStats::default();

    while let Some(line) = lines.next_line() {
        let line = line?;
        if !is_data_line(line) {
            continue;
        }

        let outcome = decoder.decode_alleles(line);
        stats.record(&outcome);
        match outcome {
            Ok(decoded) => {
                decoded.log_skipped();
                for record in &decoded.records {
                    writeln!(writer, "{}", render(record, output_format)?)?;
                }
            }
            Err(e) => log::debug!("Skipping line: {}", e),
        }
    }

    writer.flush()?;
    Ok(stats)
}

/// Parallel decoding using rayon
fn decode_parallel<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    decoder: &VariantDecoder,
    options: &DecodeOptions,
) -> Result<DecodeStats> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()
        .map_err(|e| VcfDecomposeError::ThreadPool(e.to_string()))?;

    let mut data_lines = Vec::new();
    let mut lines = LineIterator::new(reader);
    while let Some(line) = lines.next_line() {
        let line = line?;
        if is_data_line(line) {
            data_lines.push(line.to_string());
        }
    }

    let output_format = options.output_format;
    let chunks: Vec<(Vec<String>, DecodeStats)> = pool.install(|| {
        data_lines
            .par_chunks(CHUNK_SIZE)
            .map(|chunk| -> Result<(Vec<String>, DecodeStats)> {
                let mut rendered = Vec::with_capacity(chunk.len());
                let mut stats = DecodeStats::default();

                for line in chunk {
                    let outcome = decoder.decode_alleles(line);
                    stats.record(&outcome);
                    match outcome {
                        Ok(decoded) => {
                            decoded.log_skipped();
                            for record in &decoded.records {
                                rendered.push(render(record, output_format)?);
                            }
                        }
                        Err(e) => log::debug!("Skipping line: {}", e),
                    }
                }

                Ok((rendered, stats))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    // Write results (maintaining chunk order)
    let mut stats = DecodeStats::default();
    for (rendered, chunk_stats) in chunks {
        for line in rendered {
            writeln!(writer, "{}", line)?;
        }
        stats.merge(&chunk_stats);
    }

    writer.flush()?;
    Ok(stats)
}

fn render(record: &VariantRecord, output_format: OutputFormat) -> Result<String> {
    Ok(match output_format {
        OutputFormat::Json => serde_json::to_string(record)?,
        OutputFormat::Tsv => record.to_tsv_line(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let line = "chr1\t12345\trs123\tA\tG\t30\tPASS\tDP=100";
        let record = RawRecord::parse(line).unwrap();

        assert_eq!(record.chromosome, "chr1");
        assert_eq!(record.position, 12345);
        assert!(record.ids.contains("rs123"));
        assert_eq!(record.reference, "A");
        assert_eq!(record.alternates, vec!["G"]);
        assert_eq!(record.quality, Some(30.0));
        assert_eq!(record.filter, "PASS");
        assert_eq!(record.info, "DP=100");
        assert!(record.format.is_empty());
        assert!(record.samples.is_empty());
    }

    #[test]
    fn test_parse_missing_markers() {
        let line = "1\t100\t.\t.\tA\t.\t.\t.\t.";
        let record = RawRecord::parse(line).unwrap();

        assert!(record.ids.is_empty());
        assert_eq!(record.reference, "");
        assert_eq!(record.quality, None);
        assert_eq!(record.filter, "");
        assert_eq!(record.info, "");
        assert!(record.format.is_empty());
    }

    #[test]
    fn test_parse_with_samples() {
        let line = "chr1\t12345\trs1;rs2\tA\tG,T\t.\t.\t.\tGT:DP\t0/1:30\t1/2:25\n";
        let record = RawRecord::parse(line).unwrap();

        assert_eq!(record.ids.len(), 2);
        assert_eq!(record.alternates, vec!["G", "T"]);
        assert_eq!(record.format, vec!["GT", "DP"]);
        assert_eq!(record.samples, vec!["0/1:30", "1/2:25"]);
        assert!(!record.line.ends_with('\n'));
    }

    #[test]
    fn test_parse_too_few_fields() {
        let result = RawRecord::parse("chr1\t12345\trs123");
        assert!(matches!(result, Err(DecodeError::MalformedRecord { .. })));
    }

    #[test]
    fn test_parse_bad_numbers() {
        let bad_pos = RawRecord::parse("chr1\tabc\t.\tA\tG\t.\t.\t.");
        assert!(matches!(bad_pos, Err(DecodeError::MalformedRecord { .. })));

        let bad_qual = RawRecord::parse("chr1\t100\t.\tA\tG\thigh\t.\t.");
        assert!(matches!(bad_qual, Err(DecodeError::MalformedRecord { .. })));
    }

    #[test]
    fn test_parse_reference_position() {
        let result = RawRecord::parse("chr1\t100\t.\tA\t.\t.\t.\t.");
        assert!(matches!(result, Err(DecodeError::NotAVariant { .. })));
    }

    #[test]
    fn test_parse_trailing_empty_alternates() {
        let record = RawRecord::parse("1\t100\t.\tA\tC,\t.\t.\t.").unwrap();
        assert_eq!(record.alternates, vec!["C"]);

        let record = RawRecord::parse("1\t100\t.\tA\tC,,T,,\t.\t.\t.").unwrap();
        assert_eq!(record.alternates, vec!["C", "", "T"]);

        let result = RawRecord::parse("1\t100\t.\tA\t,,\t.\t.\t.");
        assert!(matches!(result, Err(DecodeError::MalformedRecord { .. })));
    }

    #[test]
    fn test_locus() {
        let record = RawRecord::parse("20\t100\t.\tA\tC,T\t.\t.\t.").unwrap();
        assert_eq!(record.locus(1), "20:100:A>T");
    }

    #[test]
    fn test_decode_sequential_stats() {
        let input = "##fileformat=VCFv4.2\n\
                     #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
                     1\t100\t.\tA\tC,T\t.\t.\t.\n\
                     1\t200\t.\tA\t.\t.\t.\t.\n\
                     1\t300\t.\tA\n\
                     \n";
        let decoder = VariantDecoder::new("file", "study");
        let mut output = Vec::new();
        let stats =
            decode_vcf_reader(input.as_bytes(), &mut output, &decoder, &DecodeOptions::default())
                .unwrap();

        assert_eq!(stats.lines, 3);
        assert_eq!(stats.records, 2);
        assert_eq!(stats.not_variant_lines, 1);
        assert_eq!(stats.rejected_lines, 1);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_decode_parallel_matches_sequential() {
        let mut input = String::new();
        for i in 0..50 {
            input.push_str(&format!(
                "1\t{}\t.\tA\tC,G\t.\t.\tAC=1,2\tGT\t1/2\t0/{}\n",
                100 + i,
                if i % 7 == 0 { "x" } else { "1" }
            ));
        }
        let decoder = VariantDecoder::new("file", "study");

        let mut sequential = Vec::new();
        let options = DecodeOptions {
            threads: 1,
            output_format: OutputFormat::Tsv,
        };
        let seq_stats =
            decode_vcf_reader(input.as_bytes(), &mut sequential, &decoder, &options).unwrap();

        let mut parallel = Vec::new();
        let options = DecodeOptions {
            threads: 4,
            output_format: OutputFormat::Tsv,
        };
        let par_stats =
            decode_vcf_reader(input.as_bytes(), &mut parallel, &decoder, &options).unwrap();

        assert_eq!(seq_stats, par_stats);
        assert_eq!(sequential, parallel);
        // i = 0, 7, ..., 49 lose their second allele
        assert_eq!(seq_stats.skipped_alleles, 8);
        assert_eq!(seq_stats.records, 92);
    }
}
