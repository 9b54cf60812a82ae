//! Genotype parsing and multiallelic index remapping
//!
//! When a record with alternates `A1,A2,...` is split into one record per
//! alternate, the record built for alternate `i` must address that alternate
//! as allele `1`. Lower-numbered alternates shift up by one to make room and
//! higher-numbered alternates keep their code. The reference (`0`) and
//! missing calls (`.`) never change.

use crate::core::error::{GenotypeError, GenotypeResult};
use std::fmt;

/// Unphased allele separator
pub const UNPHASED: char = '/';

/// Phased allele separator
pub const PHASED: char = '|';

/// Missing allele call
pub const MISSING: &str = ".";

/// A parsed genotype such as `0/1`, `1|2` or `./.`
///
/// Separators are kept per call boundary so a genotype is written back
/// exactly as it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype {
    /// Allele calls in order; `None` for a missing call
    alleles: Vec<Option<usize>>,
    /// `separators[i]` sits between `alleles[i]` and `alleles[i + 1]`
    separators: Vec<char>,
}

impl Genotype {
    /// Parse a genotype string.
    ///
    /// Every call must be a non-negative integer or `.`.
    pub fn parse(genotype: &str) -> GenotypeResult<Self> {
        if genotype.is_empty() {
            return Err(GenotypeError::Empty);
        }

        let alleles = genotype
            .split([UNPHASED, PHASED])
            .map(|call| parse_call(genotype, call))
            .collect::<GenotypeResult<Vec<_>>>()?;
        let separators = genotype
            .chars()
            .filter(|c| *c == UNPHASED || *c == PHASED)
            .collect();

        Ok(Self { alleles, separators })
    }

    /// Allele calls in order, `None` for missing
    pub fn alleles(&self) -> &[Option<usize>] {
        &self.alleles
    }

    /// Number of allele calls (ploidy)
    pub fn ploidy(&self) -> usize {
        self.alleles.len()
    }

    /// True when every call boundary is phased
    pub fn is_phased(&self) -> bool {
        !self.separators.is_empty() && self.separators.iter().all(|s| *s == PHASED)
    }

    /// Rewrite allele codes so that alternate `allele_index` (0-based) becomes allele 1
    pub fn remap(&self, allele_index: usize) -> Self {
        Self {
            alleles: self
                .alleles
                .iter()
                .map(|call| call.map(|allele| map_to_multiallelic_index(allele, allele_index)))
                .collect(),
            separators: self.separators.clone(),
        }
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, call) in self.alleles.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", self.separators[i - 1])?;
            }
            match call {
                Some(allele) => write!(f, "{}", allele)?,
                None => f.write_str(MISSING)?,
            }
        }
        Ok(())
    }
}

fn parse_call(genotype: &str, call: &str) -> GenotypeResult<Option<usize>> {
    if call == MISSING {
        return Ok(None);
    }
    if call.is_empty() || !call.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_call(genotype, call));
    }
    call.parse()
        .map(Some)
        .map_err(|_| invalid_call(genotype, call))
}

fn invalid_call(genotype: &str, call: &str) -> GenotypeError {
    GenotypeError::InvalidCall {
        genotype: genotype.to_string(),
        call: call.to_string(),
    }
}

/// Map an allele code read from the file to its code in the record built for
/// alternate `allele_index` (0-based).
///
/// With `allele_index == 1`, `A1` and `A2` swap; with `allele_index == 2`,
/// `A3` becomes `A1`, `A1` becomes `A2` and `A2` becomes `A3`. The reference
/// and alternates above `allele_index + 1` are unchanged.
///
/// # Examples
/// ```
/// use vcf_decompose::core::genotype::map_to_multiallelic_index;
///
/// assert_eq!(map_to_multiallelic_index(2, 1), 1);
/// assert_eq!(map_to_multiallelic_index(1, 1), 2);
/// assert_eq!(map_to_multiallelic_index(3, 1), 3);
/// assert_eq!(map_to_multiallelic_index(0, 1), 0);
/// ```
#[inline]
pub fn map_to_multiallelic_index(allele: usize, allele_index: usize) -> usize {
    let primary = allele_index + 1;
    if allele == 0 || allele > primary {
        allele
    } else if allele == primary {
        1
    } else {
        allele + 1
    }
}

/// Remap a genotype string for alternate `allele_index`.
///
/// For the first alternate the string is returned verbatim without being
/// parsed; otherwise it must be a valid genotype.
pub fn remap_genotype(genotype: &str, allele_index: usize) -> GenotypeResult<String> {
    if allele_index == 0 {
        return Ok(genotype.to_string());
    }
    Ok(Genotype::parse(genotype)?.remap(allele_index).to_string())
}
