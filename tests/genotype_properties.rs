//! Property-based tests for genotype remapping
//!
//! Remapping for the first alternate is the identity, remapping for any
//! alternate is a permutation of allele codes, and the chosen alternate
//! always ends up as allele 1.

use proptest::prelude::*;
use vcf_decompose::core::genotype::{map_to_multiallelic_index, remap_genotype, Genotype};

/// Generate a genotype string over `0..=max_allele` with missing calls
fn genotype_strategy(max_allele: usize) -> impl Strategy<Value = String> {
    let call = prop_oneof![
        4 => (0..=max_allele).prop_map(|a| a.to_string()),
        1 => Just(".".to_string()),
    ];
    (
        call.clone(),
        prop::collection::vec((prop::sample::select(vec!['/', '|']), call), 0..3),
    )
        .prop_map(|(first, rest)| {
            let mut genotype = first;
            for (separator, call) in rest {
                genotype.push(separator);
                genotype.push_str(&call);
            }
            genotype
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Remapping with allele index 0 returns the input unchanged
    #[test]
    fn prop_first_alternate_identity(genotype in ".{0,12}") {
        prop_assert_eq!(remap_genotype(&genotype, 0).unwrap(), genotype);
    }

    /// Valid genotypes are written back exactly as read
    #[test]
    fn prop_parse_display_round_trip(genotype in genotype_strategy(5)) {
        let parsed = Genotype::parse(&genotype).unwrap();
        prop_assert_eq!(parsed.to_string(), genotype);
    }

    /// Over alleles 0..=n, the remapping is a bijection
    #[test]
    fn prop_remap_is_permutation(alternates in 1usize..10, pick in any::<prop::sample::Index>()) {
        let allele_index = pick.index(alternates);
        let mut mapped: Vec<usize> = (0..=alternates)
            .map(|allele| map_to_multiallelic_index(allele, allele_index))
            .collect();
        mapped.sort_unstable();
        let expected: Vec<usize> = (0..=alternates).collect();
        prop_assert_eq!(mapped, expected);
    }

    /// Reference, missing calls, separators and ploidy are preserved; the
    /// chosen alternate becomes allele 1
    #[test]
    fn prop_remap_preserves_structure(
        genotype in genotype_strategy(4),
        allele_index in 0usize..4,
    ) {
        let original = Genotype::parse(&genotype).unwrap();
        let remapped = Genotype::parse(&remap_genotype(&genotype, allele_index).unwrap()).unwrap();

        prop_assert_eq!(remapped.ploidy(), original.ploidy());
        prop_assert_eq!(remapped.is_phased(), original.is_phased());

        for (before, after) in original.alleles().iter().zip(remapped.alleles()) {
            match before {
                None => prop_assert_eq!(*after, None),
                Some(0) => prop_assert_eq!(*after, Some(0)),
                Some(allele) if *allele == allele_index + 1 => prop_assert_eq!(*after, Some(1)),
                Some(_) => prop_assert_ne!(*after, Some(1)),
            }
        }
    }
}

#[cfg(test)]
mod edge_cases {
    use super::*;

    #[test]
    fn test_swap_for_second_alternate() {
        assert_eq!(remap_genotype("1/2", 1).unwrap(), "2/1");
        assert_eq!(remap_genotype("2|2", 1).unwrap(), "1|1");
    }

    #[test]
    fn test_rotation_for_third_alternate() {
        assert_eq!(remap_genotype("1/2", 2).unwrap(), "2/3");
        assert_eq!(remap_genotype("3/0", 2).unwrap(), "1/0");
        assert_eq!(remap_genotype("4/.", 2).unwrap(), "4/.");
    }
}
