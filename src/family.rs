//! The enumeration families of the data model (SPEC_FULL.md §3 "Index
//! tuple `z`"): combinations/permutations crossed with
//! {no repetition, with repetition, multiset}.

/// Which lexicographic family a request resolves to. Partition families
/// are handled separately by `partition::design::PartitionDesign`, which
/// dispatches its own dedicated counters/enumerators once a constraint is
/// recognised as an integer partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    CombinationsNoRep,
    CombinationsRep,
    PermutationsNoRep,
    PermutationsRep,
    MultisetCombinations,
    /// Width equals the size of the expanded multiset: every arrangement
    /// of the whole multiset.
    MultisetPermutationsFull,
    /// Width less than the size of the expanded multiset.
    MultisetPermutationsPartial,
}

impl Family {
    pub fn is_combination(self) -> bool {
        matches!(
            self,
            Family::CombinationsNoRep | Family::CombinationsRep | Family::MultisetCombinations
        )
    }

    pub fn is_multiset(self) -> bool {
        matches!(
            self,
            Family::MultisetCombinations
                | Family::MultisetPermutationsFull
                | Family::MultisetPermutationsPartial
        )
    }

    pub fn allows_repeated_indices(self) -> bool {
        matches!(self, Family::CombinationsRep | Family::PermutationsRep)
    }
}
