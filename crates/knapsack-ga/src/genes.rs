//! Gene vector operations for the genetic algorithm.
//!
//! A gene vector is a `[Gene]` whose position `i` decides whether catalog item
//! `i` goes into the knapsack. These functions are the building blocks used by
//! [`Individual`](crate::genetic::Individual):
//!
//! - **Initialization**: [`random`] draws each gene uniformly
//! - **Crossover**: [`exchange`] swaps genes between two vectors at random positions
//! - **Mutation**: [`flip`] complements genes at random positions
//!
//! Every draw goes through a [`RandomSource`], so all three are deterministic
//! under a scripted source.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// A single binary decision: is the item at this position in the knapsack?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Gene {
    Excluded,
    Included,
}

impl Gene {
    #[must_use]
    pub fn is_included(self) -> bool {
        self == Gene::Included
    }

    /// Returns the complementary gene.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Gene::Excluded => Gene::Included,
            Gene::Included => Gene::Excluded,
        }
    }
}

impl From<Gene> for u8 {
    fn from(gene: Gene) -> Self {
        match gene {
            Gene::Excluded => 0,
            Gene::Included => 1,
        }
    }
}

impl From<bool> for Gene {
    fn from(included: bool) -> Self {
        if included {
            Gene::Included
        } else {
            Gene::Excluded
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid gene value {value}, expected 0 or 1")]
pub struct InvalidGeneError {
    pub value: u8,
}

impl TryFrom<u8> for Gene {
    type Error = InvalidGeneError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Gene::Excluded),
            1 => Ok(Gene::Included),
            _ => Err(InvalidGeneError { value }),
        }
    }
}

/// Builds a gene vector from 0/1 values.
///
/// # Examples
///
/// ```
/// use knapsack_ga::genes::{self, Gene};
///
/// let genes = genes::from_bits(&[1, 0]).unwrap();
/// assert_eq!(genes, vec![Gene::Included, Gene::Excluded]);
/// assert!(genes::from_bits(&[2]).is_err());
/// ```
pub fn from_bits(bits: &[u8]) -> Result<Vec<Gene>, InvalidGeneError> {
    bits.iter().map(|&bit| Gene::try_from(bit)).collect()
}

/// Generates `len` genes, each drawn independently and uniformly.
pub fn random<R>(rng: &mut R, len: usize) -> Vec<Gene>
where
    R: RandomSource + ?Sized,
{
    (0..len).map(|_| Gene::from(rng.below(2) == 1)).collect()
}

/// Swaps genes between `a` and `b` at randomly chosen positions.
///
/// Draws an exchange count in `[0, max_genes]`, then for each exchange a
/// position in `[0, len)`. Swapping the same position twice restores it.
///
/// # Panics
///
/// Panics if the vectors have different lengths.
pub fn exchange<R>(a: &mut [Gene], b: &mut [Gene], max_genes: usize, rng: &mut R)
where
    R: RandomSource + ?Sized,
{
    assert_eq!(a.len(), b.len());
    let count = rng.below(max_genes + 1);
    if a.is_empty() {
        return;
    }
    for _ in 0..count {
        let i = rng.below(a.len());
        std::mem::swap(&mut a[i], &mut b[i]);
    }
}

/// Flips genes at randomly chosen positions.
///
/// Draws a flip count in `[0, max_flips)`, then for each flip a position in
/// `[0, len)`. Nothing is drawn when `max_flips` is zero.
pub fn flip<R>(genes: &mut [Gene], max_flips: usize, rng: &mut R)
where
    R: RandomSource + ?Sized,
{
    if max_flips == 0 {
        return;
    }
    let count = rng.below(max_flips);
    if genes.is_empty() {
        return;
    }
    for _ in 0..count {
        let i = rng.below(genes.len());
        genes[i] = genes[i].flipped();
    }
}
