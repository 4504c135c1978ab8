//! Randomness provider shared by every genetic operator.
//!
//! All stochastic decisions in this crate (initialization, roulette draws,
//! parent shuffling, crossover and mutation indices) go through a single
//! [`RandomSource`]. Operators take it as an explicit `&mut R` argument so a
//! caller can swap the production source for a deterministic one.
//!
//! # Sources
//!
//! - [`RngSource::from_os_rng`] - `StdRng` seeded from the operating system.
//!   `StdRng` is a ChaCha-based CSPRNG, so roulette draws are not biased by a
//!   weak generator.
//! - [`RngSource::seeded`] - `Pcg32` seeded from a `u64`, for reproducible runs.

use rand::{Rng, SeedableRng as _, rngs::StdRng};
use rand_pcg::Pcg32;

/// A source of uniformly distributed indices.
pub trait RandomSource {
    /// Returns a uniformly distributed integer in `0..bound`.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `bound` is zero.
    fn below(&mut self, bound: usize) -> usize;
}

impl<S> RandomSource for &mut S
where
    S: RandomSource + ?Sized,
{
    fn below(&mut self, bound: usize) -> usize {
        (**self).below(bound)
    }
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R> RngSource<R>
where
    R: Rng,
{
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Creates a cryptographically strong source seeded from the OS.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl RngSource<Pcg32> {
    /// Creates a reproducible source from a seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }
}

impl<R> RandomSource for RngSource<R>
where
    R: Rng,
{
    fn below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be non-zero");
        self.rng.random_range(0..bound)
    }
}

/// Shuffles `items` in place (Fisher-Yates) using only [`RandomSource::below`].
pub fn shuffle<T, R>(items: &mut [T], rng: &mut R)
where
    R: RandomSource + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

/// Replays a fixed sequence of draws.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedSource {
    draws: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new<I>(draws: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.draws.len()
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn below(&mut self, bound: usize) -> usize {
        let draw = self.draws.pop_front().expect("scripted draws exhausted");
        assert!(draw < bound, "scripted draw {draw} out of range 0..{bound}");
        draw
    }
}
