//! Random picks without replacement against a rolling set of already shown ids.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::models::MovieSummary;

pub const SAMPLE_SIZE: usize = 3;

/// Ids already shown in this session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(HashSet<u64>);

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u64> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<u64> for ExclusionSet {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

#[derive(Debug, Clone)]
pub struct Draw {
    pub chosen: Vec<MovieSummary>,
    pub exclusions: ExclusionSet,
    /// The previous exclusions were discarded because too few candidates were left.
    pub reset: bool,
}

/// Draws `k` movies uniformly at random. Candidates are the pool minus `exclusions`;
/// when fewer than `k` remain the exclusions are dropped and the whole pool is used.
/// A pool smaller than `k` yields everything it has.
pub fn sample<R: Rng + ?Sized>(
    pool: &[MovieSummary],
    exclusions: ExclusionSet,
    k: usize,
    rng: &mut R,
) -> Draw {
    let mut candidates: Vec<&MovieSummary> =
        pool.iter().filter(|m| !exclusions.contains(m.id)).collect();

    let (mut exclusions, reset) = if candidates.len() < k {
        candidates = pool.iter().collect();
        (ExclusionSet::new(), true)
    } else {
        (exclusions, false)
    };

    candidates.shuffle(rng);
    let chosen: Vec<MovieSummary> = candidates.into_iter().take(k).cloned().collect();
    exclusions.extend(chosen.iter().map(|m| m.id));

    Draw {
        chosen,
        exclusions,
        reset,
    }
}
