//! Deduplication and uniform sampling without replacement.
//!
//! The sampler works on the *unique-record universe*: the filtered records with
//! duplicates (by [`Record::key`]) removed, first occurrence winning. From that
//! universe it draws exactly `n` records using a partial Fisher-Yates shuffle
//! over an index vector, so every unique record is selected with probability
//! `n / unique`.
//!
//! Ordering of the outputs:
//! - `selected` comes out in draw order.
//! - `remaining` keeps the universe's first-occurrence order.
//!
//! ```
//! use usamplex::record::Record;
//! use usamplex::sampler::Sampler;
//! use std::num::NonZeroUsize;
//!
//! let records: Vec<Record> = ["a,1\n", "b,2\n", "a,1\n", "c,3\n"]
//!     .into_iter()
//!     .map(Record::line)
//!     .collect();
//!
//! let mut sampler = Sampler::seeded(7);
//! let result = sampler.sample(records, NonZeroUsize::new(2).unwrap())?;
//! assert_eq!(result.selected.len(), 2);
//! assert_eq!(result.remaining.len(), 1);
//! # Ok::<(), usamplex::error::ExtractError>(())
//! ```

use crate::error::{ExtractError, Result};
use crate::record::Record;
use rand::{Rng, SeedableRng as _};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::num::NonZeroUsize;

/// Two disjoint partitions of the unique-record universe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    pub selected: Vec<Record>,
    pub remaining: Vec<Record>,
}

impl SelectionResult {
    /// Size of the universe the selection was drawn from.
    pub fn universe_len(&self) -> usize {
        self.selected.len() + self.remaining.len()
    }
}

/// Drop records whose key was already seen, keeping first occurrences in order.
pub fn deduplicate(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.key().to_owned()))
        .collect()
}

/// Indices of `n` distinct positions out of `0..len`, in draw order.
///
/// Partial Fisher-Yates: after step `i` the prefix `0..=i` holds a uniform
/// random `i + 1`-subset of the population.
pub fn draw_indices<R: Rng + ?Sized>(rng: &mut R, len: usize, n: usize) -> Vec<usize> {
    let n = n.min(len);
    let mut indices: Vec<usize> = (0..len).collect();
    for i in 0..n {
        let j = rng.gen_range(i..len);
        indices.swap(i, j);
    }
    indices.truncate(n);
    indices
}

/// Random sampler over a unique-record universe.
#[derive(Debug, Clone)]
pub struct Sampler<R = ChaCha8Rng> {
    rng: R,
}

impl Sampler<ChaCha8Rng> {
    /// Sampler seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_entropy())
    }

    /// Reproducible sampler for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is given, entropy-backed otherwise.
    pub fn with_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl<R: Rng> Sampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Deduplicate `records`, check there are at least `n` of them and split
    /// the universe into `n` selected and the rest.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InsufficientRecords`] when fewer than `n` unique
    /// records are available. Nothing is drawn in that case.
    pub fn sample(&mut self, records: Vec<Record>, n: NonZeroUsize) -> Result<SelectionResult> {
        let universe = deduplicate(records);
        let requested = n.get();

        if universe.len() < requested {
            return Err(ExtractError::InsufficientRecords {
                unique: universe.len(),
                requested,
            });
        }

        let picks = draw_indices(&mut self.rng, universe.len(), requested);

        // Move picked records out; whatever is left stays in universe order
        let mut slots: Vec<Option<Record>> = universe.into_iter().map(Some).collect();
        let selected: Vec<Record> = picks
            .iter()
            .filter_map(|&i| slots.get_mut(i).and_then(Option::take))
            .collect();
        let remaining: Vec<Record> = slots.into_iter().flatten().collect();

        log::debug!(
            "Sampled {} of {} unique records ({} remaining)",
            selected.len(),
            selected.len() + remaining.len(),
            remaining.len()
        );

        Ok(SelectionResult {
            selected,
            remaining,
        })
    }
}
