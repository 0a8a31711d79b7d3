//! Alias-method sampling from a fixed discrete distribution.
//!
//! Given weights \( w_0, \dots, w_{n-1} \) summing to one, the table splits the
//! total mass into `n` columns of height \( 1/n \). Column `i` holds its own
//! category with probability `probability_mass[i]` and at most one borrowed
//! category (`alias_of[i]`) for the remainder. A draw picks a column uniformly
//! and then flips one biased coin, so sampling is O(1) after an O(n) build.
//!
//! ## References
//!
//! - Walker (1977): *An Efficient Method for Generating Discrete Random Variables
//!   with General Distributions*.
//! - Vose (1991): *A Linear Algorithm for Generating Random Numbers with a Given
//!   Distribution*.
//!
//! Notes:
//! - `sample_with_rng` (and the [`Distribution`] impl) take the generator from the
//!   caller. Seed one once and reuse it; `draw` borrows the thread-local `rand::rng()`.
//! - Any change to the distribution means building a new table.

use rand::distr::Distribution;
use rand::prelude::*;

/// Default tolerance on `|sum(weights) - 1|`.
///
/// For the stricter 1e-9 bound use `BuildOptions::new().with_tolerance(1e-9)`. At that
/// bound a sum of `0.999999999` sits on the edge and float summation may reject it.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Reasons a weight vector cannot be turned into an [`AliasTable`].
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidDistribution {
    /// No weights were supplied.
    Empty,
    /// A weight is NaN or infinite.
    NonFiniteWeight { index: usize, weight: f64 },
    /// A weight is below zero.
    NegativeWeight { index: usize, weight: f64 },
    /// The weights do not sum to one within `tolerance`.
    SumOutOfTolerance { sum: f64, tolerance: f64 },
    /// Unnormalized weights total zero or overflow to infinity.
    BadTotal(f64),
    /// The configured tolerance is negative or NaN.
    InvalidTolerance(f64),
}

impl std::fmt::Display for InvalidDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "distribution must have at least one weight"),
            Self::NonFiniteWeight { index, weight } => {
                write!(f, "weight {index} must be finite (got {weight})")
            }
            Self::NegativeWeight { index, weight } => {
                write!(f, "weight {index} must be >= 0 (got {weight})")
            }
            Self::SumOutOfTolerance { sum, tolerance } => {
                write!(f, "weights must sum to 1 within {tolerance:e} (got {sum})")
            }
            Self::BadTotal(t) => {
                write!(f, "weights must have a positive finite total (got {t})")
            }
            Self::InvalidTolerance(t) => write!(f, "tolerance must be >= 0 (got {t})"),
        }
    }
}

impl std::error::Error for InvalidDistribution {}

/// Construction settings for [`AliasTable::with_options`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    tolerance: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildOptions {
    /// Default options: [`DEFAULT_TOLERANCE`].
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Set the allowed deviation of the weight sum from one.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

/// One column of an [`AliasTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// Chance the column resolves to its own index.
    pub probability_mass: f64,
    /// Category occupying the rest of the column, if any.
    pub alias: Option<usize>,
}

/// Precomputed alias table for O(1) sampling from a discrete distribution.
///
/// Immutable once built; share it by reference across threads and give each
/// thread its own generator.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasTable {
    probability_mass: Vec<f64>,
    alias_of: Vec<Option<usize>>,
}

impl AliasTable {
    /// Build a table from weights that sum to one, using default [`BuildOptions`].
    ///
    /// ```
    /// use vose::AliasTable;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let table = AliasTable::new(&[0.2, 0.3, 0.5]).unwrap();
    /// let mut rng = ChaCha8Rng::seed_from_u64(1);
    /// assert!(table.sample_with_rng(&mut rng) < 3);
    /// ```
    pub fn new(weights: &[f64]) -> Result<Self, InvalidDistribution> {
        Self::with_options(weights, BuildOptions::default())
    }

    /// Build a table with explicit options.
    pub fn with_options(
        weights: &[f64],
        options: BuildOptions,
    ) -> Result<Self, InvalidDistribution> {
        let tolerance = options.tolerance;
        if !(tolerance >= 0.0) {
            return Err(InvalidDistribution::InvalidTolerance(tolerance));
        }

        let sum = validate_weights(weights)?;
        if (sum - 1.0).abs() > tolerance {
            return Err(InvalidDistribution::SumOutOfTolerance { sum, tolerance });
        }

        Ok(Self::build(weights))
    }

    /// Build a table from nonnegative weights with any positive total.
    ///
    /// Weights are divided by their sum first, so `[2.0, 1.0, 1.0]` behaves like
    /// `[0.5, 0.25, 0.25]`.
    pub fn from_weights(weights: &[f64]) -> Result<Self, InvalidDistribution> {
        let total = validate_weights(weights)?;
        if total <= 0.0 || !total.is_finite() {
            return Err(InvalidDistribution::BadTotal(total));
        }

        let normalized: Vec<f64> = weights.iter().map(|&w| w / total).collect();
        Ok(Self::build(&normalized))
    }

    /// Vose's construction. `weights` is already validated and non-empty.
    fn build(weights: &[f64]) -> Self {
        let n = weights.len();
        let n_f = n as f64;
        let average = 1.0 / n_f;

        let mut working = weights.to_vec();
        let mut probability_mass = vec![0.0_f64; n];
        let mut alias_of: Vec<Option<usize>> = vec![None; n];

        // Ties at `average` go to `large`.
        let mut small: Vec<usize> = Vec::with_capacity(n);
        let mut large: Vec<usize> = Vec::with_capacity(n);
        for (i, &w) in working.iter().enumerate() {
            if w < average {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        let mut clamped = 0usize;
        // Pop only while both worklists are non-empty.
        while let (Some(&less), Some(&more)) = (small.last(), large.last()) {
            small.pop();
            large.pop();

            let mass = working[less] * n_f;
            if !(0.0..=1.0).contains(&mass) {
                clamped += 1;
            }
            probability_mass[less] = mass.clamp(0.0, 1.0);
            alias_of[less] = Some(more);

            working[more] += working[less] - average;
            if working[more] < average {
                small.push(more);
            } else {
                large.push(more);
            }
        }

        // Whatever is left is full up to rounding error.
        let residue = small.len() + large.len();
        for i in small.into_iter().chain(large) {
            probability_mass[i] = 1.0;
            alias_of[i] = None;
        }

        log::debug!(
            "alias table built: n={n}, full_columns={residue}, clamped={clamped}"
        );

        Self {
            probability_mass,
            alias_of,
        }
    }

    /// Draw a category index using a caller-supplied generator.
    ///
    /// Consumes one uniform column index and one uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn sample_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let col = rng.random_range(0..self.probability_mass.len());
        let u = rng.random::<f64>();
        if u < self.probability_mass[col] {
            col
        } else {
            // `None` only appears on columns with mass 1.0, which `u` never reaches.
            self.alias_of[col].unwrap_or(col)
        }
    }

    /// Like [`sample_with_rng`](Self::sample_with_rng), but returns `None` on an
    /// empty table instead of panicking.
    ///
    /// Tables built through this crate are never empty, so this is `Some` in practice.
    pub fn try_sample_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.probability_mass.is_empty() {
            return None;
        }
        Some(self.sample_with_rng(rng))
    }

    /// Draw a category index from the thread-local generator.
    ///
    /// Not reproducible across runs; use [`sample_with_rng`](Self::sample_with_rng)
    /// with a seeded generator when that matters.
    #[inline]
    pub fn draw(&self) -> usize {
        let mut rng = rand::rng();
        self.sample_with_rng(&mut rng)
    }

    /// Number of categories (and columns).
    pub fn len(&self) -> usize {
        self.probability_mass.len()
    }

    /// Never true for tables built by this crate; construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.probability_mass.is_empty()
    }

    /// Per-column chance of keeping the column's own index.
    pub fn probability_mass(&self) -> &[f64] {
        &self.probability_mass
    }

    /// Per-column borrowed category.
    pub fn alias_of(&self) -> &[Option<usize>] {
        &self.alias_of
    }

    /// Column `index`, or `None` when out of range.
    pub fn column(&self, index: usize) -> Option<Column> {
        Some(Column {
            probability_mass: *self.probability_mass.get(index)?,
            alias: self.alias_of[index],
        })
    }

    /// Probability the table assigns to category `index`.
    ///
    /// Recomputed from the columns in O(n). Matches the input weight up to floating
    /// rounding.
    pub fn marginal(&self, index: usize) -> Option<f64> {
        let own = *self.probability_mass.get(index)?;
        let borrowed: f64 = self
            .alias_of
            .iter()
            .zip(&self.probability_mass)
            .filter(|(alias, _)| **alias == Some(index))
            .map(|(_, &mass)| 1.0 - mass)
            .sum();
        Some((own + borrowed) / self.len() as f64)
    }
}

impl Distribution<usize> for AliasTable {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sample_with_rng(rng)
    }
}

/// Check each weight and return the sum.
fn validate_weights(weights: &[f64]) -> Result<f64, InvalidDistribution> {
    if weights.is_empty() {
        return Err(InvalidDistribution::Empty);
    }

    let mut sum = 0.0;
    for (index, &weight) in weights.iter().enumerate() {
        if !weight.is_finite() {
            return Err(InvalidDistribution::NonFiniteWeight { index, weight });
        }
        if weight < 0.0 {
            return Err(InvalidDistribution::NegativeWeight { index, weight });
        }
        sum += weight;
    }
    Ok(sum)
}
