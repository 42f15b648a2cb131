// Copyright (C) 2020-2026 Andy Kurnia.

use super::float::StatFloat;

// weighted count, mean, and sum of squared deviations from the mean.
// acc_var is not the variance, it must be divided by weight or weight - 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParallelVariance<F> {
    weight: F, // non-negative, may be fractional after decay
    mean: F,
    acc_var: F,
}

impl<F: StatFloat> Default for ParallelVariance<F> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<F: StatFloat> ParallelVariance<F> {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            weight: F::zero(),
            mean: F::zero(),
            acc_var: F::zero(),
        }
    }

    #[inline(always)]
    pub fn from_parts(weight: F, mean: F, acc_var: F) -> Self {
        Self {
            weight,
            mean,
            acc_var,
        }
    }

    // one sample has no spread.
    #[inline(always)]
    pub fn singleton(value: F, weight: F) -> Self {
        Self::from_parts(weight, value, F::zero())
    }

    // https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance#Parallel_algorithm
    // (Chan et al.)
    // large weights lose precision in the mean, acceptable for display.
    #[inline(always)]
    pub fn combine(a: &Self, b: &Self) -> Self {
        let weight = a.weight + b.weight;
        if weight == F::zero() {
            // this branch is predictable
            return Self::from_parts(weight, a.mean, a.acc_var + b.acc_var);
        }
        let delta = b.mean - a.mean;
        Self {
            weight,
            mean: a.mean + delta * (b.weight / weight),
            acc_var: a.acc_var + b.acc_var + (delta * delta) * (a.weight * b.weight / weight),
        }
    }

    #[inline(always)]
    pub fn merge(&mut self, other: &Self) {
        *self = Self::combine(self, other);
    }

    // scales prior weight, the mean is not affected.
    #[inline(always)]
    pub fn scaled(&self, multiplier: F) -> Self {
        Self::from_parts(self.weight * multiplier, self.mean, self.acc_var * multiplier)
    }

    #[inline(always)]
    pub fn weight(&self) -> F {
        self.weight
    }

    #[inline(always)]
    pub fn mean(&self) -> F {
        self.mean
    }

    #[inline(always)]
    pub fn acc_var(&self) -> F {
        self.acc_var
    }

    // 0 when there is no weight. never negative.
    #[inline(always)]
    pub fn population_variance(&self) -> F {
        if self.weight > F::zero() {
            (self.acc_var / self.weight).max(F::zero())
        } else {
            F::zero()
        }
    }

    // 0 unless weight exceeds 1. never negative.
    #[inline(always)]
    pub fn sample_variance(&self) -> F {
        if self.weight > F::one() {
            (self.acc_var / (self.weight - F::one())).max(F::zero())
        } else {
            F::zero()
        }
    }

    #[inline(always)]
    pub fn standard_deviation(&self) -> F {
        self.population_variance().sqrt()
    }
}

impl<F: StatFloat> Extend<F> for ParallelVariance<F> {
    fn extend<I: IntoIterator<Item = F>>(&mut self, iter: I) {
        for value in iter {
            self.merge(&Self::singleton(value, F::one()));
        }
    }
}

impl<F: StatFloat> FromIterator<F> for ParallelVariance<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut ret = Self::new();
        ret.extend(iter);
        ret
    }
}
