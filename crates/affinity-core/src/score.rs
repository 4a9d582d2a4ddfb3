//! Weighted pairwise similarity.
//!
//! Every dimension contributes `weight * overlap * normalizer` to a pair's score, and the sum is
//! compared against the largest score the current catalog and population size allow:
//!
//! | dimension   | overlap                        | normalizer | maximum      |
//! |-------------|--------------------------------|------------|--------------|
//! | connected   | 1 if directly connected        | N          | `w * N`      |
//! | connections | shared connections             | N          | `w * N * N`  |
//! | departments | shared departments             | D          | `w * D * D`  |
//! | interests   | shared interests               | 1          | `w * I`      |
//! | locations   | 1 if the location is the same  | L          | `w * L`      |
//!
//! where N is the population size, D the department count, I the interest count over all
//! categories and L the location count.

use crate::entity::{Catalog, Entity};
use crate::error::{Error, Result};
use crate::population::Population;
use crate::weights::Weights;
use serde::Serialize;

/// Per-dimension share of a pair's score, before normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributions {
    pub connected: f64,
    pub connections: f64,
    pub departments: f64,
    pub interests: f64,
    pub locations: f64,
}

impl Contributions {
    pub fn total(&self) -> f64 {
        self.connected + self.connections + self.departments + self.interests + self.locations
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scorer {
    weights: Weights,
    population: f64,
    departments: f64,
    interests: f64,
    locations: f64,
    maximum: f64,
}

impl Scorer {
    /// Fixes the normalizers for the current catalog, population size and weights.
    ///
    /// Any change to one of those requires a new scorer.
    pub fn new(catalog: &Catalog, population: &Population, weights: &Weights) -> Result<Self> {
        if population.len() < 2 {
            return Err(Error::PopulationTooSmall {
                size: population.len(),
            });
        }
        let n = population.len() as f64;
        let d = catalog.department_count() as f64;
        let i = catalog.interest_count() as f64;
        let l = catalog.location_count() as f64;

        let maximum = weights.connected * n
            + weights.connections * n * n
            + weights.departments * d * d
            + weights.interests * i
            + weights.locations * l;
        if !(maximum.is_finite() && maximum > 0.0) {
            return Err(Error::DegenerateNormalizer { maximum });
        }

        tracing::debug!(
            population = population.len(),
            departments = catalog.department_count(),
            interests = catalog.interest_count(),
            locations = catalog.location_count(),
            maximum,
            "similarity scorer rebuilt"
        );
        Ok(Self {
            weights: *weights,
            population: n,
            departments: d,
            interests: i,
            locations: l,
            maximum,
        })
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Largest attainable score; the denominator of [`Scorer::distance`].
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn contributions(&self, a: &Entity, b: &Entity) -> Result<Contributions> {
        if a.key == b.key {
            return Err(Error::SelfComparison { key: a.key });
        }
        let w = &self.weights;
        let connected = if a.is_connected_to(b.key) { 1.0 } else { 0.0 };
        let shared_connections = a.connections.intersection(&b.connections).count() as f64;
        let shared_departments = a.departments.intersection(&b.departments).count() as f64;
        let shared_interests = a.interests.intersection(&b.interests).count() as f64;
        let same_location = if a.location == b.location { 1.0 } else { 0.0 };

        Ok(Contributions {
            connected: w.connected * connected * self.population,
            connections: w.connections * shared_connections * self.population,
            departments: w.departments * shared_departments * self.departments,
            interests: w.interests * shared_interests,
            locations: w.locations * same_location * self.locations,
        })
    }

    /// `0.0` for a saturated pair, `1.0` for a pair with nothing in common.
    pub fn distance(&self, a: &Entity, b: &Entity) -> Result<f64> {
        let total = self.contributions(a, b)?.total();
        Ok(((self.maximum - total) / self.maximum).clamp(0.0, 1.0))
    }

    /// `1.0 - distance`: higher means more alike.
    pub fn similarity(&self, a: &Entity, b: &Entity) -> Result<f64> {
        Ok(1.0 - self.distance(a, b)?)
    }
}
