use crate::entity::{Catalog, EntityKey};
use crate::error::{Error, Result};
use crate::population::{Mutation, Population, Roster};
use crate::rank::{RankRow, rank};
use crate::score::Scorer;
use crate::weights::{Dimension, Weights};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    /// Focus an entity.
    Select { key: EntityKey },
    /// Drop the focus.
    Clear,
    Mutate { mutation: Mutation },
    UpdateWeight { dimension: Dimension, value: f64 },
}

/// Application state: catalog, population, weights and the focused entity, plus the scorer
/// derived from them.
///
/// The scorer is rebuilt after every change. When the current state cannot be scored (for
/// example all weights are zero) the build error is kept and reported by [`Session::scorer`]
/// until a later action makes the state scorable again.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    population: Population,
    weights: Weights,
    focal: Option<EntityKey>,
    scorer: std::result::Result<Scorer, Error>,
}

impl Session {
    pub fn new(catalog: Catalog, population: Population, weights: Weights) -> Result<Self> {
        population.validate(&catalog)?;
        let weights = weights.normalized()?;
        let scorer = Scorer::new(&catalog, &population, &weights);
        Ok(Self {
            catalog,
            population,
            weights,
            focal: None,
            scorer,
        })
    }

    pub fn from_roster(roster: Roster, weights: Weights) -> Result<Self> {
        Self::new(roster.catalog, roster.population, weights)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn focal(&self) -> Option<EntityKey> {
        self.focal
    }

    pub fn scorer(&self) -> Result<&Scorer> {
        self.scorer.as_ref().map_err(Clone::clone)
    }

    /// Applies one action. On error the session is unchanged.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Select { key } => {
                self.population.entity(key)?;
                self.focal = Some(key);
            }
            Action::Clear => self.focal = None,
            Action::Mutate { mutation } => {
                let deleted = match &mutation {
                    Mutation::Delete { key } => Some(*key),
                    _ => None,
                };
                self.population.apply(&self.catalog, mutation)?;
                if deleted.is_some() && deleted == self.focal {
                    self.focal = None;
                }
                self.rebuild();
            }
            Action::UpdateWeight { dimension, value } => {
                self.weights.set(dimension, value)?;
                self.rebuild();
            }
        }
        Ok(())
    }

    pub fn ranking(&self) -> Result<Vec<RankRow>> {
        rank(self.scorer()?, &self.population, self.focal)
    }

    fn rebuild(&mut self) {
        self.scorer = Scorer::new(&self.catalog, &self.population, &self.weights);
        if let Err(err) = &self.scorer {
            tracing::debug!(%err, "session state is not scorable");
        }
    }
}
