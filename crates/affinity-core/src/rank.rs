use crate::entity::EntityKey;
use crate::error::Result;
use crate::population::Population;
use crate::score::Scorer;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankRow {
    pub key: EntityKey,
    pub name: String,
    /// Similarity to the focal entity; absent when nothing is focused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

/// Orders the population for display.
///
/// With a focal entity every other entity is listed by descending similarity to it; without
/// one, every entity is listed by name. Ties fall back to name, then key.
pub fn rank(
    scorer: &Scorer,
    population: &Population,
    focal: Option<EntityKey>,
) -> Result<Vec<RankRow>> {
    let mut rows = match focal {
        Some(key) => {
            let focal = population.entity(key)?;
            let mut rows = Vec::with_capacity(population.len().saturating_sub(1));
            for other in population.iter().filter(|e| e.key != key) {
                rows.push(RankRow {
                    key: other.key,
                    name: other.name.clone(),
                    similarity: Some(scorer.similarity(focal, other)?),
                });
            }
            rows
        }
        None => population
            .iter()
            .map(|e| RankRow {
                key: e.key,
                name: e.name.clone(),
                similarity: None,
            })
            .collect(),
    };
    rows.sort_by(compare_rows);
    Ok(rows)
}

fn compare_rows(a: &RankRow, b: &RankRow) -> Ordering {
    let by_score = match (a.similarity, b.similarity) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        _ => Ordering::Equal,
    };
    by_score
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.key.cmp(&b.key))
}
