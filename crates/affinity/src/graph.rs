//! Projection of a scored session onto layout graph data.

use crate::error::Result;
use affinity_core::{Entity, EntityKey, Session};
use otter::{ForceOptions, Forces, GraphData, LinkParam, LinkSpec, NodeId, NodeSpec, Point};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Fill for entities that have no colorable attribute.
pub const NEUTRAL_COLOR: &str = "#333";
const PALETTE: [&str; 3] = ["#8cb4d6", "#79b17d", "#ffd24b"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Coloring {
    None,
    #[default]
    Location,
    /// By each entity's first department.
    Department,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphOptions {
    pub radius: f64,
    /// Link strength is `(similarity / best)^exponent`, where `best` is the highest similarity
    /// among the projected links, so the closest pair pulls at full strength and distant pairs
    /// barely pull at all.
    pub exponent: f64,
    /// Rest length of a link between identical entities.
    pub min_distance: f64,
    /// Rest length of a link between entities with nothing in common.
    pub max_distance: f64,
    pub coloring: Coloring,
    /// Where the focal entity is pinned and the layout is centered.
    pub center: Point,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            radius: 10.0,
            exponent: 32.0,
            min_distance: 30.0,
            max_distance: 150.0,
            coloring: Coloring::default(),
            center: Point::new(0.0, 0.0),
        }
    }
}

impl GraphOptions {
    pub fn rest_distance(&self, similarity: f64) -> f64 {
        self.min_distance + (self.max_distance - self.min_distance) * (1.0 - similarity)
    }

    /// Strength of a link whose similarity is `similarity`, relative to the best projected pair.
    pub fn strength(&self, similarity: f64, best: f64) -> f64 {
        if best <= 0.0 {
            return 0.0;
        }
        (similarity / best).clamp(0.0, 1.0).powf(self.exponent)
    }

    /// Inverse of [`GraphOptions::strength`]: the similarity relative to the best pair.
    pub fn similarity_of(&self, strength: f64) -> f64 {
        if self.exponent == 0.0 {
            return 1.0;
        }
        strength.max(0.0).powf(1.0 / self.exponent).clamp(0.0, 1.0)
    }

    /// The configured force set, with link rest lengths derived from link strength.
    pub fn forces(&self, options: &ForceOptions) -> Forces {
        let mut forces = options.build(self.center);
        if let Some(link) = forces.link.take() {
            let graph = self.clone();
            forces.link = Some(link.with_distance(LinkParam::computed(move |l, _, _| {
                graph.rest_distance(graph.similarity_of(l.strength))
            })));
        }
        forces
    }
}

pub fn node_id(key: EntityKey) -> NodeId {
    NodeId(u64::from(key.0))
}

/// Nodes for every entity and links weighted by similarity.
///
/// With a focal entity the focal node is pinned at the center and links run from it to every
/// other entity; without one every ordered pair is linked. Only connected pairs are drawn.
pub fn project(session: &Session, options: &GraphOptions) -> Result<GraphData> {
    let scorer = session.scorer()?;
    let population = session.population();
    let focal = session.focal();
    let colors = color_map(session, options.coloring);

    let nodes = population
        .iter()
        .map(|e| {
            let mut node = NodeSpec::new(node_id(e.key))
                .with_radius(options.radius)
                .with_label(e.name.clone())
                .with_color(color_of(&colors, options.coloring, e));
            if focal == Some(e.key) {
                node = node.pinned_at(options.center.x, options.center.y);
            }
            node
        })
        .collect();

    let sources: Vec<&Entity> = match focal {
        Some(key) => vec![population.entity(key)?],
        None => population.iter().collect(),
    };
    let mut pairs = Vec::new();
    for source in sources {
        for target in population.iter().filter(|t| t.key != source.key) {
            pairs.push((source, target, scorer.similarity(source, target)?));
        }
    }
    let best = pairs.iter().map(|&(_, _, s)| s).fold(0.0, f64::max);
    let links = pairs
        .into_iter()
        .map(|(source, target, similarity)| {
            let link = LinkSpec::new(node_id(source.key), node_id(target.key))
                .with_strength(options.strength(similarity, best));
            if source.is_connected_to(target.key) {
                link
            } else {
                link.hidden()
            }
        })
        .collect();
    Ok(GraphData::new(nodes, links))
}

fn coloring_key(coloring: Coloring, entity: &Entity) -> Option<u32> {
    match coloring {
        Coloring::None => None,
        Coloring::Location => Some(entity.location.0),
        Coloring::Department => entity.departments.first().map(|d| d.0),
    }
}

/// Assigns palette colors to attribute values in order of first appearance.
fn color_map(session: &Session, coloring: Coloring) -> FxHashMap<u32, String> {
    let mut colors = FxHashMap::default();
    for entity in session.population().iter() {
        if let Some(key) = coloring_key(coloring, entity) {
            let next = colors.len();
            colors.entry(key).or_insert_with(|| palette_color(next));
        }
    }
    colors
}

fn color_of(colors: &FxHashMap<u32, String>, coloring: Coloring, entity: &Entity) -> String {
    coloring_key(coloring, entity)
        .and_then(|k| colors.get(&k).cloned())
        .unwrap_or_else(|| NEUTRAL_COLOR.to_string())
}

/// `index`-th categorical color: the fixed palette, then golden-angle hues.
pub fn palette_color(index: usize) -> String {
    match PALETTE.get(index) {
        Some(c) => (*c).to_string(),
        None => {
            let hue = (index as f64 * 137.508).rem_euclid(360.0).round() as u32 % 360;
            format!("hsl({hue}, 33%, 66%)")
        }
    }
}
