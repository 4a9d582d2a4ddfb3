//! Deterministic synthetic rosters.

use crate::error::Result;
use affinity_core::{Catalog, Entity, EntityKey, Population, Roster};
use otter::rng::XorShift64Star;
use serde::{Deserialize, Serialize};

const NAMES: &[&str] = &[
    "Ada Lovelace",
    "Alan Turing",
    "Barbara Liskov",
    "Bjarne Stroustrup",
    "Claude Shannon",
    "Dennis Ritchie",
    "Donald Knuth",
    "Edsger Dijkstra",
    "Frances Allen",
    "Grace Hopper",
    "Guido van Rossum",
    "Hedy Lamarr",
    "Ivan Sutherland",
    "Jean Bartik",
    "John Backus",
    "Karen Jones",
    "Ken Thompson",
    "Leslie Lamport",
    "Linus Torvalds",
    "Margaret Hamilton",
    "Niklaus Wirth",
    "Radia Perlman",
    "Rob Pike",
    "Sophie Wilson",
    "Tim Berners-Lee",
    "Tony Hoare",
    "Vint Cerf",
    "Whitfield Diffie",
    "Yukihiro Matsumoto",
    "Zhang Yitang",
];

const DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Design",
    "Marketing",
    "Sales",
    "Support",
    "Finance",
    "People",
    "Legal",
];

const LOCATIONS: &[&str] = &["Lisbon", "Oslo", "Toronto", "Nairobi", "Osaka", "Austin"];

const INTERESTS: &[(&str, &[&str])] = &[
    ("music", &["jazz", "opera", "techno", "folk", "hip hop"]),
    ("sports", &["rowing", "climbing", "football", "chess", "cycling"]),
    ("food", &["baking", "barbecue", "coffee", "fermentation"]),
    ("outdoors", &["hiking", "camping", "gardening", "birding"]),
    ("crafts", &["knitting", "woodwork", "pottery", "photography"]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeedOptions {
    pub size: usize,
    pub department_probability: f64,
    pub interest_probability: f64,
    /// Connection draws per entity; the total is capped by the number of distinct pairs.
    pub connections_per_entity: usize,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            size: NAMES.len(),
            department_probability: 0.3,
            interest_probability: 0.1,
            connections_per_entity: 5,
        }
    }
}

/// The built-in department, location and interest universe.
pub fn default_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for d in DEPARTMENTS {
        catalog.add_department(*d);
    }
    for l in LOCATIONS {
        catalog.add_location(*l);
    }
    for (category, names) in INTERESTS {
        for name in *names {
            catalog.add_interest(category, *name);
        }
    }
    catalog
}

/// Builds the default catalog and a random population over it. The same `seed` and
/// `options` always produce the same roster.
pub fn generate(seed: u64, options: &SeedOptions) -> Result<Roster> {
    let catalog = default_catalog();
    let mut rng = XorShift64Star::new(seed);
    let mut population = Population::new();

    for idx in 0..options.size {
        let name = match (NAMES[idx % NAMES.len()], idx / NAMES.len()) {
            (name, 0) => name.to_string(),
            (name, round) => format!("{name} {}", round + 1),
        };
        let location = catalog.locations[rng.next_usize(catalog.locations.len())].key;
        let departments: Vec<_> = catalog
            .departments
            .iter()
            .filter(|_| rng.chance(options.department_probability))
            .map(|d| d.key)
            .collect();
        let interests: Vec<_> = catalog
            .all_interests()
            .filter(|_| rng.chance(options.interest_probability))
            .map(|i| i.key)
            .collect();
        let entity = Entity::new(EntityKey(idx as u32), name, location)
            .with_departments(departments)
            .with_interests(interests);
        population.insert(&catalog, entity)?;
    }

    let n = options.size;
    let pairs = n * n.saturating_sub(1) / 2;
    let wanted = (n * options.connections_per_entity).min(pairs);
    let mut made = 0;
    while made < wanted {
        let a = EntityKey(rng.next_usize(n) as u32);
        let b = EntityKey(rng.next_usize(n) as u32);
        if a != b && population.connect(a, b)? {
            made += 1;
        }
    }

    tracing::debug!(seed, entities = n, connections = made, "generated roster");
    Ok(Roster {
        catalog,
        population,
    })
}
