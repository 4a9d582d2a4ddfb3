#![allow(dead_code)]

use affinity_core::{
    Catalog, DepartmentKey, Entity, EntityKey, InterestKey, LocationKey, Population,
};

/// Three departments, two locations and four interests in two categories.
pub fn catalog() -> Catalog {
    let mut c = Catalog::new();
    for d in ["Engineering", "Design", "Sales"] {
        c.add_department(d);
    }
    for l in ["Lisbon", "Oslo"] {
        c.add_location(l);
    }
    c.add_interest("music", "jazz");
    c.add_interest("music", "opera");
    c.add_interest("sports", "rowing");
    c.add_interest("sports", "climbing");
    c
}

pub fn d(k: u32) -> DepartmentKey {
    DepartmentKey(k)
}

pub fn i(k: u32) -> InterestKey {
    InterestKey(k)
}

pub fn l(k: u32) -> LocationKey {
    LocationKey(k)
}

pub fn k(k: u32) -> EntityKey {
    EntityKey(k)
}

/// Ada, Bob, Cy and Dee; Ada-Bob, Ada-Cy and Bob-Cy are connected.
pub fn population(catalog: &Catalog) -> Population {
    let mut p = Population::new();
    let entities = [
        Entity::new(k(0), "Ada Lovelace", l(0))
            .with_departments([d(0), d(1)])
            .with_interests([i(0)]),
        Entity::new(k(1), "Bob Marley", l(0))
            .with_departments([d(0)])
            .with_interests([i(0), i(1)]),
        Entity::new(k(2), "Cy Twombly", l(1)),
        Entity::new(k(3), "Dee Dee", l(1)),
    ];
    for e in entities {
        p.insert(catalog, e).unwrap();
    }
    p.connect(k(0), k(1)).unwrap();
    p.connect(k(0), k(2)).unwrap();
    p.connect(k(1), k(2)).unwrap();
    p
}

/// Small deterministic generator for property-style loops.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    pub fn next_unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn below(&mut self, n: usize) -> usize {
        ((self.next_unit() * n as f64) as usize).min(n.saturating_sub(1))
    }
}

/// A random population over [`catalog`] with `n` entities.
pub fn random_population(catalog: &Catalog, n: usize, rng: &mut Lcg) -> Population {
    let mut p = Population::new();
    for key in 0..n as u32 {
        let mut e = Entity::new(key, format!("Person {key}"), l(rng.below(2) as u32));
        for dk in 0..3 {
            if rng.next_unit() < 0.3 {
                e.departments.insert(d(dk));
            }
        }
        for ik in 0..4 {
            if rng.next_unit() < 0.3 {
                e.interests.insert(i(ik));
            }
        }
        p.insert(catalog, e).unwrap();
    }
    for _ in 0..n * 2 {
        let a = rng.below(n) as u32;
        let b = rng.below(n) as u32;
        if a != b {
            p.connect(k(a), k(b)).unwrap();
        }
    }
    p
}
