use crate::entity::{Catalog, DepartmentKey, Entity, EntityKey, InterestKey, LocationKey};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single edit to the population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    Create {
        name: String,
        location: LocationKey,
    },
    Delete {
        key: EntityKey,
    },
    SetLocation {
        key: EntityKey,
        location: LocationKey,
    },
    SetDepartment {
        key: EntityKey,
        department: DepartmentKey,
        member: bool,
    },
    SetInterest {
        key: EntityKey,
        interest: InterestKey,
        member: bool,
    },
    /// Adds the connection if absent, removes it otherwise, on both endpoints.
    ToggleConnection {
        a: EntityKey,
        b: EntityKey,
    },
}

/// Entities in insertion order, keyed by [`EntityKey`].
///
/// Connections are kept symmetric: every mutation that touches a connection updates both
/// endpoints, and deleting an entity removes it from every other connection set.
///
/// Keys handed out by [`Mutation::Create`] are never reused, even after the entity that held
/// the highest key is deleted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    entities: IndexMap<EntityKey, Entity>,
    next: u32,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a population from externally supplied entities, checking every invariant.
    pub fn from_entities(catalog: &Catalog, entities: Vec<Entity>) -> Result<Self> {
        let mut map = IndexMap::with_capacity(entities.len());
        for entity in entities {
            let key = entity.key;
            if map.insert(key, entity).is_some() {
                return Err(Error::DuplicateEntity { key });
            }
        }
        let next = map.keys().map(|k| k.0 + 1).max().unwrap_or(0);
        let population = Self { entities: map, next };
        population.validate(catalog)?;
        Ok(population)
    }

    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        for entity in self.entities.values() {
            check_location(catalog, entity.location)?;
            for &d in &entity.departments {
                check_department(catalog, d)?;
            }
            for &i in &entity.interests {
                check_interest(catalog, i)?;
            }
            for &other in &entity.connections {
                if other == entity.key {
                    return Err(Error::SelfConnection { key: other });
                }
                let Some(peer) = self.entities.get(&other) else {
                    return Err(Error::UnknownEntity { key: other });
                };
                if !peer.connections.contains(&entity.key) {
                    return Err(Error::AsymmetricConnection {
                        from: entity.key,
                        to: other,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(&key)
    }

    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(&key)
    }

    pub fn entity(&self, key: EntityKey) -> Result<&Entity> {
        self.entities.get(&key).ok_or(Error::UnknownEntity { key })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.entities.keys().copied()
    }

    /// Key the next created entity receives.
    pub fn next_key(&self) -> EntityKey {
        EntityKey(self.next)
    }

    /// Adds `entity`, ignoring any connections it carries; use [`Population::connect`] for
    /// those.
    pub fn insert(&mut self, catalog: &Catalog, mut entity: Entity) -> Result<EntityKey> {
        let key = entity.key;
        if self.entities.contains_key(&key) {
            return Err(Error::DuplicateEntity { key });
        }
        check_location(catalog, entity.location)?;
        for &d in &entity.departments {
            check_department(catalog, d)?;
        }
        for &i in &entity.interests {
            check_interest(catalog, i)?;
        }
        entity.connections.clear();
        self.entities.insert(key, entity);
        self.next = self.next.max(key.0 + 1);
        Ok(key)
    }

    pub fn connect(&mut self, a: EntityKey, b: EntityKey) -> Result<bool> {
        self.check_pair(a, b)?;
        let added = self.entities[&a].connections.insert(b);
        self.entities[&b].connections.insert(a);
        Ok(added)
    }

    pub fn disconnect(&mut self, a: EntityKey, b: EntityKey) -> Result<bool> {
        self.check_pair(a, b)?;
        let removed = self.entities[&a].connections.remove(&b);
        self.entities[&b].connections.remove(&a);
        Ok(removed)
    }

    /// Applies `mutation`, returning the key of the entity it created or edited. Nothing
    /// changes when an error is returned.
    pub fn apply(&mut self, catalog: &Catalog, mutation: Mutation) -> Result<EntityKey> {
        match mutation {
            Mutation::Create { name, location } => {
                let key = self.next_key();
                self.insert(catalog, Entity::new(key, name, location))
            }
            Mutation::Delete { key } => {
                let Some(removed) = self.entities.shift_remove(&key) else {
                    return Err(Error::UnknownEntity { key });
                };
                for peer in removed.connections {
                    if let Some(p) = self.entities.get_mut(&peer) {
                        p.connections.remove(&key);
                    }
                }
                Ok(key)
            }
            Mutation::SetLocation { key, location } => {
                check_location(catalog, location)?;
                self.entity_mut(key)?.location = location;
                Ok(key)
            }
            Mutation::SetDepartment {
                key,
                department,
                member,
            } => {
                check_department(catalog, department)?;
                let entity = self.entity_mut(key)?;
                if member {
                    entity.departments.insert(department);
                } else {
                    entity.departments.remove(&department);
                }
                Ok(key)
            }
            Mutation::SetInterest {
                key,
                interest,
                member,
            } => {
                check_interest(catalog, interest)?;
                let entity = self.entity_mut(key)?;
                if member {
                    entity.interests.insert(interest);
                } else {
                    entity.interests.remove(&interest);
                }
                Ok(key)
            }
            Mutation::ToggleConnection { a, b } => {
                if !self.disconnect(a, b)? {
                    self.connect(a, b)?;
                }
                Ok(a)
            }
        }
    }

    fn entity_mut(&mut self, key: EntityKey) -> Result<&mut Entity> {
        self.entities
            .get_mut(&key)
            .ok_or(Error::UnknownEntity { key })
    }

    fn check_pair(&self, a: EntityKey, b: EntityKey) -> Result<()> {
        if a == b {
            return Err(Error::SelfConnection { key: a });
        }
        for key in [a, b] {
            if !self.entities.contains_key(&key) {
                return Err(Error::UnknownEntity { key });
            }
        }
        Ok(())
    }
}

fn check_location(catalog: &Catalog, key: LocationKey) -> Result<()> {
    match catalog.location(key) {
        Some(_) => Ok(()),
        None => Err(Error::UnknownLocation { key }),
    }
}

fn check_department(catalog: &Catalog, key: DepartmentKey) -> Result<()> {
    match catalog.department(key) {
        Some(_) => Ok(()),
        None => Err(Error::UnknownDepartment { key }),
    }
}

fn check_interest(catalog: &Catalog, key: InterestKey) -> Result<()> {
    match catalog.interest(key) {
        Some(_) => Ok(()),
        None => Err(Error::UnknownInterest { key }),
    }
}

impl Serialize for Population {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.entities.values())
    }
}

/// A catalog together with a population that references it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRoster")]
pub struct Roster {
    pub catalog: Catalog,
    #[serde(rename = "entities")]
    pub population: Population,
}

#[derive(Deserialize)]
struct RawRoster {
    #[serde(default)]
    catalog: Catalog,
    #[serde(default)]
    entities: Vec<Entity>,
}

impl TryFrom<RawRoster> for Roster {
    type Error = Error;

    fn try_from(raw: RawRoster) -> Result<Self> {
        let population = Population::from_entities(&raw.catalog, raw.entities)?;
        Ok(Self {
            catalog: raw.catalog,
            population,
        })
    }
}
