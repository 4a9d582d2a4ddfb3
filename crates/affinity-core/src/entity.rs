//! Entities and the category universe they draw their attributes from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

macro_rules! key_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

key_type!(
    /// Stable identity of an entity; also the node id in the layout graph.
    EntityKey
);
key_type!(DepartmentKey);
key_type!(InterestKey);
key_type!(LocationKey);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub key: DepartmentKey,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub key: LocationKey,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub key: InterestKey,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestCategory {
    pub name: String,
    pub interests: Vec<Interest>,
}

/// The departments, locations and (categorized) interests entities may reference.
///
/// The catalog's cardinalities are the normalizers of the similarity score, so they count
/// every entry whether or not any entity references it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub departments: Vec<Department>,
    pub locations: Vec<Location>,
    pub interests: Vec<InterestCategory>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_department(&mut self, name: impl Into<String>) -> DepartmentKey {
        let key = DepartmentKey(next_key(self.departments.iter().map(|d| d.key.0)));
        self.departments.push(Department {
            key,
            name: name.into(),
        });
        key
    }

    pub fn add_location(&mut self, name: impl Into<String>) -> LocationKey {
        let key = LocationKey(next_key(self.locations.iter().map(|l| l.key.0)));
        self.locations.push(Location {
            key,
            name: name.into(),
        });
        key
    }

    /// Adds `name` under `category`, creating the category on first use. Interest keys are
    /// unique across categories.
    pub fn add_interest(&mut self, category: &str, name: impl Into<String>) -> InterestKey {
        let key = InterestKey(next_key(self.all_interests().map(|i| i.key.0)));
        let interest = Interest {
            key,
            name: name.into(),
        };
        match self.interests.iter_mut().find(|c| c.name == category) {
            Some(c) => c.interests.push(interest),
            None => self.interests.push(InterestCategory {
                name: category.to_string(),
                interests: vec![interest],
            }),
        }
        key
    }

    pub fn department(&self, key: DepartmentKey) -> Option<&Department> {
        self.departments.iter().find(|d| d.key == key)
    }

    pub fn location(&self, key: LocationKey) -> Option<&Location> {
        self.locations.iter().find(|l| l.key == key)
    }

    pub fn interest(&self, key: InterestKey) -> Option<&Interest> {
        self.all_interests().find(|i| i.key == key)
    }

    pub fn all_interests(&self) -> impl Iterator<Item = &Interest> {
        self.interests.iter().flat_map(|c| c.interests.iter())
    }

    pub fn department_count(&self) -> usize {
        self.departments.len()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Total interests across all categories.
    pub fn interest_count(&self) -> usize {
        self.interests.iter().map(|c| c.interests.len()).sum()
    }
}

fn next_key(existing: impl Iterator<Item = u32>) -> u32 {
    existing.max().map_or(0, |k| k + 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub key: EntityKey,
    pub name: String,
    pub initials: String,
    pub location: LocationKey,
    #[serde(default)]
    pub departments: BTreeSet<DepartmentKey>,
    #[serde(default)]
    pub interests: BTreeSet<InterestKey>,
    #[serde(default)]
    pub connections: BTreeSet<EntityKey>,
}

impl Entity {
    pub fn new(key: impl Into<EntityKey>, name: impl Into<String>, location: LocationKey) -> Self {
        let name = name.into();
        Self {
            key: key.into(),
            initials: initials(&name),
            name,
            location,
            departments: BTreeSet::new(),
            interests: BTreeSet::new(),
            connections: BTreeSet::new(),
        }
    }

    pub fn with_departments(mut self, keys: impl IntoIterator<Item = DepartmentKey>) -> Self {
        self.departments.extend(keys);
        self
    }

    pub fn with_interests(mut self, keys: impl IntoIterator<Item = InterestKey>) -> Self {
        self.interests.extend(keys);
        self
    }

    pub fn is_connected_to(&self, other: EntityKey) -> bool {
        self.connections.contains(&other)
    }
}

/// First character of every whitespace-separated part of `name`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_each_part() {
        assert_eq!(initials("Ada Lovelace"), "AL");
        assert_eq!(initials("  Grace   Brewster Hopper "), "GBH");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn interest_keys_are_unique_across_categories() {
        let mut catalog = Catalog::new();
        let a = catalog.add_interest("music", "jazz");
        let b = catalog.add_interest("sports", "rowing");
        let c = catalog.add_interest("music", "opera");
        assert_eq!((a.0, b.0, c.0), (0, 1, 2));
        assert_eq!(catalog.interests.len(), 2);
        assert_eq!(catalog.interest_count(), 3);
        assert_eq!(catalog.interest(c).map(|i| i.name.as_str()), Some("opera"));
    }
}
