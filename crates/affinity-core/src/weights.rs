use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    /// The two entities are directly connected.
    Connected,
    /// Shared connections.
    Connections,
    Departments,
    Interests,
    Locations,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Connected,
        Dimension::Connections,
        Dimension::Departments,
        Dimension::Interests,
        Dimension::Locations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Connected => "connected",
            Dimension::Connections => "connections",
            Dimension::Departments => "departments",
            Dimension::Interests => "interests",
            Dimension::Locations => "locations",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::UnknownDimension {
                name: s.to_string(),
            })
    }
}

/// Per-dimension multipliers of the similarity score. Zero disables a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Weights {
    pub connected: f64,
    pub connections: f64,
    pub departments: f64,
    pub interests: f64,
    pub locations: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            connected: 1.0,
            connections: 0.8,
            departments: 0.4,
            interests: 0.6,
            locations: 0.2,
        }
    }
}

impl Weights {
    /// Upper bound of every weight; larger values are clamped.
    pub const MAX: f64 = 3.0;
    /// Granularity offered by interactive controls.
    pub const STEP: f64 = 0.1;

    pub fn zero() -> Self {
        Self {
            connected: 0.0,
            connections: 0.0,
            departments: 0.0,
            interests: 0.0,
            locations: 0.0,
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Connected => self.connected,
            Dimension::Connections => self.connections,
            Dimension::Departments => self.departments,
            Dimension::Interests => self.interests,
            Dimension::Locations => self.locations,
        }
    }

    /// Sets one weight, returning the value actually stored after clamping.
    pub fn set(&mut self, dimension: Dimension, value: f64) -> Result<f64> {
        let value = bounded(dimension, value)?;
        let slot = match dimension {
            Dimension::Connected => &mut self.connected,
            Dimension::Connections => &mut self.connections,
            Dimension::Departments => &mut self.departments,
            Dimension::Interests => &mut self.interests,
            Dimension::Locations => &mut self.locations,
        };
        *slot = value;
        Ok(value)
    }

    pub fn with(mut self, dimension: Dimension, value: f64) -> Result<Self> {
        self.set(dimension, value)?;
        Ok(self)
    }

    /// Checks every weight and clamps those above [`Weights::MAX`].
    pub fn normalized(self) -> Result<Self> {
        let mut out = self;
        for d in Dimension::ALL {
            out.set(d, self.get(d))?;
        }
        Ok(out)
    }

    pub fn is_all_zero(&self) -> bool {
        Dimension::ALL.into_iter().all(|d| self.get(d) == 0.0)
    }
}

fn bounded(dimension: Dimension, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidWeight {
            dimension: dimension.to_string(),
            value,
        });
    }
    Ok(value.min(Weights::MAX))
}
