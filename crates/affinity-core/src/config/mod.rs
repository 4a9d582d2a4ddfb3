//! JSON configuration with dotted-path access and typed sections.

use crate::error::{Error, Result};
use crate::weights::Weights;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct AffinityConfig(Value);

impl Default for AffinityConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl AffinityConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidConfig {
            path: String::new(),
            message: e.to_string(),
        })?;
        if !value.is_object() {
            return Err(Error::InvalidConfig {
                path: String::new(),
                message: "configuration must be a JSON object".to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // A config built with `from_value` may hold a non-object root; replace it.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    /// Serializes `value` into the object at `dotted_path`.
    pub fn set_section<T: Serialize>(&mut self, dotted_path: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| Error::InvalidConfig {
            path: dotted_path.to_string(),
            message: e.to_string(),
        })?;
        self.set_value(dotted_path, value);
        Ok(())
    }

    /// Overlays `other` onto this config: objects merge key by key, anything else replaces.
    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    /// Deserializes the object at `dotted_path`, falling back to `T::default()` when the path
    /// is absent. Fields missing from the object take their defaults as `T` defines them.
    pub fn section<T>(&self, dotted_path: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.get(dotted_path) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => T::deserialize(value).map_err(|e| Error::InvalidConfig {
                path: dotted_path.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// The `weights` section, validated and clamped.
    pub fn weights(&self) -> Result<Weights> {
        self.section::<Weights>("weights")?.normalized()
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
