use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultKey {
    Position(usize),
    Named(String),
}

impl ResultKey {
    /// Names spelling a canonical decimal index (`"0"`, `"12"`, not `"01"`)
    /// address that position; anything else stays a name.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let canonical = !name.is_empty()
            && name.bytes().all(|b| b.is_ascii_digit())
            && (name == "0" || !name.starts_with('0'));
        match name.parse::<usize>() {
            Ok(index) if canonical => ResultKey::Position(index),
            _ => ResultKey::Named(name),
        }
    }
}

impl fmt::Display for ResultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKey::Position(index) => write!(f, "{}", index),
            ResultKey::Named(name) => f.write_str(name),
        }
    }
}

/// Results of a batch in insertion order. Anonymous tasks take the next free
/// position, named tasks live under their key; both share one ordering.
///
/// A numeric name addresses the position it spells, so `"0"` and position 0
/// are one entry and the JSON view never holds two values under one key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResults {
    entries: IndexMap<ResultKey, Value>,
    next_position: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an anonymous result and returns its position.
    pub fn push(&mut self, value: Value) -> usize {
        let position = self.next_position;
        self.entries.insert(ResultKey::Position(position), value);
        self.next_position += 1;
        position
    }

    /// Stores a named result. A repeated name replaces the value in place.
    pub fn insert_named(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let key = ResultKey::from_name(name);
        if let ResultKey::Position(index) = key {
            self.next_position = self.next_position.max(index.saturating_add(1));
        }
        self.entries.insert(key, value)
    }

    /// Routes a task result by its key: empty keys are positional.
    pub fn record(&mut self, key: &str, value: Value) {
        if key.is_empty() {
            self.push(value);
        } else {
            self.insert_named(key, value);
        }
    }

    pub fn get(&self, key: &ResultKey) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn position(&self, index: usize) -> Option<&Value> {
        self.entries.get(&ResultKey::Position(index))
    }

    pub fn named(&self, name: &str) -> Option<&Value> {
        self.entries.get(&ResultKey::from_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResultKey, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ResultKey> {
        self.entries.keys()
    }

    /// JSON object view; positional keys render as decimal strings.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for BatchResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}
