//! Categorical labels and label-keyed tables.
//!
//! Intents, themes and stakeholders form an open set: a new category in a
//! corpus must not require a code change, so they are validated strings
//! rather than enums. [`LabelMap`] keeps the document order of its keys,
//! which is the tie-break order for every ranking in the engine.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use feedlens_common::{Error, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Label
// ============================================================================

/// A validated category label (trimmed, never blank).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    /// Create a label, rejecting blank text.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidLabel(
                "category labels must not be blank".to_string(),
            ));
        }
        if trimmed.len() == text.len() {
            Ok(Self(text))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Built-in literals that are known to be valid.
    pub(crate) fn from_static(text: &'static str) -> Self {
        Self(text.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Label {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Label {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// LabelMap
// ============================================================================

/// Mapping from label to value that remembers insertion order.
///
/// Serialized as a plain JSON object; deserialization keeps the document's
/// key order and rejects duplicate keys.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap<V> {
    entries: Vec<(Label, V)>,
}

/// Label → count table (intent, theme or stakeholder volumes).
pub type Distribution = LabelMap<u64>;

/// Intent → theme distribution.
pub type ThematicClusters = LabelMap<Distribution>;

impl<V> Default for LabelMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> LabelMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, label: Label, value: V) -> Option<V> {
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((label, value));
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_str() == label)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &V)> {
        self.entries.iter().map(|(label, value)| (label, value))
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.entries.iter().map(|(label, _)| label)
    }
}

impl LabelMap<u64> {
    /// Count for a label, zero when absent.
    pub fn count_of(&self, label: &str) -> u64 {
        self.get(label).copied().unwrap_or(0)
    }

    /// Build a table from literal pairs.
    pub fn from_counts(pairs: &[(&str, u64)]) -> Result<Self> {
        let mut map = Self::with_capacity(pairs.len());
        for (label, count) in pairs {
            map.insert(Label::new(*label)?, *count);
        }
        Ok(map)
    }

    /// Count label occurrences, keyed in first-seen order.
    pub fn tally<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a Label>,
    {
        let mut map = Self::new();
        for label in labels {
            match map.entries.iter_mut().find(|(existing, _)| existing == label) {
                Some((_, count)) => *count += 1,
                None => map.entries.push((label.clone(), 1)),
            }
        }
        map
    }
}

impl<V> FromIterator<(Label, V)> for LabelMap<V> {
    fn from_iter<T: IntoIterator<Item = (Label, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (label, value) in iter {
            map.insert(label, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for LabelMap<V> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for LabelMap<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LabelMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for LabelMapVisitor<V> {
            type Value = LabelMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by category label")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = LabelMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, value)) = access.next_entry::<Label, V>()? {
                    if map.contains(label.as_str()) {
                        return Err(de::Error::custom(format!("duplicate label `{label}`")));
                    }
                    map.entries.push((label, value));
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(LabelMapVisitor(PhantomData))
    }
}
