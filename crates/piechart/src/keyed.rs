use crate::color::Color;
use crate::source::PieChartDataSource;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct SliceKey(String);

impl SliceKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl From<&str> for SliceKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub key: SliceKey,
    pub color: Color,
}

/// Data source backed by a `key -> value` map.
///
/// Slices follow the explicit key order when one is given (keys without a
/// value are skipped), otherwise the keys sorted ascending.
#[derive(Debug, Clone, Default)]
pub struct KeyedDataSource {
    keys: Vec<SliceKey>,
    values: HashMap<SliceKey, f64>,
    colors: HashMap<SliceKey, Color>,
    show_key_labels: bool,
}

impl KeyedDataSource {
    pub fn new(values: HashMap<SliceKey, f64>) -> Self {
        let mut source = Self::default();
        source.set_values(values, None);
        source
    }

    pub fn with_key_order(values: HashMap<SliceKey, f64>, key_order: Vec<SliceKey>) -> Self {
        let mut source = Self::default();
        source.set_values(values, Some(key_order));
        source
    }

    pub fn with_colors(mut self, colors: HashMap<SliceKey, Color>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_key_labels(mut self, show: bool) -> Self {
        self.show_key_labels = show;
        self
    }

    pub fn set_values(&mut self, values: HashMap<SliceKey, f64>, key_order: Option<Vec<SliceKey>>) {
        self.keys = match key_order {
            Some(order) => {
                let mut seen = HashSet::new();
                order
                    .into_iter()
                    .filter(|key| {
                        let known = values.contains_key(key);
                        if !known {
                            log::warn!("Ignoring key '{}' without a value", key);
                        }
                        known && seen.insert(key.clone())
                    })
                    .collect()
            }
            None => {
                let mut keys: Vec<SliceKey> = values.keys().cloned().collect();
                keys.sort();
                keys
            }
        };
        self.values = values;
    }

    pub fn set_colors(&mut self, colors: HashMap<SliceKey, Color>) {
        self.colors = colors;
    }

    pub fn set_show_key_labels(&mut self, show: bool) {
        self.show_key_labels = show;
    }

    pub fn keys(&self) -> &[SliceKey] {
        &self.keys
    }

    /// Key and resolved color of every slice, in slice order.
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        self.keys
            .iter()
            .enumerate()
            .map(|(i, key)| LegendEntry {
                key: key.clone(),
                color: self.color(i).unwrap_or_else(|| Color::for_slice(i)),
            })
            .collect()
    }
}

impl PieChartDataSource for KeyedDataSource {
    fn slice_count(&self) -> usize {
        self.keys.len()
    }

    fn value(&self, index: usize) -> f64 {
        self.keys
            .get(index)
            .and_then(|key| self.values.get(key))
            .copied()
            .unwrap_or_default()
    }

    fn color(&self, index: usize) -> Option<Color> {
        self.keys
            .get(index)
            .and_then(|key| self.colors.get(key))
            .copied()
    }

    fn text(&self, index: usize) -> Option<String> {
        self.show_key_labels
            .then(|| self.keys.get(index).map(ToString::to_string))
            .flatten()
    }
}
