//! Data shapes consumed from the external item and category providers.
//!
//! Items, their numeric facts, and the category descriptors are owned by the
//! backing data store; the engine only reads them. A [`Category`] names the
//! fact key (`metric_key`) the round compares on, and carries presentation
//! details the engine itself never touches.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable identifier for an item, minted by the external data store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One numeric fact about an item under one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// The comparable value. Assumed positive for every metric in play.
    pub value: f64,
    /// Display unit, e.g. "kcal" or "km²".
    pub unit: String,
    /// Where the number came from.
    pub source: String,
    /// When the number was last verified, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<String>,
}

/// A playable item: stable id, display name, and facts keyed by metric.
///
/// An item without a fact for a category's metric is simply ineligible for
/// that category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub facts: HashMap<String, Fact>,
}

impl Item {
    /// Look up this item's fact for a metric, if it has one.
    pub fn fact(&self, metric_key: &str) -> Option<&Fact> {
        self.facts.get(metric_key)
    }

    /// The comparable value for a metric, if the item carries that fact.
    pub fn metric_value(&self, metric_key: &str) -> Option<f64> {
        self.fact(metric_key).map(|fact| fact.value)
    }
}

/// Formats a raw fact value for display.
pub type ValueFormatter = fn(f64) -> String;

fn plain_format(value: f64) -> String {
    value.to_string()
}

/// A question category: which metric the round compares and how it is shown.
///
/// Categories are compared by `id` only; the presentation fields (including
/// the formatter function) do not participate in equality.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: String,
    pub label: String,
    /// Question text shown to the player.
    pub question: String,
    /// Fact key compared in this category.
    pub metric_key: String,
    /// Presentation color (hex string); unused by the engine.
    pub color: String,
    /// Presentation formatter for fact values.
    pub format: ValueFormatter,
}

impl Category {
    /// Create a category with a plain numeric formatter and default color.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        question: impl Into<String>,
        metric_key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            question: question.into(),
            metric_key: metric_key.into(),
            color: "#ffffff".to_string(),
            format: plain_format,
        }
    }

    /// Set the presentation color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the value formatter.
    pub fn with_format(mut self, format: ValueFormatter) -> Self {
        self.format = format;
        self
    }

    /// Format a fact value for display.
    pub fn format_value(&self, value: f64) -> String {
        (self.format)(value)
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
