//! Taxonomy store: the immutable failure-mode catalog
//!
//! Loaded once from a JSON document keyed by mode name. The document's key
//! order is the store order, which the router's first-match-wins dispatch
//! depends on, so parsing goes through `serde_json` with `preserve_order`.
//! A missing or malformed data file degrades to an empty store rather than
//! failing startup; the caller decides how to surface that.

use crate::types::FailureMode;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One record in the data file (the mode name is the document key)
#[derive(Debug, Deserialize)]
struct FailureModeRecord {
    #[serde(default)]
    category: String,
    #[serde(default)]
    short_description: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    example_scenarios: Vec<String>,
    #[serde(default)]
    phd_level_analysis: String,
    #[serde(default)]
    tactical_solutions: Vec<String>,
    #[serde(default)]
    structural_solutions: Vec<String>,
}

impl FailureModeRecord {
    fn into_mode(self, name: String) -> FailureMode {
        FailureMode {
            name,
            category: self.category,
            short_description: self.short_description,
            description: self.description,
            example_scenarios: self.example_scenarios,
            phd_level_analysis: self.phd_level_analysis,
            tactical_solutions: self.tactical_solutions,
            structural_solutions: self.structural_solutions,
        }
    }
}

/// Read-only store of failure modes with a derived category index
#[derive(Debug, Default)]
pub struct TaxonomyStore {
    modes: Vec<FailureMode>,
    by_name: HashMap<String, usize>,
    categories: Vec<String>,
    by_category: HashMap<String, Vec<String>>,
}

impl TaxonomyStore {
    /// Build a store from an already-loaded mode list
    ///
    /// The category index is derived in one pass over the list in its
    /// given order: each mode's name is appended to its category bucket,
    /// and a category enters `categories()` on first sight. Rebuilding
    /// from the same list always yields the same index.
    pub fn from_modes(modes: Vec<FailureMode>) -> Self {
        let mut by_name = HashMap::with_capacity(modes.len());
        let mut categories = Vec::new();
        let mut by_category: HashMap<String, Vec<String>> = HashMap::new();

        for (i, mode) in modes.iter().enumerate() {
            by_name.insert(mode.name.clone(), i);
            if !by_category.contains_key(&mode.category) {
                categories.push(mode.category.clone());
            }
            by_category
                .entry(mode.category.clone())
                .or_default()
                .push(mode.name.clone());
        }

        Self {
            modes,
            by_name,
            categories,
            by_category,
        }
    }

    /// Load the store from a JSON data file, degrading to empty on failure
    pub fn load(path: &Path) -> Self {
        match try_load(path) {
            Ok(modes) => Self::from_modes(modes),
            Err(e) => {
                tracing::warn!("failed to load failure modes from {:?}: {:#}", path, e);
                Self::default()
            }
        }
    }

    /// Look up a failure mode by name; a miss is `None`, not an error
    pub fn get(&self, name: &str) -> Option<&FailureMode> {
        self.by_name.get(name).map(|&i| &self.modes[i])
    }

    /// Category names in insertion order of first occurrence
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Mode names in a category, store order; empty for unknown categories
    pub fn modes_in(&self, category: &str) -> &[String] {
        self.by_category
            .get(category)
            .map(|names| names.as_slice())
            .unwrap_or(&[])
    }

    /// All modes in store order
    pub fn modes(&self) -> impl Iterator<Item = &FailureMode> {
        self.modes.iter()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

fn try_load(path: &Path) -> Result<Vec<FailureMode>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {:?}", path))?;

    // serde_json's Map preserves key order (preserve_order feature), so
    // the document order survives into store order.
    let doc: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse data file {:?}", path))?;

    let mut modes = Vec::with_capacity(doc.len());
    for (name, value) in doc {
        let record: FailureModeRecord = serde_json::from_value(value)
            .with_context(|| format!("Malformed record for failure mode '{}'", name))?;
        modes.push(record.into_mode(name));
    }

    Ok(modes)
}
