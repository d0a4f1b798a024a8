//! Case-keyed dataset table

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// One static dataset: case name → record, in file order.
///
/// Records are kept in a vector so [`Dataset::names`] reports insertion
/// order, with an `FxHashMap` index for O(1) lookups by case name.
#[derive(Debug, Clone)]
pub struct Dataset<T> {
    name: &'static str,
    entries: Vec<(String, T)>,
    index: FxHashMap<String, usize>,
}

impl<T> Dataset<T> {
    /// Create an empty dataset.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Build a dataset from `(case, record)` pairs.
    ///
    /// A repeated case keeps its first position and its last record.
    #[must_use]
    pub fn from_entries<I, S>(name: &'static str, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
    {
        let mut dataset = Self::new(name);
        for (case, record) in entries {
            dataset.insert(case.into(), record);
        }
        dataset
    }

    fn insert(&mut self, case: String, record: T) {
        if let Some(&slot) = self.index.get(&case) {
            self.entries[slot].1 = record;
        } else {
            self.index.insert(case.clone(), self.entries.len());
            self.entries.push((case, record));
        }
    }

    /// Dataset name used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Look up a case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the case has no entry.
    pub fn get(&self, case: &str) -> Result<&T> {
        self.index
            .get(case)
            .map(|&slot| &self.entries[slot].1)
            .ok_or_else(|| Error::NotFound {
                dataset: self.name,
                case: case.to_string(),
            })
    }

    /// Whether the case has an entry.
    #[must_use]
    pub fn contains(&self, case: &str) -> bool {
        self.index.contains_key(case)
    }

    /// Case names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(case, _)| case.as_str())
    }

    /// Iterate `(case, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.entries.iter().map(|(case, record)| (case.as_str(), record))
    }

    /// Number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dataset is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: DeserializeOwned> Dataset<T> {
    /// Parse a JSON object mapping case name → record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the document is not a JSON object, or
    /// [`Error::MalformedRecord`] naming the first case whose record does not
    /// decode.
    pub fn from_json_str(name: &'static str, json: &str) -> Result<Self> {
        let document: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut dataset = Self::new(name);
        for (case, value) in document {
            let record = serde_json::from_value(value).map_err(|source| Error::MalformedRecord {
                dataset: name,
                case: case.clone(),
                source,
            })?;
            dataset.insert(case, record);
        }
        Ok(dataset)
    }
}
