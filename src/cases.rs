//! Case filtering & ordering
//!
//! Case names encode the run configuration as `{type}-{batch}-{patch}`:
//!
//! ```text
//! ti-64-8
//! ││ │  └─ patch size 8   (digits at the end, after a hyphen)
//! ││ └──── batch size 64  (first digits enclosed by hyphens)
//! └┴────── model type     (text before the first hyphen: ti < s < b)
//! ```
//!
//! Names that do not follow the shape are not errors: the numeric parts
//! read as 0 and sorting proceeds with that default.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Coarse model-size category.
///
/// Ordered by model size (`Ti < S < B`), not alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Tiny
    Ti,
    /// Small
    S,
    /// Base
    B,
}

impl ModelType {
    /// All types, smallest first.
    pub const ALL: [Self; 3] = [Self::Ti, Self::S, Self::B];

    /// Name prefix of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ti => "ti",
            Self::S => "s",
            Self::B => "b",
        }
    }

    /// Type of a case: the text before the first hyphen.
    #[must_use]
    pub fn of(name: &str) -> Option<Self> {
        name.split('-').next().and_then(|prefix| prefix.parse().ok())
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown model type '{s}'")))
    }
}

/// Batch size: the first run of digits enclosed by hyphens (`-64-`), or 0.
#[must_use]
pub fn extract_batch_size(name: &str) -> u32 {
    let bytes = name.as_bytes();
    for (start, _) in name.match_indices('-') {
        let digits = bytes[start + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        let end = start + 1 + digits;
        if digits > 0 && bytes.get(end) == Some(&b'-') {
            return name[start + 1..end].parse().unwrap_or(0);
        }
    }
    0
}

/// Patch size: the run of digits ending the name after a hyphen (`-8`), or 0.
#[must_use]
pub fn extract_patch_size(name: &str) -> u32 {
    let prefix = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if prefix.len() == name.len() || !prefix.ends_with('-') {
        return 0;
    }
    name[prefix.len()..].parse().unwrap_or(0)
}

/// Parsed view of a case name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseName {
    /// Full case name
    pub name: String,
    /// Model type, `None` when the prefix is not a known type
    pub model_type: Option<ModelType>,
    /// Batch size, 0 when absent
    pub batch_size: u32,
    /// Patch size, 0 when absent
    pub patch_size: u32,
}

impl CaseName {
    /// Parse a case name. Never fails.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        Self {
            name: name.to_string(),
            model_type: ModelType::of(name),
            batch_size: extract_batch_size(name),
            patch_size: extract_patch_size(name),
        }
    }
}

/// Display order within a group: batch size ascending, then patch size
/// descending.
#[must_use]
pub fn compare_cases(a: &str, b: &str) -> Ordering {
    extract_batch_size(a)
        .cmp(&extract_batch_size(b))
        .then_with(|| extract_patch_size(b).cmp(&extract_patch_size(a)))
}

/// Sort case names by [`compare_cases`]. Stable.
pub fn sort_cases<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| compare_cases(a.as_ref(), b.as_ref()));
}

/// Sort mixed-type case names: model type first (`ti < s < b`, unknown
/// types last), then [`compare_cases`]. Stable.
pub fn sort_cases_by_type<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| {
        let (a, b) = (a.as_ref(), b.as_ref());
        type_rank(a)
            .cmp(&type_rank(b))
            .then_with(|| compare_cases(a, b))
    });
}

fn type_rank(name: &str) -> usize {
    ModelType::of(name).map_or(ModelType::ALL.len(), |t| t as usize)
}

/// Partition names into type groups by substring containment.
///
/// A name lands in every group whose prefix it contains anywhere, so
/// `bs-12-4` belongs to both `s` and `b`. Every type has an entry, possibly
/// empty; names keep their input order within a group.
#[must_use]
pub fn group_by_type<S: AsRef<str>>(names: &[S]) -> BTreeMap<ModelType, Vec<String>> {
    ModelType::ALL
        .into_iter()
        .map(|t| {
            let members = names
                .iter()
                .map(S::as_ref)
                .filter(|name| name.contains(t.as_str()))
                .map(str::to_string)
                .collect();
            (t, members)
        })
        .collect()
}

/// Multi-select state of a case browser.
///
/// Every toggle flips set membership, so the result depends only on the
/// current state and the toggled value. Empty batch/patch filters mean
/// "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    cases: BTreeSet<String>,
    batch_sizes: BTreeSet<u32>,
    patch_sizes: BTreeSet<u32>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a case; returns whether it is now selected.
    pub fn toggle_case(&mut self, name: &str) -> bool {
        if self.cases.remove(name) {
            false
        } else {
            self.cases.insert(name.to_string())
        }
    }

    /// Toggle a batch-size filter; returns whether it is now active.
    pub fn toggle_batch_size(&mut self, batch_size: u32) -> bool {
        toggle(&mut self.batch_sizes, batch_size)
    }

    /// Toggle a patch-size filter; returns whether it is now active.
    pub fn toggle_patch_size(&mut self, patch_size: u32) -> bool {
        toggle(&mut self.patch_sizes, patch_size)
    }

    /// Whether a case is selected.
    #[must_use]
    pub fn is_selected(&self, name: &str) -> bool {
        self.cases.contains(name)
    }

    /// Selected cases in display order ([`sort_cases_by_type`]).
    #[must_use]
    pub fn selected_cases(&self) -> Vec<&str> {
        let mut cases: Vec<&str> = self.cases.iter().map(String::as_str).collect();
        sort_cases_by_type(&mut cases);
        cases
    }

    /// Whether a name passes the batch and patch filters.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        (self.batch_sizes.is_empty() || self.batch_sizes.contains(&extract_batch_size(name)))
            && (self.patch_sizes.is_empty()
                || self.patch_sizes.contains(&extract_patch_size(name)))
    }

    /// Names passing the batch and patch filters, in input order.
    #[must_use]
    pub fn filter<'a, S: AsRef<str>>(&self, names: &'a [S]) -> Vec<&'a str> {
        names
            .iter()
            .map(S::as_ref)
            .filter(|name| self.matches(name))
            .collect()
    }

    /// Number of selected cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether no case is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Clear cases and filters.
    pub fn clear(&mut self) {
        self.cases.clear();
        self.batch_sizes.clear();
        self.patch_sizes.clear();
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_sizes() {
        assert_eq!(extract_batch_size("ti-64-8"), 64);
        assert_eq!(extract_patch_size("ti-64-8"), 8);
        assert_eq!(extract_batch_size("nomatch"), 0);
        assert_eq!(extract_patch_size("nomatch"), 0);
    }

    #[test]
    fn test_extract_edge_shapes() {
        // leftmost "-N-" wins
        assert_eq!(extract_batch_size("b-128-16-2"), 128);
        assert_eq!(extract_batch_size("ti--8"), 0);
        assert_eq!(extract_batch_size("ti-x-8"), 0);
        assert_eq!(extract_patch_size("ti-64-"), 0);
        assert_eq!(extract_patch_size("ti64"), 0);
        assert_eq!(extract_patch_size("64"), 0);
        assert_eq!(extract_patch_size("-64"), 64);
    }

    #[test]
    fn test_model_type() {
        assert_eq!(ModelType::of("ti-64-8"), Some(ModelType::Ti));
        assert_eq!(ModelType::of("b-32-4"), Some(ModelType::B));
        assert_eq!(ModelType::of("large-32-4"), None);
        assert!(ModelType::Ti < ModelType::S && ModelType::S < ModelType::B);
    }

    #[test]
    fn test_sort_batch_asc_patch_desc() {
        let mut names = vec!["ti-64-8", "ti-64-4", "ti-32-8"];
        sort_cases(&mut names);
        assert_eq!(names, vec!["ti-32-8", "ti-64-8", "ti-64-4"]);
    }

    #[test]
    fn test_sort_by_type_uses_size_order() {
        let mut names = vec!["b-16-4", "s-64-8", "ti-64-8", "x-1-1", "ti-32-8"];
        sort_cases_by_type(&mut names);
        assert_eq!(names, vec!["ti-32-8", "ti-64-8", "s-64-8", "b-16-4", "x-1-1"]);
    }

    #[test]
    fn test_group_by_type_substring_quirk() {
        let groups = group_by_type(&["ti-64-8", "s-32-4", "bs-12-4"]);
        assert_eq!(groups[&ModelType::Ti], vec!["ti-64-8"]);
        assert_eq!(groups[&ModelType::S], vec!["s-32-4", "bs-12-4"]);
        assert_eq!(groups[&ModelType::B], vec!["bs-12-4"]);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut selection = Selection::new();
        assert!(selection.toggle_case("ti-64-8"));
        assert!(selection.is_selected("ti-64-8"));
        assert!(!selection.toggle_case("ti-64-8"));
        assert_eq!(selection, Selection::new());
    }

    #[test]
    fn test_filter_by_batch_and_patch() {
        let names = ["ti-64-8", "ti-64-4", "s-32-8"];
        let mut selection = Selection::new();
        assert_eq!(selection.filter(&names), names.to_vec());

        selection.toggle_batch_size(64);
        assert_eq!(selection.filter(&names), vec!["ti-64-8", "ti-64-4"]);

        selection.toggle_patch_size(8);
        assert_eq!(selection.filter(&names), vec!["ti-64-8"]);

        selection.toggle_batch_size(64);
        assert_eq!(selection.filter(&names), vec!["ti-64-8", "s-32-8"]);
    }

    #[test]
    fn test_case_name_parse() {
        let parsed = CaseName::parse("s-128-16");
        assert_eq!(parsed.model_type, Some(ModelType::S));
        assert_eq!(parsed.batch_size, 128);
        assert_eq!(parsed.patch_size, 16);
    }
}
