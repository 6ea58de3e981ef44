//! Exclusion of structurally unusable regressors

use super::scoring::POINTS_COLUMN;

/// Columns that are almost entirely missing for batters (knuckleball and
/// stolen-base-against pitch metrics) or are the response itself.
pub const DEFAULT_EXCLUDED_COLUMNS: [&str; 10] = [
    POINTS_COLUMN,
    "SB-X (pi)",
    "wSB/C (pi)",
    "KN% (pi)",
    "KN%",
    "XX% (pi)",
    "KN% (sc)",
    "CS% (pi)",
    "vSB (pi)",
    "SB% (pi)",
];

/// A set of column names that must never be used as regressors.
///
/// Keeps insertion order so it can be echoed back in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    names: Vec<String>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_COLUMNS)
    }
}

impl ExclusionSet {
    pub fn empty() -> Self {
        Self { names: Vec::new() }
    }

    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::empty();
        set.extend(names);
        set
    }

    /// Add a name; duplicates are ignored.
    pub fn insert(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.insert(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Remove excluded names from `candidates`, keeping the remaining order.
    pub fn apply(&self, candidates: &[String]) -> Vec<String> {
        candidates
            .iter()
            .filter(|name| !self.contains(name))
            .cloned()
            .collect()
    }

    /// Excluded names that actually occur in `candidates`.
    pub fn matched(&self, candidates: &[String]) -> Vec<String> {
        candidates
            .iter()
            .filter(|name| self.contains(name))
            .cloned()
            .collect()
    }
}
