//! Per-function breakpoint memory.
//!
//! Breakpoints belong to a function name, not to a window: closing an
//! editor and later tracing the same function brings them back. Nothing is
//! persisted across runs.

use std::collections::{BTreeMap, BTreeSet};

/// Remembered breakpoint lines keyed by function name.
#[derive(Debug, Default, Clone)]
pub struct BreakpointRegistry {
    by_function: BTreeMap<String, BTreeSet<usize>>,
}

impl BreakpointRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the current set for `function`.
    pub fn record(&mut self, function: &str, lines: &BTreeSet<usize>) {
        self.by_function.insert(function.to_string(), lines.clone());
    }

    /// Remembered set, if any.
    pub fn get(&self, function: &str) -> Option<&BTreeSet<usize>> {
        self.by_function.get(function)
    }

    /// Breakpoints a newly opened window for `function` should show.
    ///
    /// A remembered set wins over the interpreter's list; otherwise the
    /// interpreter's list seeds the registry. Lines at or past `line_count`
    /// are dropped either way.
    pub fn resolve(&mut self, function: &str, reported: &[usize], line_count: usize) -> BTreeSet<usize> {
        let lines: BTreeSet<usize> = match self.by_function.get(function) {
            Some(known) => known.iter().copied().filter(|&l| l < line_count).collect(),
            None => reported.iter().copied().filter(|&l| l < line_count).collect(),
        };
        self.record(function, &lines);
        lines
    }

    /// Number of functions with remembered breakpoints.
    pub fn len(&self) -> usize {
        self.by_function.values().filter(|set| !set.is_empty()).count()
    }

    /// True when no function has breakpoints.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_wins_over_reported() {
        let mut reg = BreakpointRegistry::new();
        reg.record("B", &[1].into_iter().collect());
        let lines = reg.resolve("B", &[], 3);
        assert_eq!(lines.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_reported_seeds_unknown_function() {
        let mut reg = BreakpointRegistry::new();
        let lines = reg.resolve("F", &[0, 2, 5], 3);
        assert_eq!(lines.iter().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(reg.get("F"), Some(&lines));
    }

    #[test]
    fn test_resolve_clamps_to_shorter_source() {
        let mut reg = BreakpointRegistry::new();
        reg.record("G", &[0, 4].into_iter().collect());
        let lines = reg.resolve("G", &[], 2);
        assert_eq!(lines.into_iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(reg.len(), 1);
    }
}
