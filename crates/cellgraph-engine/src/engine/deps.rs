//! Dependency graph between named nodes.
//!
//! An edge `s → t` means "t depends on s": `t` is a *dependent* of `s` and `s`
//! is a *dependee* of `t`. The graph knows nothing about formulas or cells and
//! does not reject cycles or self-loops; cycle policy belongs to the sheet.
//!
//! # Invariants
//!
//! 1. `t ∈ dependents[s]` iff `s ∈ dependees[t]`.
//! 2. Empty sets are removed, never stored.
//! 3. `size` equals the number of distinct edges.

use std::collections::{HashMap, HashSet};

#[derive(Default, Debug, Clone)]
pub struct DependencyGraph {
    /// s -> {t : s → t}
    dependents: HashMap<String, HashSet<String>>,
    /// t -> {s : s → t}
    dependees: HashMap<String, HashSet<String>>,
    size: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct edges.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// True if `node` has at least one dependent (outgoing edge).
    pub fn has_dependents(&self, node: &str) -> bool {
        self.dependents.contains_key(node)
    }

    /// True if `node` has at least one dependee (incoming edge).
    pub fn has_dependees(&self, node: &str) -> bool {
        self.dependees.contains_key(node)
    }

    /// Nodes that depend on `node`. Empty for unknown nodes.
    pub fn dependents<'a>(&'a self, node: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.dependents
            .get(node)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Nodes that `node` depends on. Empty for unknown nodes.
    pub fn dependees<'a>(&'a self, node: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.dependees
            .get(node)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Owned copy of the dependents of `node`.
    pub fn get_dependents(&self, node: &str) -> HashSet<String> {
        self.dependents.get(node).cloned().unwrap_or_default()
    }

    /// Owned copy of the dependees of `node`.
    pub fn get_dependees(&self, node: &str) -> HashSet<String> {
        self.dependees.get(node).cloned().unwrap_or_default()
    }

    /// Add the edge `dependee → dependent`. No-op if it already exists.
    pub fn add_dependency(&mut self, dependee: &str, dependent: &str) {
        let inserted = self
            .dependents
            .entry(dependee.to_string())
            .or_default()
            .insert(dependent.to_string());
        if inserted {
            self.dependees
                .entry(dependent.to_string())
                .or_default()
                .insert(dependee.to_string());
            self.size += 1;
        }
    }

    /// Remove the edge `dependee → dependent`. No-op if it is absent.
    pub fn remove_dependency(&mut self, dependee: &str, dependent: &str) {
        let removed = remove_from(&mut self.dependents, dependee, dependent);
        if removed {
            remove_from(&mut self.dependees, dependent, dependee);
            self.size -= 1;
        }
    }

    /// Replace every outgoing edge of `node` with edges to `new_dependents`.
    pub fn replace_dependents<I, S>(&mut self, node: &str, new_dependents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(old) = self.dependents.remove(node) {
            self.size -= old.len();
            for dependent in old {
                remove_from(&mut self.dependees, &dependent, node);
            }
        }
        for dependent in new_dependents {
            let dependent: String = dependent.into();
            self.add_dependency(node, &dependent);
        }
    }

    /// Replace every incoming edge of `node` with edges from `new_dependees`.
    pub fn replace_dependees<I, S>(&mut self, node: &str, new_dependees: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(old) = self.dependees.remove(node) {
            self.size -= old.len();
            for dependee in old {
                remove_from(&mut self.dependents, &dependee, node);
            }
        }
        for dependee in new_dependees {
            let dependee: String = dependee.into();
            self.add_dependency(&dependee, node);
        }
    }

    /// Check all invariants. Panics if any are violated.
    #[cfg(test)]
    pub fn assert_consistent(&self) {
        let mut edges = 0;
        for (from, targets) in &self.dependents {
            assert!(!targets.is_empty(), "empty dependents set stored for {from}");
            for to in targets {
                assert!(
                    self.dependees.get(to).is_some_and(|s| s.contains(from)),
                    "missing dependee edge {from} -> {to}"
                );
            }
            edges += targets.len();
        }
        for (to, sources) in &self.dependees {
            assert!(!sources.is_empty(), "empty dependees set stored for {to}");
            for from in sources {
                assert!(
                    self.dependents.get(from).is_some_and(|s| s.contains(to)),
                    "missing dependent edge {from} -> {to}"
                );
            }
        }
        assert_eq!(edges, self.size, "cached size out of sync");
    }
}

/// Remove `value` from `map[key]`, dropping the set once it is empty.
fn remove_from(map: &mut HashMap<String, HashSet<String>>, key: &str, value: &str) -> bool {
    let Some(set) = map.get_mut(key) else {
        return false;
    };
    let removed = set.remove(value);
    if set.is_empty() {
        map.remove(key);
    }
    removed
}
