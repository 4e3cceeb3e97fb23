// Copyright (c) 2025 - Cowboy AI, Inc.
//! Unit Dependency Graph
//!
//! Directed graph over unit names built from explicitly declared
//! `depends_on` edges. An edge A → B reads "A requires a capability produced
//! by B", so B must be constructed first. Ordering and cycle detection are
//! pure functions: deterministic, no side effects, nothing external
//! consulted.
//!
//! Determinism: ties in the topological order are broken by unit declaration
//! order, so the same unit list and edges always produce the same
//! construction order.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::domain::UnitName;
use crate::errors::{CompositionError, CompositionResult};

/// Dependency graph over deployable units
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Units in declaration order
    nodes: Vec<UnitName>,
    /// Name → declaration index
    index: BTreeMap<UnitName, usize>,
    /// deps[i] = indices of units node i depends on
    deps: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Build a graph from units and their declared dependency edges
    ///
    /// # Errors
    /// - [`CompositionError::DuplicateUnit`] if a name appears twice
    /// - [`CompositionError::UnknownUnit`] if an edge targets an unadded unit
    pub fn build(units: &[(UnitName, Vec<UnitName>)]) -> CompositionResult<Self> {
        let mut index = BTreeMap::new();
        let mut nodes = Vec::with_capacity(units.len());

        for (i, (name, _)) in units.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(CompositionError::DuplicateUnit(name.clone()));
            }
            nodes.push(name.clone());
        }

        let mut deps = vec![Vec::new(); units.len()];
        for (i, (name, depends_on)) in units.iter().enumerate() {
            for dep in depends_on {
                let Some(&j) = index.get(dep) else {
                    return Err(CompositionError::UnknownUnit {
                        unit: dep.clone(),
                        declared_by: name.clone(),
                    });
                };
                // Self-edges are the degenerate one-node cycle.
                if j == i {
                    return Err(CompositionError::CyclicDependency {
                        cycle: vec![name.clone(), name.clone()],
                    });
                }
                if !deps[i].contains(&j) {
                    deps[i].push(j);
                }
            }
        }

        Ok(Self { nodes, index, deps })
    }

    /// Units in declaration order
    pub fn units(&self) -> &[UnitName] {
        &self.nodes
    }

    /// Declared dependencies of a unit
    pub fn dependencies_of(&self, name: &UnitName) -> Option<Vec<&UnitName>> {
        let &i = self.index.get(name)?;
        Some(self.deps[i].iter().map(|&j| &self.nodes[j]).collect())
    }

    /// Whether `unit` declared a dependency on `dep`
    pub fn depends_on(&self, unit: &UnitName, dep: &UnitName) -> bool {
        match (self.index.get(unit), self.index.get(dep)) {
            (Some(&i), Some(&j)) => self.deps[i].contains(&j),
            _ => false,
        }
    }

    /// Deterministic construction order: dependencies before dependents
    ///
    /// Kahn's algorithm with ties broken by declaration order.
    ///
    /// # Errors
    /// [`CompositionError::CyclicDependency`] carrying one cycle path if the
    /// graph is not acyclic.
    pub fn topological_order(&self) -> CompositionResult<Vec<UnitName>> {
        let n = self.nodes.len();

        // dependents[j] = nodes that must wait for j
        let mut dependents = vec![Vec::new(); n];
        let mut pending = vec![0usize; n];
        for (i, deps) in self.deps.iter().enumerate() {
            pending[i] = deps.len();
            for &j in deps {
                dependents[j].push(i);
            }
        }

        // Min-heap on declaration index keeps the order deterministic.
        let mut ready: BinaryHeap<Reverse<usize>> = pending
            .iter()
            .enumerate()
            .filter(|(_, &count)| count == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(i)) = ready.pop() {
            order.push(self.nodes[i].clone());
            for &dependent in &dependents[i] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() < n {
            return Err(CompositionError::CyclicDependency {
                cycle: self.find_cycle(&pending),
            });
        }

        Ok(order)
    }

    /// Walk dependency edges among unresolved nodes until one repeats
    fn find_cycle(&self, pending: &[usize]) -> Vec<UnitName> {
        let start = pending
            .iter()
            .position(|&count| count > 0)
            .expect("find_cycle called without unresolved nodes");

        let mut seen_at: BTreeMap<usize, usize> = BTreeMap::new();
        let mut path: Vec<usize> = Vec::new();
        let mut current = start;

        loop {
            if let Some(&first) = seen_at.get(&current) {
                let mut cycle: Vec<UnitName> = path[first..]
                    .iter()
                    .map(|&i| self.nodes[i].clone())
                    .collect();
                cycle.push(self.nodes[current].clone());
                return cycle;
            }
            seen_at.insert(current, path.len());
            path.push(current);

            // Every unresolved node still has an unresolved dependency,
            // so the walk stays inside the cyclic region and must repeat.
            current = self.deps[current]
                .iter()
                .copied()
                .find(|&j| pending[j] > 0)
                .expect("unresolved node without unresolved dependency");
        }
    }
}
