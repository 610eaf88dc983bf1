//! Cascading-failure propagation across the asset dependency graph.
//!
//! Assets form a directed graph: an edge from an asset to one of its
//! upstream dependencies means a failure of the dependency can cascade
//! into the asset. The graph is stored as an adjacency list over asset
//! indices; dependency ids that do not resolve to a supplied asset are
//! dropped at construction. Cycles are tolerated: propagation is bounded
//! by a fixed round cap, not by convergence.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::Rng;

use crate::types::Asset;

/// Maximum relaxation rounds per trial.
pub const MAX_PROPAGATION_ROUNDS: usize = 5;

/// Dependency adjacency over asset indices.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// deps[i] holds the indices of asset i's upstream dependencies.
    deps: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Build the graph from the asset list. Unresolved dependency ids
    /// are ignored.
    pub fn from_assets(assets: &[Asset]) -> Self {
        let index: HashMap<&str, usize> = assets
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.as_str(), i))
            .collect();

        let deps = assets
            .iter()
            .map(|a| {
                a.dependencies
                    .as_deref()
                    .unwrap_or(&[])
                    .iter()
                    .filter_map(|id| index.get(id.as_str()).copied())
                    .collect()
            })
            .collect();

        DependencyGraph { deps }
    }

    /// Whether any asset carries a resolved dependency edge.
    pub fn has_edges(&self) -> bool {
        self.deps.iter().any(|d| !d.is_empty())
    }

    /// Propagate failures through the graph, mutating `triggered` in
    /// place. Runs at most [`MAX_PROPAGATION_ROUNDS`] rounds and stops
    /// early once a round produces no new trigger. Triggers added
    /// within a round are visible to assets examined later in the same
    /// round.
    pub fn propagate(&self, triggered: &mut [bool], contagion_factor: f64, rng: &mut StdRng) {
        for _ in 0..MAX_PROPAGATION_ROUNDS {
            let mut changed = false;
            for i in 0..self.deps.len() {
                if triggered[i] || self.deps[i].is_empty() {
                    continue;
                }
                let triggered_deps = self.deps[i].iter().filter(|&&d| triggered[d]).count();
                if triggered_deps == 0 {
                    continue;
                }
                let p = propagation_probability(contagion_factor, triggered_deps);
                if rng.gen::<f64>() < p {
                    triggered[i] = true;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }
}

/// Probability that an asset with `triggered_deps` failed upstream
/// dependencies is dragged down this round. Strictly increasing in the
/// dependency count, saturating toward `contagion_factor`.
pub fn propagation_probability(contagion_factor: f64, triggered_deps: usize) -> f64 {
    contagion_factor * (1.0 - 0.5_f64.powi(triggered_deps as i32))
}
