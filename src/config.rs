//! Configuration parameters for route planning.

use crate::construction::Construction;
use crate::error::Result;
use crate::local_search::AcceptanceGate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Which refinement a pipeline applies after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Refinement {
    /// Keep the constructed order as is.
    None,
    /// 2-opt accepting every strictly improving reversal.
    TwoOpt,
    /// 2-opt filtered through `Config::cluster_gate`.
    GatedTwoOpt,
}

/// One candidate pipeline: construction, refinement and optional flow clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub name: String,
    pub description: String,
    pub construction: Construction,
    pub refinement: Refinement,
    /// Haversine radius in metres for the sequence-flow pass, if any.
    pub flow_radius: Option<f64>,
}

impl PipelineSpec {
    pub fn new(
        name: &str,
        description: &str,
        construction: Construction,
        refinement: Refinement,
        flow_radius: Option<f64>,
    ) -> Self {
        PipelineSpec {
            name: name.to_string(),
            description: description.to_string(),
            construction,
            refinement,
            flow_radius,
        }
    }

    /// The pipelines offered when nothing else is configured.
    pub fn default_set() -> Vec<PipelineSpec> {
        vec![
            PipelineSpec::new(
                "Optimized Distance (Tight Clusters)",
                "Prioritizes shortest distance with tight geographic grouping",
                Construction::NearestNeighbor,
                Refinement::TwoOpt,
                Some(1500.0),
            ),
            PipelineSpec::new(
                "Balanced Flow (Medium Clusters)",
                "Balances distance and logical sequence flow",
                Construction::FarthestInsertion,
                Refinement::TwoOpt,
                Some(2500.0),
            ),
            PipelineSpec::new(
                "Sequence Flow (Loose Clusters)",
                "Prioritizes smooth sequence flow over distance",
                Construction::RandomizedNearestNeighbor,
                Refinement::TwoOpt,
                Some(3500.0),
            ),
            PipelineSpec::new(
                "Geographic Order",
                "Simple distance-based ordering with clustering",
                Construction::GeographicSort,
                Refinement::TwoOpt,
                Some(2000.0),
            ),
            PipelineSpec::new(
                "Cluster-Aware Greedy",
                "Visits dense groups of stops together, ordering small groups optimally",
                Construction::ClusterAwareGreedy,
                Refinement::GatedTwoOpt,
                None,
            ),
        ]
    }
}

/// Configuration settings for the route optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Restarts of the randomized nearest-neighbor construction
    pub randomized_trials: usize,
    /// Seed of the request-scoped random source
    pub seed: u64,
    /// Maximum number of full 2-opt passes
    pub two_opt_max_passes: usize,
    /// Cost-matrix distance under which points form a micro-cluster
    pub micro_cluster_threshold: f64,
    /// Cost-matrix distance under which remaining points form a regular cluster
    pub regular_cluster_threshold: f64,
    /// Largest cluster ordered by exhaustive permutation search
    pub exhaustive_cluster_limit: usize,
    /// Acceptance gate of the gated 2-opt refinement
    pub cluster_gate: AcceptanceGate,
    /// Candidate pipelines, in declaration order
    pub pipelines: Vec<PipelineSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            randomized_trials: 10,
            seed: 42,
            two_opt_max_passes: 100,
            micro_cluster_threshold: 500.0,
            regular_cluster_threshold: 2000.0,
            exhaustive_cluster_limit: 8,
            cluster_gate: AcceptanceGate::new(50.0, Some(1000.0)),
            pipelines: PipelineSpec::default_set(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Load a configuration from a JSON file; absent fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Set the number of randomized nearest-neighbor trials.
    pub fn with_randomized_trials(mut self, trials: usize) -> Self {
        self.randomized_trials = trials;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the 2-opt pass cap.
    pub fn with_two_opt_max_passes(mut self, passes: usize) -> Self {
        self.two_opt_max_passes = passes;
        self
    }

    /// Set the micro and regular cluster thresholds.
    pub fn with_cluster_thresholds(mut self, micro: f64, regular: f64) -> Self {
        self.micro_cluster_threshold = micro;
        self.regular_cluster_threshold = regular;
        self
    }

    /// Set the largest cluster ordered exhaustively.
    pub fn with_exhaustive_cluster_limit(mut self, limit: usize) -> Self {
        self.exhaustive_cluster_limit = limit;
        self
    }

    /// Set the acceptance gate of the gated 2-opt.
    pub fn with_cluster_gate(mut self, gate: AcceptanceGate) -> Self {
        self.cluster_gate = gate;
        self
    }

    /// Replace the pipeline table.
    pub fn with_pipelines(mut self, pipelines: Vec<PipelineSpec>) -> Self {
        self.pipelines = pipelines;
        self
    }
}
