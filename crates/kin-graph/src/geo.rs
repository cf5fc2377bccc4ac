//! The geo-distance graph.
//!
//! An undirected graph keyed by person id, weighted by great-circle
//! distance in kilometers. The graph is logically complete: after
//! [`DistanceGraph::rebuild_edges`] every pair of present nodes has a
//! weight. There is no incremental per-node update path; a coordinate
//! change means remove, re-add, and rebuild.

use kin_core::GeoCoordinates;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Mean Earth radius in kilometers, for the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Sentinel returned by [`DistanceGraph::distance_between`] when no
/// edge is stored. Distinguishes "not computed" from a legitimate zero
/// distance between coincident coordinates.
pub const NO_EDGE: f64 = -1.0;

/// A node in the distance graph: a person id plus its own snapshot of
/// the residence coordinates (copied from the person record, never
/// aliased into it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoNode {
    pub person_id: String,
    pub coordinates: GeoCoordinates,
}

/// Great-circle distance between two coordinates, in kilometers.
///
/// Haversine formula over [`EARTH_RADIUS_KM`]; inputs in degrees.
/// Symmetric, and zero for identical coordinates.
pub fn haversine_km(a: &GeoCoordinates, b: &GeoCoordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Complete weighted graph over member residences.
#[derive(Debug, Default)]
pub struct DistanceGraph {
    nodes: HashMap<String, GeoNode>,
    /// Adjacency rows: id -> (neighbor id -> distance in km).
    adjacency: HashMap<String, HashMap<String, f64>>,
}

impl DistanceGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node with its coordinate snapshot.
    ///
    /// First write wins: a second add for the same id is silently
    /// ignored, even with different coordinates. Callers update a
    /// node by removing and re-adding it.
    pub fn add_node(&mut self, person_id: impl Into<String>, coordinates: GeoCoordinates) {
        let person_id = person_id.into();
        if self.nodes.contains_key(&person_id) {
            return;
        }
        self.adjacency.insert(person_id.clone(), HashMap::new());
        self.nodes.insert(
            person_id.clone(),
            GeoNode {
                person_id,
                coordinates,
            },
        );
    }

    /// Stores an edge weight symmetrically between two present nodes.
    ///
    /// No-op unless both ids are already nodes.
    pub fn add_edge(&mut self, id1: &str, id2: &str, distance_km: f64) {
        if !self.adjacency.contains_key(id1) || !self.adjacency.contains_key(id2) {
            return;
        }
        if let Some(row) = self.adjacency.get_mut(id1) {
            row.insert(id2.to_owned(), distance_km);
        }
        if let Some(row) = self.adjacency.get_mut(id2) {
            row.insert(id1.to_owned(), distance_km);
        }
    }

    /// Recomputes every pairwise distance, overwriting all stored
    /// weights. O(n²) in the node count; this is the only way the graph
    /// reaches bulk consistency after coordinates change.
    pub fn rebuild_edges(&mut self) {
        let ids: Vec<String> = self.nodes.keys().cloned().collect();

        for id1 in &ids {
            let Some(row) = self.adjacency.get_mut(id1) else {
                continue;
            };
            row.clear();

            for id2 in &ids {
                if id1 == id2 {
                    continue;
                }
                let km = haversine_km(&self.nodes[id1].coordinates, &self.nodes[id2].coordinates);
                row.insert(id2.clone(), km);
            }
        }

        debug!("rebuilt distance edges for {} nodes", ids.len());
    }

    /// Snapshot copy of the adjacency row for an id. Empty for unknown
    /// ids, never an error.
    pub fn distances_from(&self, person_id: &str) -> HashMap<String, f64> {
        self.adjacency.get(person_id).cloned().unwrap_or_default()
    }

    /// Defensive copy of all nodes.
    pub fn nodes(&self) -> HashMap<String, GeoNode> {
        self.nodes.clone()
    }

    /// Removes a node, its adjacency row, and its key from every other
    /// row. No-op if absent.
    pub fn remove_node(&mut self, person_id: &str) {
        if self.nodes.remove(person_id).is_none() {
            return;
        }
        self.adjacency.remove(person_id);
        for row in self.adjacency.values_mut() {
            row.remove(person_id);
        }
    }

    /// The stored weight between two nodes, or [`NO_EDGE`] if no edge
    /// exists.
    pub fn distance_between(&self, id1: &str, id2: &str) -> f64 {
        self.adjacency
            .get(id1)
            .and_then(|row| row.get(id2))
            .copied()
            .unwrap_or(NO_EDGE)
    }

    /// Number of present nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
