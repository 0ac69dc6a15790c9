//! Attributed directed dependency graph.
//!
//! Vertices are keyed by [`VertexId`] and edges by their `(source, target)`
//! pair, so at most one edge exists per ordered pair. All iteration goes
//! through `BTreeMap`/`BTreeSet` and is therefore deterministic.
//!
//! ## Invariants
//!
//! - Every edge's source and target are present in the vertex map
//! - Adjacency sets mirror the edge map exactly

mod gather;
mod merge;

pub use gather::GraphRelation;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::canonical::canonical_hash_hex;
use crate::types::{Attribute, EdgeInfo, VertexId, VertexInfo};

/// Errors raised by graph construction and merging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Two vertices with different identity keys were asked to unify.
    #[error("cannot unify vertex {existing} with vertex {incoming}: identity keys differ")]
    IdentityMismatch {
        /// Vertex already in the graph.
        existing: VertexId,
        /// Vertex being merged in.
        incoming: VertexId,
    },

    /// An edge endpoint is not a vertex of the graph.
    #[error("vertex not found in graph: {0}")]
    UnknownVertex(VertexId),

    /// An explicit relation names a vertex that is absent from the graph.
    #[error("relation {side} {path} not found in graph")]
    RelationEndpointMissing {
        /// `from` or `to`.
        side: &'static str,
        /// Missing identity.
        path: VertexId,
    },
}

/// A directed graph of attributed module vertices and dependency edges.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsGraph {
    vertices: BTreeMap<VertexId, VertexInfo>,
    edges: BTreeMap<(VertexId, VertexId), EdgeInfo>,
    /// Source -> targets.
    outgoing: BTreeMap<VertexId, BTreeSet<VertexId>>,
    /// Target -> sources.
    incoming: BTreeMap<VertexId, BTreeSet<VertexId>>,
}

impl AnalyticsGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex. Returns `false` (and changes nothing) if the identity exists.
    pub fn add_vertex(&mut self, vertex: VertexInfo) -> bool {
        if self.vertices.contains_key(vertex.path()) {
            return false;
        }
        self.vertices.insert(vertex.path().clone(), vertex);
        true
    }

    /// Add an edge. Returns `false` (and changes nothing) if the pair exists.
    ///
    /// Fails if either endpoint is not a vertex of this graph.
    pub fn add_edge(&mut self, edge: EdgeInfo) -> Result<bool, GraphError> {
        for endpoint in [edge.source(), edge.target()] {
            if !self.vertices.contains_key(endpoint) {
                return Err(GraphError::UnknownVertex(endpoint.clone()));
            }
        }
        let key = edge.key();
        if self.edges.contains_key(&key) {
            return Ok(false);
        }
        self.outgoing
            .entry(edge.source().clone())
            .or_default()
            .insert(edge.target().clone());
        self.incoming
            .entry(edge.target().clone())
            .or_default()
            .insert(edge.source().clone());
        self.edges.insert(key, edge);
        Ok(true)
    }

    /// Remove the edge `source -> target`, returning it if present.
    pub fn remove_edge(&mut self, source: &VertexId, target: &VertexId) -> Option<EdgeInfo> {
        let removed = self.edges.remove(&(source.clone(), target.clone()))?;
        if let Some(targets) = self.outgoing.get_mut(source) {
            targets.remove(target);
        }
        if let Some(sources) = self.incoming.get_mut(target) {
            sources.remove(source);
        }
        Some(removed)
    }

    /// Whether the vertex exists.
    pub fn contains_vertex(&self, id: &VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    /// Get a vertex by identity.
    pub fn vertex(&self, id: &VertexId) -> Option<&VertexInfo> {
        self.vertices.get(id)
    }

    /// Attributes of a vertex, for in-place updates.
    ///
    /// Only the attribute map is handed out: the identity key of a stored
    /// vertex cannot change.
    pub fn vertex_attributes_mut(&mut self, id: &VertexId) -> Option<&mut BTreeMap<String, Attribute>> {
        self.vertices.get_mut(id).map(|vertex| &mut vertex.attributes)
    }

    /// Find a vertex by its module path.
    pub fn find_vertex(&self, path: &str) -> Option<&VertexInfo> {
        self.vertices.get(&VertexId::new(path))
    }

    /// Get the edge `source -> target`.
    pub fn edge(&self, source: &VertexId, target: &VertexId) -> Option<&EdgeInfo> {
        self.edges.get(&(source.clone(), target.clone()))
    }

    /// Attributes of the edge `source -> target`, for in-place updates.
    pub fn edge_attributes_mut(
        &mut self,
        source: &VertexId,
        target: &VertexId,
    ) -> Option<&mut BTreeMap<String, Attribute>> {
        self.edges
            .get_mut(&(source.clone(), target.clone()))
            .map(|edge| &mut edge.attributes)
    }

    /// All vertices, ordered by identity.
    pub fn vertices(&self) -> impl Iterator<Item = &VertexInfo> {
        self.vertices.values()
    }

    /// All vertex identities, ordered.
    pub fn vertex_ids(&self) -> impl Iterator<Item = &VertexId> {
        self.vertices.keys()
    }

    /// All edges, ordered by (source, target).
    pub fn edges(&self) -> impl Iterator<Item = &EdgeInfo> {
        self.edges.values()
    }

    /// Targets of the outgoing edges of `id`, ordered.
    pub fn successors<'a>(&'a self, id: &VertexId) -> impl Iterator<Item = &'a VertexId> + 'a {
        self.outgoing.get(id).into_iter().flatten()
    }

    /// Sources of the incoming edges of `id`, ordered.
    pub fn predecessors<'a>(&'a self, id: &VertexId) -> impl Iterator<Item = &'a VertexId> + 'a {
        self.incoming.get(id).into_iter().flatten()
    }

    /// Outgoing edges of `id`, ordered by target.
    pub fn outgoing_edges<'a>(&'a self, id: &'a VertexId) -> impl Iterator<Item = &'a EdgeInfo> + 'a {
        self.successors(id)
            .filter_map(move |target| self.edges.get(&(id.clone(), target.clone())))
    }

    /// Incoming edges of `id`, ordered by source.
    pub fn incoming_edges<'a>(&'a self, id: &'a VertexId) -> impl Iterator<Item = &'a EdgeInfo> + 'a {
        self.predecessors(id)
            .filter_map(move |source| self.edges.get(&(source.clone(), id.clone())))
    }

    /// Number of outgoing edges (a self-loop counts once).
    pub fn out_degree(&self, id: &VertexId) -> usize {
        self.outgoing.get(id).map_or(0, BTreeSet::len)
    }

    /// Number of incoming edges (a self-loop counts once).
    pub fn in_degree(&self, id: &VertexId) -> usize {
        self.incoming.get(id).map_or(0, BTreeSet::len)
    }

    /// Total degree: incoming plus outgoing (a self-loop counts twice).
    pub fn degree(&self, id: &VertexId) -> usize {
        self.in_degree(id) + self.out_degree(id)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Content fingerprint over vertices, edges and all typed attributes.
    ///
    /// Two graphs with the same content produce the same fingerprint
    /// regardless of insertion order.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct Canonical<'a> {
            vertices: Vec<&'a VertexInfo>,
            edges: Vec<&'a EdgeInfo>,
        }

        canonical_hash_hex(&Canonical {
            vertices: self.vertices.values().collect(),
            edges: self.edges.values().collect(),
        })
    }
}
