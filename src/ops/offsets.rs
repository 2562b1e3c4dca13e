// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Parallel-edge slot assignment.
//!
//! Edges between the same unordered node pair `{a, b}` get `edge_index = 0..k` in store order
//! and `total_edges = k`, which the renderer turns into a symmetric fan-out via
//! [`crate::model::visual_offset`]. Edges of other pairs are never touched.

use std::collections::HashMap;

use crate::model::{EdgeId, NodeId, RelationshipEdge};

/// Whether any edge of `{a, b}` holds a slot that differs from what a recompute would assign.
pub fn pair_needs_recompute(edges: &[RelationshipEdge], a: &NodeId, b: &NodeId) -> bool {
    let total = edges.iter().filter(|edge| edge.connects(a, b)).count();
    edges
        .iter()
        .filter(|edge| edge.connects(a, b))
        .enumerate()
        .any(|(index, edge)| edge.edge_index() != index || edge.total_edges() != total)
}

/// Re-packs the slots of every edge between `a` and `b`. Returns the ids whose slot changed.
pub fn recompute_pair(edges: &mut [RelationshipEdge], a: &NodeId, b: &NodeId) -> Vec<EdgeId> {
    let total = edges.iter().filter(|edge| edge.connects(a, b)).count();
    let mut changed = Vec::new();
    for (index, edge) in edges
        .iter_mut()
        .filter(|edge| edge.connects(a, b))
        .enumerate()
    {
        if edge.edge_index() != index || edge.total_edges() != total {
            edge.set_offset_slot(index, total);
            changed.push(edge.id().clone());
        }
    }
    changed
}

/// Recomputes the slots of every pair in one pass.
pub fn recompute_all(edges: &mut [RelationshipEdge]) {
    let mut totals: HashMap<(NodeId, NodeId), usize> = HashMap::new();
    for edge in edges.iter() {
        *totals.entry(pair_key(edge)).or_default() += 1;
    }

    let mut next_index: HashMap<(NodeId, NodeId), usize> = HashMap::with_capacity(totals.len());
    for edge in edges.iter_mut() {
        let key = pair_key(edge);
        let total = totals.get(&key).copied().unwrap_or(1);
        let slot = next_index.entry(key).or_default();
        edge.set_offset_slot(*slot, total);
        *slot += 1;
    }
}

/// Checks the slot invariant for every pair: indices form `0..k` in store order with
/// `total_edges == k`.
pub fn offsets_are_consistent(edges: &[RelationshipEdge]) -> bool {
    let mut totals: HashMap<(NodeId, NodeId), usize> = HashMap::new();
    for edge in edges {
        *totals.entry(pair_key(edge)).or_default() += 1;
    }

    let mut seen: HashMap<(NodeId, NodeId), usize> = HashMap::with_capacity(totals.len());
    edges.iter().all(|edge| {
        let key = pair_key(edge);
        let total = totals.get(&key).copied().unwrap_or(0);
        let slot = seen.entry(key).or_default();
        let ok = edge.edge_index() == *slot && edge.total_edges() == total;
        *slot += 1;
        ok
    })
}

fn pair_key(edge: &RelationshipEdge) -> (NodeId, NodeId) {
    let (a, b) = (edge.source(), edge.target());
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}
