// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Edge store: connect, label/type edits, and deletion. Every change to the set of edges
//! between a node pair is followed by an offset recompute for that pair.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::{Diagram, EdgeId, NodeId, RelationshipEdge, RelationshipType};

use super::{offsets, prune_selection, DeltaBuilder, ObjectRef};

/// A finished connect gesture, as reported by the rendering layer.
///
/// Endpoints are raw ids; an absent or empty endpoint means the gesture was released over
/// nothing and the connection is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    pub source: Option<String>,
    pub target: Option<String>,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn with_handles(
        mut self,
        source_handle: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        self.source_handle = Some(source_handle.into());
        self.target_handle = Some(target_handle.into());
        self
    }
}

pub(super) fn connect(
    diagram: &mut Diagram,
    connection: Connection,
    delta: &mut DeltaBuilder,
) -> Option<EdgeId> {
    let source = connection.source.and_then(|raw| NodeId::new(raw).ok())?;
    let target = connection.target.and_then(|raw| NodeId::new(raw).ok())?;
    if diagram.node(&source).is_none() || diagram.node(&target).is_none() {
        return None;
    }

    let edge_id = unique_edge_id(
        diagram,
        &source,
        &target,
        connection.source_handle.as_deref(),
        connection.target_handle.as_deref(),
    );
    let edge = RelationshipEdge::new(edge_id.clone(), source.clone(), target.clone())
        .with_handles(connection.source_handle, connection.target_handle);
    diagram.edges_mut().push(edge);
    delta.record_added(ObjectRef::Edge(edge_id.clone()));

    recompute_pair(diagram, &source, &target, delta);
    Some(edge_id)
}

pub(super) fn update_label(
    diagram: &mut Diagram,
    edge_id: &EdgeId,
    label: String,
    delta: &mut DeltaBuilder,
) {
    match diagram.edge(edge_id) {
        Some(edge) if edge.label() != label => {}
        _ => return,
    }
    if let Some(edge) = diagram.edge_mut(edge_id) {
        edge.set_label(label);
        delta.record_updated(ObjectRef::Edge(edge_id.clone()));
    }
}

pub(super) fn update_relationship_type(
    diagram: &mut Diagram,
    edge_id: &EdgeId,
    relationship_type: RelationshipType,
    delta: &mut DeltaBuilder,
) {
    match diagram.edge(edge_id) {
        Some(edge) if edge.relationship_type() != relationship_type => {}
        _ => return,
    }
    if let Some(edge) = diagram.edge_mut(edge_id) {
        edge.set_relationship_type(relationship_type);
        delta.record_updated(ObjectRef::Edge(edge_id.clone()));
    }
}

pub(super) fn delete_edge(diagram: &mut Diagram, edge_id: &EdgeId, delta: &mut DeltaBuilder) {
    let Some(index) = diagram.edges().iter().position(|edge| edge.id() == edge_id) else {
        return;
    };
    let removed = diagram.edges_mut().remove(index);
    delta.record_removed(ObjectRef::Edge(edge_id.clone()));

    recompute_pair(diagram, removed.source(), removed.target(), delta);
    prune_selection(diagram, delta);
}

fn recompute_pair(diagram: &mut Diagram, a: &NodeId, b: &NodeId, delta: &mut DeltaBuilder) {
    let needs_update = offsets::pair_needs_recompute(diagram.edges(), a, b);
    if !needs_update {
        return;
    }
    for edge_id in offsets::recompute_pair(diagram.edges_mut(), a, b) {
        delta.record_updated(ObjectRef::Edge(edge_id));
    }
}

/// Builds `edge-<source><handle>-<target><handle>-<millis>`, suffixed with a counter if an edge
/// with that id already exists (parallel edges created within the same millisecond).
fn unique_edge_id(
    diagram: &Diagram,
    source: &NodeId,
    target: &NodeId,
    source_handle: Option<&str>,
    target_handle: Option<&str>,
) -> EdgeId {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let base = format!(
        "edge-{source}{}-{target}{}-{millis}",
        source_handle.unwrap_or_default(),
        target_handle.unwrap_or_default(),
    );

    let mut candidate = base.clone();
    let mut counter = 1usize;
    while diagram.edges().iter().any(|edge| edge.id().as_str() == candidate) {
        candidate = format!("{base}-{counter}");
        counter += 1;
    }
    EdgeId::from_generated(candidate)
}
