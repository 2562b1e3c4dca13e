// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for diagrams.
//!
//! Every UI event (click, connect gesture, inline edit, key press, rendering-layer change) is
//! expressed as an [`Op`] and applied synchronously. Unknown ids and incomplete connections are
//! silent no-ops: they produce an empty [`Delta`] and leave the revision untouched.

use std::collections::HashSet;

use crate::model::{
    ClassNode, Diagram, EdgeId, NodeFieldsPatch, NodeId, Position, RelationshipEdge,
    RelationshipType, Section, Selection,
};

mod changes;
mod edges;
mod nodes;
pub mod offsets;

pub use changes::{EdgeChange, NodeChange};
pub use edges::Connection;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    AddNode {
        position: Position,
    },
    UpdateNodeFields {
        node_id: NodeId,
        patch: NodeFieldsPatch,
    },
    SetSectionText {
        node_id: NodeId,
        section: Section,
        text: String,
    },
    AddAttribute {
        node_id: NodeId,
        text: Option<String>,
    },
    AddMethod {
        node_id: NodeId,
        text: Option<String>,
    },
    RemoveAttributeAt {
        node_id: NodeId,
        index: usize,
    },
    RemoveMethodAt {
        node_id: NodeId,
        index: usize,
    },
    DeleteNode {
        node_id: NodeId,
    },
    Connect(Connection),
    UpdateEdgeLabel {
        edge_id: EdgeId,
        label: String,
    },
    UpdateRelationshipType {
        edge_id: EdgeId,
        relationship_type: RelationshipType,
    },
    DeleteEdge {
        edge_id: EdgeId,
    },
    SelectSection {
        node_id: NodeId,
        section_index: usize,
    },
    SelectEdge {
        edge_id: Option<EdgeId>,
    },
    ClearSelection,
    /// Re-clamps the section focus to the selected node's current layout.
    ClampSelection,
    NodeChanges(Vec<NodeChange>),
    EdgeChanges(Vec<EdgeChange>),
    Clear,
}

/// A diagram object touched by an op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectRef {
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub rev: u64,
    pub delta: Delta,
}

impl ApplyResult {
    /// Whether persisted content changed (selection-only changes do not count).
    pub fn content_changed(&self) -> bool {
        !self.delta.added.is_empty()
            || !self.delta.removed.is_empty()
            || !self.delta.updated.is_empty()
    }
}

/// Which objects changed as the result of applying ops.
///
/// This is intentionally coarse: it reports only added/removed/updated refs plus whether the
/// selection moved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ObjectRef>,
    pub removed: Vec<ObjectRef>,
    pub updated: Vec<ObjectRef>,
    pub selection_changed: bool,
}

#[derive(Debug, Default)]
pub(crate) struct DeltaBuilder {
    added: HashSet<ObjectRef>,
    removed: HashSet<ObjectRef>,
    updated: HashSet<ObjectRef>,
    selection_changed: bool,
}

impl DeltaBuilder {
    pub(crate) fn record_added(&mut self, object_ref: ObjectRef) {
        self.removed.remove(&object_ref);
        self.updated.remove(&object_ref);
        self.added.insert(object_ref);
    }

    pub(crate) fn record_removed(&mut self, object_ref: ObjectRef) {
        // Added and removed within one batch nets out to nothing.
        if self.added.remove(&object_ref) {
            self.updated.remove(&object_ref);
            return;
        }
        self.updated.remove(&object_ref);
        self.removed.insert(object_ref);
    }

    pub(crate) fn record_updated(&mut self, object_ref: ObjectRef) {
        if self.added.contains(&object_ref) || self.removed.contains(&object_ref) {
            return;
        }
        self.updated.insert(object_ref);
    }

    pub(crate) fn record_selection(&mut self) {
        self.selection_changed = true;
    }

    fn has_content_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.updated.is_empty()
    }

    pub(crate) fn finish(self) -> Delta {
        let mut added = self.added.into_iter().collect::<Vec<_>>();
        let mut removed = self.removed.into_iter().collect::<Vec<_>>();
        let mut updated = self.updated.into_iter().collect::<Vec<_>>();

        added.sort();
        removed.sort();
        updated.sort();

        Delta {
            added,
            removed,
            updated,
            selection_changed: self.selection_changed,
        }
    }
}

pub fn apply_op(diagram: &mut Diagram, op: Op) -> ApplyResult {
    apply_ops(diagram, std::iter::once(op))
}

/// Applies ops in order as one batch. The revision bumps once if any content changed.
pub fn apply_ops(diagram: &mut Diagram, ops: impl IntoIterator<Item = Op>) -> ApplyResult {
    let mut delta = DeltaBuilder::default();
    for op in ops {
        apply_one(diagram, op, &mut delta);
    }

    if delta.has_content_changes() {
        diagram.bump_rev();
    }

    ApplyResult {
        rev: diagram.rev(),
        delta: delta.finish(),
    }
}

fn apply_one(diagram: &mut Diagram, op: Op, delta: &mut DeltaBuilder) {
    match op {
        Op::AddNode { position } => {
            nodes::add_node(diagram, position, delta);
        }
        Op::UpdateNodeFields { node_id, patch } => {
            nodes::update_node_fields(diagram, &node_id, &patch, delta)
        }
        Op::SetSectionText {
            node_id,
            section,
            text,
        } => nodes::set_section_text(diagram, &node_id, section, text, delta),
        Op::AddAttribute { node_id, text } => nodes::add_attribute(diagram, &node_id, text, delta),
        Op::AddMethod { node_id, text } => nodes::add_method(diagram, &node_id, text, delta),
        Op::RemoveAttributeAt { node_id, index } => {
            nodes::remove_attribute_at(diagram, &node_id, index, delta)
        }
        Op::RemoveMethodAt { node_id, index } => {
            nodes::remove_method_at(diagram, &node_id, index, delta)
        }
        Op::DeleteNode { node_id } => nodes::delete_node(diagram, &node_id, delta),
        Op::Connect(connection) => {
            edges::connect(diagram, connection, delta);
        }
        Op::UpdateEdgeLabel { edge_id, label } => {
            edges::update_label(diagram, &edge_id, label, delta)
        }
        Op::UpdateRelationshipType {
            edge_id,
            relationship_type,
        } => edges::update_relationship_type(diagram, &edge_id, relationship_type, delta),
        Op::DeleteEdge { edge_id } => edges::delete_edge(diagram, &edge_id, delta),
        Op::SelectSection {
            node_id,
            section_index,
        } => {
            diagram.select_section(node_id, section_index);
            delta.record_selection();
        }
        Op::SelectEdge { edge_id } => {
            diagram.select_edge(edge_id);
            delta.record_selection();
        }
        Op::ClearSelection => {
            diagram.clear_selection();
            delta.record_selection();
        }
        Op::ClampSelection => clamp_selection(diagram, delta),
        Op::NodeChanges(changes) => changes::apply_node_changes(diagram, changes, delta),
        Op::EdgeChanges(changes) => changes::apply_edge_changes(diagram, changes, delta),
        Op::Clear => clear(diagram, delta),
    }
}

fn clear(diagram: &mut Diagram, delta: &mut DeltaBuilder) {
    for node in diagram.nodes() {
        delta.record_removed(ObjectRef::Node(node.id().clone()));
    }
    for edge in diagram.edges() {
        delta.record_removed(ObjectRef::Edge(edge.id().clone()));
    }
    diagram.nodes_mut().clear();
    diagram.edges_mut().clear();
    diagram.clear_selection();
    delta.record_selection();
}

/// Replaces the diagram contents wholesale (persisted-state reload, text import).
///
/// Node ids are reported to the allocator so it never reissues them, edges whose endpoints are
/// missing are dropped, offsets are recomputed for every pair, and the selection is cleared.
/// Returns the number of dropped edges.
pub fn replace_contents(
    diagram: &mut Diagram,
    nodes: Vec<ClassNode>,
    edges: Vec<RelationshipEdge>,
) -> usize {
    let mut known = HashSet::with_capacity(nodes.len());
    let mut unique_nodes = Vec::with_capacity(nodes.len());
    for node in nodes {
        if known.insert(node.id().clone()) {
            diagram.ids_mut().observe(node.id());
            unique_nodes.push(node);
        }
    }

    let total_edges = edges.len();
    let mut edge_ids = HashSet::with_capacity(total_edges);
    let mut kept_edges = edges
        .into_iter()
        .filter(|edge| known.contains(edge.source()) && known.contains(edge.target()))
        .filter(|edge| edge_ids.insert(edge.id().clone()))
        .collect::<Vec<_>>();
    offsets::recompute_all(&mut kept_edges);
    let dropped = total_edges - kept_edges.len();

    *diagram.nodes_mut() = unique_nodes;
    *diagram.edges_mut() = kept_edges;
    diagram.clear_selection();
    diagram.bump_rev();

    dropped
}

fn clamp_selection(diagram: &mut Diagram, delta: &mut DeltaBuilder) {
    let (Some(node_id), Some(section)) = (
        diagram.selected_node_id().cloned(),
        diagram.selected_section(),
    ) else {
        return;
    };
    let clamped = Selection::new(node_id, section);
    if &clamped != diagram.selection() {
        delta.record_selection();
    }
    diagram.select(clamped);
}

/// Drops focus that points at objects which no longer exist.
fn prune_selection(diagram: &mut Diagram, delta: &mut DeltaBuilder) {
    if let Some(node_id) = diagram.selected_node_id() {
        if diagram.node(node_id).is_none() {
            let edge_id = diagram.selected_edge_id().cloned();
            diagram.clear_selection();
            diagram.select_edge(edge_id);
            delta.record_selection();
        }
    }
    if let Some(edge_id) = diagram.selected_edge_id() {
        if diagram.edge(edge_id).is_none() {
            diagram.select_edge(None);
            delta.record_selection();
        }
    }
}
