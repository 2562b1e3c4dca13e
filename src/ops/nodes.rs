// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Node store: creation, field edits, and deletion with cascading edge cleanup.

use crate::model::{
    ClassNode, Diagram, NodeFieldsPatch, NodeId, Position, Section, PLACEHOLDER_ATTRIBUTE,
    PLACEHOLDER_METHOD,
};

use super::{prune_selection, DeltaBuilder, ObjectRef};

/// Appends a placeholder class at `position` and focuses its frame.
pub(super) fn add_node(
    diagram: &mut Diagram,
    position: Position,
    delta: &mut DeltaBuilder,
) -> NodeId {
    let node_id = diagram.ids_mut().next_id();
    diagram
        .nodes_mut()
        .push(ClassNode::placeholder(node_id.clone(), position));
    diagram.select_section(node_id.clone(), 0);
    delta.record_added(ObjectRef::Node(node_id.clone()));
    delta.record_selection();
    node_id
}

pub(super) fn update_node_fields(
    diagram: &mut Diagram,
    node_id: &NodeId,
    patch: &NodeFieldsPatch,
    delta: &mut DeltaBuilder,
) {
    if patch.is_empty() || diagram.node(node_id).is_none() {
        return;
    }
    let Some(node) = diagram.node_mut(node_id) else {
        return;
    };
    if node.apply_patch(patch) {
        delta.record_updated(ObjectRef::Node(node_id.clone()));
        diagram.sync_node_sections();
    }
}

/// Rewrites the text behind one section. Writing to the placeholder slot of an empty list
/// creates the first entry; the frame has no text.
pub(super) fn set_section_text(
    diagram: &mut Diagram,
    node_id: &NodeId,
    section: Section,
    text: String,
    delta: &mut DeltaBuilder,
) {
    let Some(node) = diagram.node(node_id) else {
        return;
    };
    let patch = match section {
        Section::Frame => return,
        Section::ClassName => NodeFieldsPatch::class_name(text),
        Section::Attribute(row) => {
            NodeFieldsPatch::attributes(replace_row(node.attributes(), row, text))
        }
        Section::Method(row) => NodeFieldsPatch::methods(replace_row(node.methods(), row, text)),
    };
    update_node_fields(diagram, node_id, &patch, delta);
}

pub(super) fn add_attribute(
    diagram: &mut Diagram,
    node_id: &NodeId,
    text: Option<String>,
    delta: &mut DeltaBuilder,
) {
    let Some(node) = diagram.node(node_id) else {
        return;
    };
    let mut attributes = node.attributes().to_vec();
    attributes.push(text.unwrap_or_else(|| PLACEHOLDER_ATTRIBUTE.to_owned()));
    update_node_fields(diagram, node_id, &NodeFieldsPatch::attributes(attributes), delta);
}

pub(super) fn add_method(
    diagram: &mut Diagram,
    node_id: &NodeId,
    text: Option<String>,
    delta: &mut DeltaBuilder,
) {
    let Some(node) = diagram.node(node_id) else {
        return;
    };
    let mut methods = node.methods().to_vec();
    methods.push(text.unwrap_or_else(|| PLACEHOLDER_METHOD.to_owned()));
    update_node_fields(diagram, node_id, &NodeFieldsPatch::methods(methods), delta);
}

pub(super) fn remove_attribute_at(
    diagram: &mut Diagram,
    node_id: &NodeId,
    index: usize,
    delta: &mut DeltaBuilder,
) {
    let Some(node) = diagram.node(node_id) else {
        return;
    };
    let Some(attributes) = without_row(node.attributes(), index) else {
        return;
    };
    update_node_fields(diagram, node_id, &NodeFieldsPatch::attributes(attributes), delta);
}

pub(super) fn remove_method_at(
    diagram: &mut Diagram,
    node_id: &NodeId,
    index: usize,
    delta: &mut DeltaBuilder,
) {
    let Some(node) = diagram.node(node_id) else {
        return;
    };
    let Some(methods) = without_row(node.methods(), index) else {
        return;
    };
    update_node_fields(diagram, node_id, &NodeFieldsPatch::methods(methods), delta);
}

/// Removes the node and every edge that starts or ends at it.
pub(super) fn delete_node(diagram: &mut Diagram, node_id: &NodeId, delta: &mut DeltaBuilder) {
    let Some(index) = diagram.node_position(node_id) else {
        return;
    };
    diagram.nodes_mut().remove(index);

    let removed_edge_ids = diagram
        .edges()
        .iter()
        .filter(|edge| edge.touches(node_id))
        .map(|edge| edge.id().clone())
        .collect::<Vec<_>>();
    if !removed_edge_ids.is_empty() {
        diagram.edges_mut().retain(|edge| !edge.touches(node_id));
    }

    for edge_id in removed_edge_ids {
        delta.record_removed(ObjectRef::Edge(edge_id));
    }
    delta.record_removed(ObjectRef::Node(node_id.clone()));
    prune_selection(diagram, delta);
}

fn replace_row(rows: &[String], row: usize, text: String) -> Vec<String> {
    let mut rows = rows.to_vec();
    match rows.get_mut(row) {
        Some(existing) => *existing = text,
        None => rows.push(text),
    }
    rows
}

fn without_row(rows: &[String], row: usize) -> Option<Vec<String>> {
    if row >= rows.len() {
        return None;
    }
    let mut rows = rows.to_vec();
    rows.remove(row);
    Some(rows)
}
