// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pass-through of change events emitted by the rendering layer (drag, click-select, remove).
//! Geometry is accepted verbatim; removals go through the regular delete paths.

use crate::model::{Diagram, EdgeId, NodeId, Position};

use super::{edges, nodes, DeltaBuilder, ObjectRef};

#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    Position { node_id: NodeId, position: Position },
    Select { node_id: NodeId, selected: bool },
    Remove { node_id: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeChange {
    Select { edge_id: EdgeId, selected: bool },
    Remove { edge_id: EdgeId },
}

pub(super) fn apply_node_changes(
    diagram: &mut Diagram,
    changes: Vec<NodeChange>,
    delta: &mut DeltaBuilder,
) {
    for change in changes {
        match change {
            NodeChange::Position { node_id, position } => {
                let unchanged = diagram
                    .node(&node_id)
                    .map_or(true, |node| node.position() == position);
                if unchanged {
                    continue;
                }
                if let Some(node) = diagram.node_mut(&node_id) {
                    node.set_position(position);
                    delta.record_updated(ObjectRef::Node(node_id));
                }
            }
            NodeChange::Select { node_id, selected } => {
                if selected {
                    if diagram.node(&node_id).is_some() {
                        diagram.select_section(node_id, 0);
                        delta.record_selection();
                    }
                } else if diagram.selected_node_id() == Some(&node_id) {
                    let edge_id = diagram.selected_edge_id().cloned();
                    diagram.clear_selection();
                    diagram.select_edge(edge_id);
                    delta.record_selection();
                }
            }
            NodeChange::Remove { node_id } => nodes::delete_node(diagram, &node_id, delta),
        }
    }
}

pub(super) fn apply_edge_changes(
    diagram: &mut Diagram,
    changes: Vec<EdgeChange>,
    delta: &mut DeltaBuilder,
) {
    for change in changes {
        match change {
            EdgeChange::Select { edge_id, selected } => {
                if selected {
                    if diagram.edge(&edge_id).is_some() {
                        diagram.select_edge(Some(edge_id));
                        delta.record_selection();
                    }
                } else if diagram.selected_edge_id() == Some(&edge_id) {
                    diagram.select_edge(None);
                    delta.record_selection();
                }
            }
            EdgeChange::Remove { edge_id } => edges::delete_edge(diagram, &edge_id, delta),
        }
    }
}
