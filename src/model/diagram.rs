// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use super::edge::RelationshipEdge;
use super::ids::{EdgeId, IdAllocator, NodeId};
use super::node::ClassNode;
use super::section::{Section, SectionLayout, Selection};

/// The live state of one open class diagram.
///
/// Nodes and edges are kept in insertion order (store order drives Tab traversal and offset
/// slot assignment). Both lists sit behind `Arc`s and are mutated copy-on-write, so a
/// [`DiagramSnapshot`] handed out earlier never changes underneath its holder.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    nodes: Arc<Vec<ClassNode>>,
    edges: Arc<Vec<RelationshipEdge>>,
    selection: Selection,
    selected_edge_id: Option<EdgeId>,
    ids: IdAllocator,
    rev: u64,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(IdAllocator::new())
    }
}

impl Diagram {
    pub fn new(ids: IdAllocator) -> Self {
        Self {
            nodes: Arc::new(Vec::new()),
            edges: Arc::new(Vec::new()),
            selection: Selection::None,
            selected_edge_id: None,
            ids,
            rev: 0,
        }
    }

    pub fn nodes(&self) -> &[ClassNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<ClassNode> {
        Arc::make_mut(&mut self.nodes)
    }

    pub fn edges(&self) -> &[RelationshipEdge] {
        &self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut Vec<RelationshipEdge> {
        Arc::make_mut(&mut self.edges)
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&ClassNode> {
        self.nodes.iter().find(|node| node.id() == node_id)
    }

    pub fn node_position(&self, node_id: &NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id() == node_id)
    }

    pub(crate) fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut ClassNode> {
        let index = self.node_position(node_id)?;
        self.nodes_mut().get_mut(index)
    }

    pub fn edge(&self, edge_id: &EdgeId) -> Option<&RelationshipEdge> {
        self.edges.iter().find(|edge| edge.id() == edge_id)
    }

    pub(crate) fn edge_mut(&mut self, edge_id: &EdgeId) -> Option<&mut RelationshipEdge> {
        let index = self.edges.iter().position(|edge| edge.id() == edge_id)?;
        self.edges_mut().get_mut(index)
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub(crate) fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub(crate) fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn snapshot(&self) -> DiagramSnapshot {
        DiagramSnapshot {
            nodes: Arc::clone(&self.nodes),
            edges: Arc::clone(&self.edges),
            selection: self.selection.clone(),
            selected_edge_id: self.selected_edge_id.clone(),
            rev: self.rev,
        }
    }

    // Selection model.

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_node_id(&self) -> Option<&NodeId> {
        self.selection.node_id()
    }

    /// The focused section, clamped to the selected node's current layout.
    pub fn selected_section(&self) -> Option<Section> {
        let section = self.selection.section()?;
        match self.selection.node_id().and_then(|id| self.node(id)) {
            Some(node) => Some(SectionLayout::of(node).clamp(section)),
            None => Some(section),
        }
    }

    /// Flat section index of the focus, clamped like [`Diagram::selected_section`].
    pub fn selected_section_index(&self) -> Option<usize> {
        let section = self.selected_section()?;
        let layout = self
            .selection
            .node_id()
            .and_then(|id| self.node(id))
            .map(SectionLayout::of)
            .unwrap_or_default();
        Some(layout.index_of(section))
    }

    pub fn selected_edge_id(&self) -> Option<&EdgeId> {
        self.selected_edge_id.as_ref()
    }

    /// Focuses `section_index` of `node_id` and drops section focus from every other node.
    ///
    /// An unknown node id still updates the selection itself; no node is marked.
    pub fn select_section(&mut self, node_id: NodeId, section_index: usize) {
        let layout = self
            .node(&node_id)
            .map(SectionLayout::of)
            .unwrap_or_default();
        self.select(Selection::new(node_id, layout.section_at(section_index)));
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
        self.sync_node_sections();
    }

    /// Clears node, section, and edge focus.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
        self.selected_edge_id = None;
        self.sync_node_sections();
    }

    pub fn select_edge(&mut self, edge_id: Option<EdgeId>) {
        self.selected_edge_id = edge_id;
    }

    /// Rewrites every node's `selected_section` from the current selection.
    ///
    /// At most one node ends up with a non-null section afterwards.
    pub(crate) fn sync_node_sections(&mut self) {
        let selected_node_id = self.selection.node_id().cloned();
        let section = self.selection.section();

        let wanted = |node: &ClassNode| match (&selected_node_id, section) {
            (Some(id), Some(section)) if node.id() == id => {
                Some(SectionLayout::of(node).index_of(section))
            }
            _ => None,
        };

        if self
            .nodes
            .iter()
            .all(|node| node.selected_section() == wanted(node))
        {
            return;
        }

        for node in self.nodes_mut().iter_mut() {
            let next = wanted(node);
            node.set_selected_section(next);
        }
    }
}

/// An immutable view of a diagram at one revision, as handed to the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramSnapshot {
    pub nodes: Arc<Vec<ClassNode>>,
    pub edges: Arc<Vec<RelationshipEdge>>,
    pub selection: Selection,
    pub selected_edge_id: Option<EdgeId>,
    pub rev: u64,
}
