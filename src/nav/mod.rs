// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keyboard navigation.
//!
//! Delete and Tab/Shift+Tab are resolved against the current selection. All sections of all
//! nodes form one flat focus ring in store order: Tab past the last section of a node lands on
//! the frame of the next node, Shift+Tab before a frame lands on the last section of the
//! previous node, and both wrap around the whole node list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{ClassNode, Diagram, Section, SectionLayout, Selection};
use crate::ops::{apply_ops, ApplyResult, Op};

/// A key the navigator handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Delete,
    Tab,
    ShiftTab,
}

impl NavKey {
    pub fn from_key_event(key: &KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Delete => Some(Self::Delete),
            KeyCode::BackTab => Some(Self::ShiftTab),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Self::ShiftTab),
            KeyCode::Tab => Some(Self::Tab),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// What happened to a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key was handled; the host must not run its own behaviour for it.
    Consumed(ApplyResult),
    /// Nothing to act on; the host may handle the key itself.
    Ignored,
}

impl KeyOutcome {
    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::Consumed(_))
    }
}

/// The focus one Tab step away from `current`.
///
/// A selection that does not point at a live node counts as no selection, which moves focus to
/// the frame of the first node. Returns `Selection::None` only when there are no nodes.
pub fn step_focus(nodes: &[ClassNode], current: &Selection, direction: Direction) -> Selection {
    let Some(first) = nodes.first() else {
        return Selection::None;
    };

    let located = current.node_id().and_then(|node_id| {
        let position = nodes.iter().position(|node| node.id() == node_id)?;
        Some((position, current.section()?))
    });
    let Some((position, section)) = located else {
        return Selection::Frame(first.id().clone());
    };

    let layout = SectionLayout::of(&nodes[position]);
    let index = layout.index_of(section);
    match direction {
        Direction::Forward if index + 1 < layout.total() => {
            Selection::new(nodes[position].id().clone(), layout.section_at(index + 1))
        }
        Direction::Forward => {
            let next = &nodes[(position + 1) % nodes.len()];
            Selection::Frame(next.id().clone())
        }
        Direction::Backward if index > 0 => {
            Selection::new(nodes[position].id().clone(), layout.section_at(index - 1))
        }
        Direction::Backward => {
            let previous = &nodes[(position + nodes.len() - 1) % nodes.len()];
            let previous_layout = SectionLayout::of(previous);
            Selection::new(
                previous.id().clone(),
                previous_layout.section_at(previous_layout.last_index()),
            )
        }
    }
}

/// The ops a Delete press resolves to, or `None` when nothing is focused.
///
/// A focused edge wins over node focus. On a node, the frame and the class-name header delete
/// the whole node; an attribute or method row removes just that row.
pub fn delete_ops(diagram: &Diagram) -> Option<Vec<Op>> {
    if let Some(edge_id) = diagram.selected_edge_id() {
        return Some(vec![
            Op::DeleteEdge {
                edge_id: edge_id.clone(),
            },
            Op::SelectEdge { edge_id: None },
        ]);
    }

    let node_id = diagram.selected_node_id()?;
    diagram.node(node_id)?;
    let op = match diagram.selected_section()? {
        Section::Frame | Section::ClassName => Op::DeleteNode {
            node_id: node_id.clone(),
        },
        Section::Attribute(index) => Op::RemoveAttributeAt {
            node_id: node_id.clone(),
            index,
        },
        Section::Method(index) => Op::RemoveMethodAt {
            node_id: node_id.clone(),
            index,
        },
    };
    Some(vec![op, Op::ClampSelection])
}

/// Applies a navigation key to the diagram.
///
/// Tab and Shift+Tab are always consumed, even when there is nothing to focus.
pub fn handle_key(diagram: &mut Diagram, key: NavKey) -> KeyOutcome {
    match key {
        NavKey::Delete => match delete_ops(diagram) {
            Some(ops) => KeyOutcome::Consumed(apply_ops(diagram, ops)),
            None => KeyOutcome::Ignored,
        },
        NavKey::Tab | NavKey::ShiftTab => {
            let direction = if key == NavKey::Tab {
                Direction::Forward
            } else {
                Direction::Backward
            };
            let target = step_focus(diagram.nodes(), diagram.selection(), direction);
            let op = select_op(diagram, &target);
            KeyOutcome::Consumed(apply_ops(diagram, op))
        }
    }
}

fn select_op(diagram: &Diagram, selection: &Selection) -> Option<Op> {
    let node_id = selection.node_id()?;
    let layout = SectionLayout::of(diagram.node(node_id)?);
    Some(Op::SelectSection {
        node_id: node_id.clone(),
        section_index: layout.index_of(selection.section()?),
    })
}

#[cfg(test)]
mod tests;
