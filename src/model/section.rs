// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Focusable sections inside a class node.
//!
//! A node exposes a flat, ordered list of sections:
//!
//! ```text
//! 0                      frame
//! 1                      class-name header
//! 2 ..                   attribute rows
//! 2 + attr_slots ..      method rows
//! ```
//!
//! An empty attribute or method list still occupies one slot (the "Add Attribute" / "Add
//! Method" placeholder), so `attr_slots = max(attributes.len(), 1)` and likewise for methods.

use super::ids::NodeId;
use super::node::ClassNode;

/// One focusable part of a class node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Frame,
    ClassName,
    Attribute(usize),
    Method(usize),
}

/// Slot counts for a node's sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    attr_slots: usize,
    method_slots: usize,
}

impl Default for SectionLayout {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl SectionLayout {
    pub fn new(attribute_count: usize, method_count: usize) -> Self {
        Self {
            attr_slots: attribute_count.max(1),
            method_slots: method_count.max(1),
        }
    }

    pub fn of(node: &ClassNode) -> Self {
        Self::new(node.attributes().len(), node.methods().len())
    }

    pub fn attr_slots(&self) -> usize {
        self.attr_slots
    }

    pub fn method_slots(&self) -> usize {
        self.method_slots
    }

    /// Total number of sections, including frame and header.
    pub fn total(&self) -> usize {
        2 + self.attr_slots + self.method_slots
    }

    pub fn last_index(&self) -> usize {
        self.total() - 1
    }

    /// Maps a flat index to a section. Indices past the end are clamped to the last method slot.
    pub fn section_at(&self, index: usize) -> Section {
        match index {
            0 => Section::Frame,
            1 => Section::ClassName,
            _ => {
                let row = index.min(self.last_index()) - 2;
                if row < self.attr_slots {
                    Section::Attribute(row)
                } else {
                    Section::Method(row - self.attr_slots)
                }
            }
        }
    }

    /// Flat index of `section`, clamped into this layout.
    pub fn index_of(&self, section: Section) -> usize {
        match section {
            Section::Frame => 0,
            Section::ClassName => 1,
            Section::Attribute(row) => 2 + row.min(self.attr_slots - 1),
            Section::Method(row) => 2 + self.attr_slots + row.min(self.method_slots - 1),
        }
    }

    pub fn clamp(&self, section: Section) -> Section {
        self.section_at(self.index_of(section))
    }
}

/// Which part of the diagram has node focus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Frame(NodeId),
    ClassName(NodeId),
    Attribute(NodeId, usize),
    Method(NodeId, usize),
}

impl Selection {
    pub fn new(node_id: NodeId, section: Section) -> Self {
        match section {
            Section::Frame => Self::Frame(node_id),
            Section::ClassName => Self::ClassName(node_id),
            Section::Attribute(row) => Self::Attribute(node_id, row),
            Section::Method(row) => Self::Method(node_id, row),
        }
    }

    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::None => None,
            Self::Frame(id)
            | Self::ClassName(id)
            | Self::Attribute(id, _)
            | Self::Method(id, _) => Some(id),
        }
    }

    pub fn section(&self) -> Option<Section> {
        match self {
            Self::None => None,
            Self::Frame(_) => Some(Section::Frame),
            Self::ClassName(_) => Some(Section::ClassName),
            Self::Attribute(_, row) => Some(Section::Attribute(*row)),
            Self::Method(_, row) => Some(Section::Method(*row)),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
