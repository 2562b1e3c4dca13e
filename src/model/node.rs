// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use super::ids::NodeId;

pub const PLACEHOLDER_ATTRIBUTE: &str = "+ attribute: type";
pub const PLACEHOLDER_METHOD: &str = "+ method(): void";

/// A point in diagram coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pan/zoom state of the canvas, as reported by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn screen_to_diagram(&self, sx: f64, sy: f64) -> Position {
        let zoom = if self.zoom > 0.0 { self.zoom } else { 1.0 };
        Position::new((sx - self.x) / zoom, (sy - self.y) / zoom)
    }

    /// Diagram-space point under the center of a `width` x `height` screen.
    pub fn center(&self, width: f64, height: f64) -> Position {
        self.screen_to_diagram(width / 2.0, height / 2.0)
    }
}

/// A UML class box.
///
/// Attribute and method lists are `Arc`-shared so that snapshots handed to a renderer never
/// observe in-place edits; every mutation replaces the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    id: NodeId,
    position: Position,
    class_name: String,
    attributes: Arc<[String]>,
    methods: Arc<[String]>,
    selected_section: Option<usize>,
}

impl ClassNode {
    pub fn new(id: NodeId, position: Position, class_name: impl Into<String>) -> Self {
        Self {
            id,
            position,
            class_name: class_name.into(),
            attributes: Arc::from(Vec::new()),
            methods: Arc::from(Vec::new()),
            selected_section: None,
        }
    }

    /// A fresh class as created by the "add class" action: `Class {id}` with one placeholder
    /// attribute and one placeholder method.
    pub fn placeholder(id: NodeId, position: Position) -> Self {
        let class_name = default_class_name(&id);
        let mut node = Self::new(id, position, class_name);
        node.set_attributes(vec![PLACEHOLDER_ATTRIBUTE.to_owned()]);
        node.set_methods(vec![PLACEHOLDER_METHOD.to_owned()]);
        node
    }

    pub fn with_members(mut self, attributes: Vec<String>, methods: Vec<String>) -> Self {
        self.set_attributes(attributes);
        self.set_methods(methods);
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.class_name = class_name.into();
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn set_attributes(&mut self, attributes: Vec<String>) {
        self.attributes = Arc::from(attributes);
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn set_methods(&mut self, methods: Vec<String>) {
        self.methods = Arc::from(methods);
    }

    pub fn selected_section(&self) -> Option<usize> {
        self.selected_section
    }

    pub(crate) fn set_selected_section(&mut self, section: Option<usize>) {
        self.selected_section = section;
    }

    /// Applies the provided fields, leaving the others untouched.
    ///
    /// Returns whether anything changed.
    pub fn apply_patch(&mut self, patch: &NodeFieldsPatch) -> bool {
        let mut changed = false;
        if let Some(class_name) = &patch.class_name {
            if *class_name != self.class_name {
                self.class_name = class_name.clone();
                changed = true;
            }
        }
        if let Some(attributes) = &patch.attributes {
            if attributes.as_slice() != self.attributes() {
                self.set_attributes(attributes.clone());
                changed = true;
            }
        }
        if let Some(methods) = &patch.methods {
            if methods.as_slice() != self.methods() {
                self.set_methods(methods.clone());
                changed = true;
            }
        }
        changed
    }
}

/// Partial update for [`ClassNode`] fields, shallow-merged by `UpdateNodeFields`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFieldsPatch {
    pub class_name: Option<String>,
    pub attributes: Option<Vec<String>>,
    pub methods: Option<Vec<String>>,
}

impl NodeFieldsPatch {
    pub fn class_name(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            ..Self::default()
        }
    }

    pub fn attributes(attributes: Vec<String>) -> Self {
        Self {
            attributes: Some(attributes),
            ..Self::default()
        }
    }

    pub fn methods(methods: Vec<String>) -> Self {
        Self {
            methods: Some(methods),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.class_name.is_none() && self.attributes.is_none() && self.methods.is_none()
    }
}

pub fn default_class_name(id: &NodeId) -> String {
    format!("Class {id}")
}
