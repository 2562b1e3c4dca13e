// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use super::ids::{EdgeId, NodeId};

/// Spacing between parallel edges, in diagram units.
pub const EDGE_OFFSET_AMOUNT: f64 = 20.0;

pub const DEFAULT_EDGE_LABEL: &str = "Association";

/// The kind of UML relationship an edge draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelationshipType {
    #[default]
    Association,
    Inheritance,
    Aggregation,
    Composition,
    Dependency,
}

impl RelationshipType {
    pub const ALL: [Self; 5] = [
        Self::Association,
        Self::Inheritance,
        Self::Aggregation,
        Self::Composition,
        Self::Dependency,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Association => "association",
            Self::Inheritance => "inheritance",
            Self::Aggregation => "aggregation",
            Self::Composition => "composition",
            Self::Dependency => "dependency",
        }
    }

    /// The next type in [`RelationshipType::ALL`], wrapping around.
    pub fn cycle(self) -> Self {
        let index = Self::ALL.iter().position(|ty| *ty == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRelationshipTypeError {
    value: String,
}

impl fmt::Display for ParseRelationshipTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown relationship type: {:?}", self.value)
    }
}

impl std::error::Error for ParseRelationshipTypeError {}

impl FromStr for RelationshipType {
    type Err = ParseRelationshipTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ParseRelationshipTypeError { value: s.to_owned() })
    }
}

/// A relationship line between two class nodes.
///
/// `edge_index`/`total_edges` are derived: they are rewritten by the offset recompute whenever
/// an edge between the same unordered node pair is added or removed.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipEdge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    source_handle: Option<String>,
    target_handle: Option<String>,
    label: String,
    relationship_type: RelationshipType,
    edge_index: usize,
    total_edges: usize,
}

impl RelationshipEdge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            source_handle: None,
            target_handle: None,
            label: DEFAULT_EDGE_LABEL.to_owned(),
            relationship_type: RelationshipType::default(),
            edge_index: 0,
            total_edges: 1,
        }
    }

    pub fn with_handles(
        mut self,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn source_handle(&self) -> Option<&str> {
        self.source_handle.as_deref()
    }

    pub fn target_handle(&self) -> Option<&str> {
        self.target_handle.as_deref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn relationship_type(&self) -> RelationshipType {
        self.relationship_type
    }

    pub fn set_relationship_type(&mut self, relationship_type: RelationshipType) {
        self.relationship_type = relationship_type;
    }

    pub fn edge_index(&self) -> usize {
        self.edge_index
    }

    pub fn total_edges(&self) -> usize {
        self.total_edges
    }

    pub(crate) fn set_offset_slot(&mut self, edge_index: usize, total_edges: usize) {
        self.edge_index = edge_index;
        self.total_edges = total_edges.max(1);
    }

    /// Whether this edge connects the unordered pair `{a, b}`.
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }

    pub fn touches(&self, node_id: &NodeId) -> bool {
        &self.source == node_id || &self.target == node_id
    }

    /// Perpendicular displacement the renderer applies to fan parallel edges out symmetrically
    /// around the straight line between the two nodes.
    pub fn visual_offset(&self) -> f64 {
        visual_offset(self.edge_index, self.total_edges)
    }
}

pub fn visual_offset(edge_index: usize, total_edges: usize) -> f64 {
    let total = total_edges.max(1) as f64;
    (edge_index as f64 - (total - 1.0) / 2.0) * EDGE_OFFSET_AMOUNT
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{visual_offset, RelationshipEdge, RelationshipType};
    use crate::model::{EdgeId, NodeId};

    #[rstest]
    #[case(0, 1, 0.0)]
    #[case(0, 2, -10.0)]
    #[case(1, 2, 10.0)]
    #[case(0, 3, -20.0)]
    #[case(1, 3, 0.0)]
    #[case(2, 3, 20.0)]
    fn offsets_fan_out_symmetrically(
        #[case] index: usize,
        #[case] total: usize,
        #[case] expected: f64,
    ) {
        assert_eq!(visual_offset(index, total), expected);
    }

    #[test]
    fn new_edge_uses_defaults() {
        let edge = RelationshipEdge::new(
            EdgeId::new("e1").unwrap(),
            NodeId::new("1").unwrap(),
            NodeId::new("2").unwrap(),
        );
        assert_eq!(edge.label(), "Association");
        assert_eq!(edge.relationship_type(), RelationshipType::Association);
        assert_eq!((edge.edge_index(), edge.total_edges()), (0, 1));
        assert_eq!(edge.visual_offset(), 0.0);
    }

    #[test]
    fn connects_ignores_direction() {
        let a = NodeId::new("1").unwrap();
        let b = NodeId::new("2").unwrap();
        let c = NodeId::new("3").unwrap();
        let edge = RelationshipEdge::new(EdgeId::new("e").unwrap(), a.clone(), b.clone());
        assert!(edge.connects(&a, &b));
        assert!(edge.connects(&b, &a));
        assert!(!edge.connects(&a, &c));
    }

    #[test]
    fn relationship_type_parses_and_cycles() {
        for ty in RelationshipType::ALL {
            assert_eq!(ty.as_str().parse::<RelationshipType>(), Ok(ty));
        }
        assert!("uses".parse::<RelationshipType>().is_err());
        assert_eq!(RelationshipType::Dependency.cycle(), RelationshipType::Association);
    }
}
