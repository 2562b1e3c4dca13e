// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The persisted blob shape.
//!
//! Field names follow the node/edge records a canvas library would consume (`type`, `position`,
//! `data.className`, `sourceHandle`, ...). Section focus is live state and is never written.

use serde::{Deserialize, Serialize};

use crate::model::{ClassNode, EdgeId, NodeId, Position, RelationshipEdge, RelationshipType};

use super::StoreError;

pub const CLASS_NODE_TYPE: &str = "classNode";
pub const RELATIONSHIP_EDGE_TYPE: &str = "relationshipEdge";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramJson {
    #[serde(default)]
    pub nodes: Vec<NodeJson>,
    #[serde(default)]
    pub edges: Vec<EdgeJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeJson {
    pub id: String,
    #[serde(rename = "type", default = "class_node_type")]
    pub kind: String,
    #[serde(default)]
    pub position: PositionJson,
    pub data: NodeDataJson,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionJson {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDataJson {
    pub class_name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeJson {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(rename = "type", default = "relationship_edge_type")]
    pub kind: String,
    #[serde(default)]
    pub data: EdgeDataJson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDataJson {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub relationship_type: RelationshipTypeJson,
    #[serde(default)]
    pub edge_index: usize,
    #[serde(default = "default_total_edges")]
    pub total_edges: usize,
}

impl Default for EdgeDataJson {
    fn default() -> Self {
        Self {
            label: default_label(),
            relationship_type: RelationshipTypeJson::default(),
            edge_index: 0,
            total_edges: default_total_edges(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipTypeJson {
    #[default]
    Association,
    Inheritance,
    Aggregation,
    Composition,
    Dependency,
}

impl From<RelationshipType> for RelationshipTypeJson {
    fn from(relationship_type: RelationshipType) -> Self {
        match relationship_type {
            RelationshipType::Association => Self::Association,
            RelationshipType::Inheritance => Self::Inheritance,
            RelationshipType::Aggregation => Self::Aggregation,
            RelationshipType::Composition => Self::Composition,
            RelationshipType::Dependency => Self::Dependency,
        }
    }
}

impl From<RelationshipTypeJson> for RelationshipType {
    fn from(relationship_type: RelationshipTypeJson) -> Self {
        match relationship_type {
            RelationshipTypeJson::Association => Self::Association,
            RelationshipTypeJson::Inheritance => Self::Inheritance,
            RelationshipTypeJson::Aggregation => Self::Aggregation,
            RelationshipTypeJson::Composition => Self::Composition,
            RelationshipTypeJson::Dependency => Self::Dependency,
        }
    }
}

fn class_node_type() -> String {
    CLASS_NODE_TYPE.to_owned()
}

fn relationship_edge_type() -> String {
    RELATIONSHIP_EDGE_TYPE.to_owned()
}

fn default_label() -> String {
    crate::model::DEFAULT_EDGE_LABEL.to_owned()
}

fn default_total_edges() -> usize {
    1
}

impl From<&ClassNode> for NodeJson {
    fn from(node: &ClassNode) -> Self {
        let Position { x, y } = node.position();
        Self {
            id: node.id().to_string(),
            kind: class_node_type(),
            position: PositionJson { x, y },
            data: NodeDataJson {
                class_name: node.class_name().to_owned(),
                attributes: node.attributes().to_vec(),
                methods: node.methods().to_vec(),
            },
        }
    }
}

impl From<&RelationshipEdge> for EdgeJson {
    fn from(edge: &RelationshipEdge) -> Self {
        Self {
            id: edge.id().to_string(),
            source: edge.source().to_string(),
            target: edge.target().to_string(),
            source_handle: edge.source_handle().map(str::to_owned),
            target_handle: edge.target_handle().map(str::to_owned),
            kind: relationship_edge_type(),
            data: EdgeDataJson {
                label: edge.label().to_owned(),
                relationship_type: edge.relationship_type().into(),
                edge_index: edge.edge_index(),
                total_edges: edge.total_edges(),
            },
        }
    }
}

impl DiagramJson {
    pub fn from_records(nodes: &[ClassNode], edges: &[RelationshipEdge]) -> Self {
        Self {
            nodes: nodes.iter().map(NodeJson::from).collect(),
            edges: edges.iter().map(EdgeJson::from).collect(),
        }
    }

    pub fn to_json_string(&self, key: &str) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(|source| StoreError::Json {
            key: key.to_owned(),
            source,
        })
    }

    pub fn from_json_str(key: &str, text: &str) -> Result<Self, StoreError> {
        serde_json::from_str(text).map_err(|source| StoreError::Json {
            key: key.to_owned(),
            source,
        })
    }
}

fn node_id(field: &'static str, value: String) -> Result<NodeId, StoreError> {
    NodeId::new(value.clone()).map_err(|source| StoreError::InvalidId {
        field,
        value,
        source: Box::new(source),
    })
}

/// Converts persisted records into live ones.
///
/// Persisted `edgeIndex`/`totalEdges` are carried over as-is; callers that need the offset
/// invariant recompute it (see [`crate::ops::replace_contents`]).
pub fn hydrate(json: DiagramJson) -> Result<(Vec<ClassNode>, Vec<RelationshipEdge>), StoreError> {
    let nodes = json
        .nodes
        .into_iter()
        .map(|node| {
            let id = node_id("nodes[].id", node.id)?;
            let position = Position::new(node.position.x, node.position.y);
            Ok(ClassNode::new(id, position, node.data.class_name)
                .with_members(node.data.attributes, node.data.methods))
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    let edges = json
        .edges
        .into_iter()
        .map(|edge| {
            let id = EdgeId::new(edge.id.clone()).map_err(|source| StoreError::InvalidId {
                field: "edges[].id",
                value: edge.id,
                source: Box::new(source),
            })?;
            let source = node_id("edges[].source", edge.source)?;
            let target = node_id("edges[].target", edge.target)?;
            let mut live = RelationshipEdge::new(id, source, target)
                .with_handles(edge.source_handle, edge.target_handle);
            live.set_label(edge.data.label);
            live.set_relationship_type(edge.data.relationship_type.into());
            live.set_offset_slot(edge.data.edge_index, edge.data.total_edges.max(1));
            Ok(live)
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok((nodes, edges))
}
