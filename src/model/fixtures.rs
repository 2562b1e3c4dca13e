// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::diagram::Diagram;
use super::edge::RelationshipType;
use super::ids::{EdgeId, NodeId};
use super::node::{NodeFieldsPatch, Position};
use crate::ops::{apply_ops, Connection, Op};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

/// Customer/Order/Product with two parallel edges between Order and Product.
///
/// Node ids are `1`, `2`, `3` in that order.
pub(crate) fn shop_diagram() -> Diagram {
    let mut diagram = Diagram::default();
    apply_ops(
        &mut diagram,
        [
            Op::AddNode {
                position: Position::new(40.0, 40.0),
            },
            Op::AddNode {
                position: Position::new(320.0, 40.0),
            },
            Op::AddNode {
                position: Position::new(320.0, 260.0),
            },
            Op::UpdateNodeFields {
                node_id: nid("1"),
                patch: NodeFieldsPatch {
                    class_name: Some("Customer".to_owned()),
                    attributes: Some(strings(&["+ name: String", "+ email: String"])),
                    methods: Some(strings(&["+ place_order(): Order"])),
                },
            },
            Op::UpdateNodeFields {
                node_id: nid("2"),
                patch: NodeFieldsPatch {
                    class_name: Some("Order".to_owned()),
                    attributes: Some(strings(&["- id: u64"])),
                    methods: Some(strings(&["+ total(): f64", "+ submit()"])),
                },
            },
            Op::UpdateNodeFields {
                node_id: nid("3"),
                patch: NodeFieldsPatch {
                    class_name: Some("Product".to_owned()),
                    attributes: Some(Vec::new()),
                    methods: Some(Vec::new()),
                },
            },
            Op::Connect(Connection::new("1", "2")),
            Op::Connect(Connection::new("2", "3")),
            Op::Connect(Connection::new("3", "2")),
            Op::ClearSelection,
        ],
    );

    let edge_ids = diagram
        .edges()
        .iter()
        .map(|edge| edge.id().clone())
        .collect::<Vec<EdgeId>>();
    if let [places, contains, stocked_by] = edge_ids.as_slice() {
        apply_ops(
            &mut diagram,
            [
                Op::UpdateEdgeLabel {
                    edge_id: places.clone(),
                    label: "places".to_owned(),
                },
                Op::UpdateRelationshipType {
                    edge_id: contains.clone(),
                    relationship_type: RelationshipType::Aggregation,
                },
                Op::UpdateEdgeLabel {
                    edge_id: contains.clone(),
                    label: "contains".to_owned(),
                },
                Op::UpdateRelationshipType {
                    edge_id: stocked_by.clone(),
                    relationship_type: RelationshipType::Dependency,
                },
            ],
        );
    }

    diagram
}
