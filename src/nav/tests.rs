// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;
use rstest::rstest;

use crate::model::fixtures::shop_diagram;
use crate::model::{Diagram, EdgeId, NodeFieldsPatch, NodeId, Position, SectionLayout, Selection};
use crate::ops::{apply_op, apply_ops, Op};

use super::{handle_key, step_focus, Direction, KeyOutcome, NavKey};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn press(diagram: &mut Diagram, key: NavKey) -> KeyOutcome {
    handle_key(diagram, key)
}

fn focus(diagram: &mut Diagram, node_id: &str, section_index: usize) {
    apply_op(
        diagram,
        Op::SelectSection {
            node_id: nid(node_id),
            section_index,
        },
    );
}

fn edge_between(diagram: &Diagram, source: &str, target: &str) -> EdgeId {
    diagram
        .edges()
        .iter()
        .find(|edge| edge.source() == &nid(source) && edge.target() == &nid(target))
        .map(|edge| edge.id().clone())
        .expect("edge exists")
}

#[rstest]
#[case(KeyCode::Delete, KeyModifiers::NONE, Some(NavKey::Delete))]
#[case(KeyCode::Tab, KeyModifiers::NONE, Some(NavKey::Tab))]
#[case(KeyCode::Tab, KeyModifiers::SHIFT, Some(NavKey::ShiftTab))]
#[case(KeyCode::BackTab, KeyModifiers::SHIFT, Some(NavKey::ShiftTab))]
#[case(KeyCode::Backspace, KeyModifiers::NONE, None)]
#[case(KeyCode::Char('x'), KeyModifiers::NONE, None)]
fn decodes_navigation_keys(
    #[case] code: KeyCode,
    #[case] modifiers: KeyModifiers,
    #[case] expected: Option<NavKey>,
) {
    assert_eq!(NavKey::from_key_event(&KeyEvent::new(code, modifiers)), expected);
}

#[test]
fn tab_without_selection_focuses_first_frame() {
    let mut diagram = shop_diagram();

    let outcome = press(&mut diagram, NavKey::Tab);

    assert!(outcome.is_consumed());
    assert_eq!(diagram.selection(), &Selection::Frame(nid("1")));
    assert_eq!(diagram.nodes()[0].selected_section(), Some(0));
}

#[test]
fn shift_tab_without_selection_also_focuses_first_frame() {
    let mut diagram = shop_diagram();

    press(&mut diagram, NavKey::ShiftTab);

    assert_eq!(diagram.selection(), &Selection::Frame(nid("1")));
}

#[test]
fn tab_walks_sections_then_moves_to_next_node() {
    let mut diagram = shop_diagram();
    focus(&mut diagram, "1", 0);

    let mut visited = Vec::new();
    for _ in 0..6 {
        press(&mut diagram, NavKey::Tab);
        visited.push(diagram.selection().clone());
    }

    assert_eq!(
        visited,
        vec![
            Selection::ClassName(nid("1")),
            Selection::Attribute(nid("1"), 0),
            Selection::Attribute(nid("1"), 1),
            Selection::Method(nid("1"), 0),
            Selection::Frame(nid("2")),
            Selection::ClassName(nid("2")),
        ]
    );
}

#[test]
fn tab_counts_placeholder_slots_of_empty_lists() {
    let mut diagram = shop_diagram();
    focus(&mut diagram, "3", 1);

    press(&mut diagram, NavKey::Tab);
    assert_eq!(diagram.selection(), &Selection::Attribute(nid("3"), 0));
    press(&mut diagram, NavKey::Tab);
    assert_eq!(diagram.selection(), &Selection::Method(nid("3"), 0));
    press(&mut diagram, NavKey::Tab);
    assert_eq!(diagram.selection(), &Selection::Frame(nid("1")));
}

#[test]
fn shift_tab_wraps_to_last_section_of_previous_node() {
    let mut diagram = shop_diagram();
    focus(&mut diagram, "2", 0);

    press(&mut diagram, NavKey::ShiftTab);

    assert_eq!(diagram.selection(), &Selection::Method(nid("1"), 0));
    assert_eq!(diagram.selected_section_index(), Some(4));
}

#[test]
fn shift_tab_from_first_frame_uses_the_last_nodes_own_layout() {
    let mut diagram = shop_diagram();
    focus(&mut diagram, "1", 0);

    press(&mut diagram, NavKey::ShiftTab);

    // Product has only placeholder slots, so its last section is index 3, not Customer's 4.
    assert_eq!(diagram.selection(), &Selection::Method(nid("3"), 0));
    assert_eq!(diagram.selected_section_index(), Some(3));
}

#[test]
fn tab_is_consumed_on_an_empty_diagram() {
    let mut diagram = Diagram::default();

    let outcome = press(&mut diagram, NavKey::Tab);

    let KeyOutcome::Consumed(result) = outcome else {
        panic!("tab must be consumed");
    };
    assert_eq!(result.rev, 0);
    assert!(!result.delta.selection_changed);
    assert!(diagram.selection().is_none());
}

#[test]
fn tab_from_a_stale_selection_restarts_at_the_first_node() {
    let mut diagram = shop_diagram();
    focus(&mut diagram, "42", 3);

    press(&mut diagram, NavKey::Tab);

    assert_eq!(diagram.selection(), &Selection::Frame(nid("1")));
}

#[test]
fn step_focus_is_pure() {
    let diagram = shop_diagram();
    let current = Selection::Method(nid("2"), 1);

    let next = step_focus(diagram.nodes(), &current, Direction::Forward);
    let back = step_focus(diagram.nodes(), &next, Direction::Backward);

    assert_eq!(next, Selection::Frame(nid("3")));
    assert_eq!(back, current);
    assert!(diagram.selection().is_none());
}

#[test]
fn delete_without_focus_is_ignored() {
    let mut diagram = shop_diagram();
    let rev = diagram.rev();

    assert_eq!(press(&mut diagram, NavKey::Delete), KeyOutcome::Ignored);
    assert_eq!(diagram.rev(), rev);
}

#[test]
fn delete_removes_the_selected_edge_and_repacks_its_pair() {
    let mut diagram = shop_diagram();
    let doomed = edge_between(&diagram, "2", "3");
    focus(&mut diagram, "1", 2);
    apply_op(
        &mut diagram,
        Op::SelectEdge {
            edge_id: Some(doomed.clone()),
        },
    );

    let outcome = press(&mut diagram, NavKey::Delete);

    assert!(outcome.is_consumed());
    assert!(diagram.edge(&doomed).is_none());
    assert_eq!(diagram.selected_edge_id(), None);
    assert_eq!(diagram.nodes().len(), 3);
    let survivor = diagram.edge(&edge_between(&diagram, "3", "2")).expect("edge");
    assert_eq!((survivor.edge_index(), survivor.total_edges()), (0, 1));
    // Edge focus wins; the node focus is left alone.
    assert_eq!(diagram.selection(), &Selection::Attribute(nid("1"), 0));
}

#[rstest]
#[case::frame(0)]
#[case::class_name(1)]
fn delete_on_frame_or_header_removes_the_node(#[case] section_index: usize) {
    let mut diagram = shop_diagram();
    focus(&mut diagram, "2", section_index);

    press(&mut diagram, NavKey::Delete);

    assert!(diagram.node(&nid("2")).is_none());
    assert!(diagram.edges().is_empty());
    assert!(diagram.selection().is_none());
    assert!(diagram
        .nodes()
        .iter()
        .all(|node| node.selected_section().is_none()));
}

#[test]
fn delete_on_attribute_row_removes_only_that_row_and_clamps_focus() {
    let mut diagram = shop_diagram();
    focus(&mut diagram, "1", 3);
    assert_eq!(diagram.selection(), &Selection::Attribute(nid("1"), 1));
    let rev = diagram.rev();

    press(&mut diagram, NavKey::Delete);

    let customer = diagram.node(&nid("1")).expect("node");
    assert_eq!(customer.attributes(), ["+ name: String".to_owned()]);
    assert_eq!(customer.methods().len(), 1);
    assert_eq!(diagram.selection(), &Selection::Attribute(nid("1"), 0));
    assert_eq!(customer.selected_section(), Some(2));
    assert_eq!(diagram.rev(), rev + 1);
}

#[test]
fn delete_on_method_row_offsets_past_attribute_slots() {
    let mut diagram = shop_diagram();
    focus(&mut diagram, "2", 4);
    assert_eq!(diagram.selection(), &Selection::Method(nid("2"), 1));

    press(&mut diagram, NavKey::Delete);

    let order = diagram.node(&nid("2")).expect("node");
    assert_eq!(order.attributes(), ["- id: u64".to_owned()]);
    assert_eq!(order.methods(), ["+ total(): f64".to_owned()]);
    assert_eq!(diagram.selection(), &Selection::Method(nid("2"), 0));
}

#[test]
fn deleting_the_last_row_leaves_the_placeholder_slot_focused() {
    let mut diagram = shop_diagram();
    focus(&mut diagram, "1", 4);

    press(&mut diagram, NavKey::Delete);

    let customer = diagram.node(&nid("1")).expect("node");
    assert!(customer.methods().is_empty());
    assert_eq!(SectionLayout::of(customer).total(), 5);
    assert_eq!(diagram.selection(), &Selection::Method(nid("1"), 0));
}

#[test]
fn delete_on_a_placeholder_slot_changes_nothing() {
    let mut diagram = shop_diagram();
    focus(&mut diagram, "3", 2);
    let rev = diagram.rev();

    let outcome = press(&mut diagram, NavKey::Delete);

    let KeyOutcome::Consumed(result) = outcome else {
        panic!("delete with focus must be consumed");
    };
    assert!(!result.content_changed());
    assert_eq!(diagram.rev(), rev);
    assert!(diagram.node(&nid("3")).is_some());
}

fn diagram_with_layouts(layouts: &[(usize, usize)]) -> Diagram {
    let mut diagram = Diagram::default();
    apply_ops(
        &mut diagram,
        layouts.iter().enumerate().flat_map(|(i, (attributes, methods))| {
            let node_id = nid(&(i + 1).to_string());
            [
                Op::AddNode {
                    position: Position::new(i as f64 * 50.0, 0.0),
                },
                Op::UpdateNodeFields {
                    node_id,
                    patch: NodeFieldsPatch {
                        class_name: None,
                        attributes: Some(
                            (0..*attributes).map(|a| format!("+ a{a}: i32")).collect(),
                        ),
                        methods: Some((0..*methods).map(|m| format!("+ m{m}()")).collect()),
                    },
                },
            ]
        }),
    );
    diagram
}

proptest! {
    #[test]
    fn tab_ring_returns_to_start_after_total_sections(
        layouts in prop::collection::vec((0usize..4, 0usize..4), 1..6),
        start_node in 0usize..6,
        start_section in 0usize..10,
    ) {
        let mut diagram = diagram_with_layouts(&layouts);
        let start_node = start_node % layouts.len();
        focus(&mut diagram, &(start_node + 1).to_string(), start_section);
        let start = diagram.selection().clone();
        let ring: usize = diagram.nodes().iter().map(|node| SectionLayout::of(node).total()).sum();

        for step in 1..=ring {
            press(&mut diagram, NavKey::Tab);
            if step < ring {
                prop_assert_ne!(diagram.selection(), &start);
            }
        }
        prop_assert_eq!(diagram.selection(), &start);
    }

    #[test]
    fn shift_tab_undoes_tab(
        layouts in prop::collection::vec((0usize..4, 0usize..4), 1..6),
        start_node in 0usize..6,
        start_section in 0usize..10,
    ) {
        let mut diagram = diagram_with_layouts(&layouts);
        focus(&mut diagram, &(start_node % layouts.len() + 1).to_string(), start_section);
        let start = diagram.selection().clone();

        press(&mut diagram, NavKey::Tab);
        press(&mut diagram, NavKey::ShiftTab);

        prop_assert_eq!(diagram.selection(), &start);
        let marked = diagram
            .nodes()
            .iter()
            .filter(|node| node.selected_section().is_some())
            .count();
        prop_assert_eq!(marked, 1);
    }
}
