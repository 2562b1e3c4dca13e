// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{ClassNode, Diagram, IdAllocator, Position};
use crate::ops::replace_contents;

use super::{hydrate, BlobStore, DiagramJson, StoreError};

pub const DEFAULT_STORAGE_KEY: &str = "diagram-flow";

/// Where the default class lands when there is nothing to load.
pub const SEED_NODE_POSITION: Position = Position::new(100.0, 100.0);

/// What [`PersistenceBridge::load`] did to the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The blob was read; `dropped_edges` counts edges whose endpoints were missing.
    Restored {
        nodes: usize,
        edges: usize,
        dropped_edges: usize,
    },
    /// No blob existed; one default class was created.
    Seeded,
    /// The blob could not be used; the diagram was reset to empty.
    Reset { reason: String },
}

/// Load/save policy between a [`Diagram`] and a [`BlobStore`].
///
/// Saving is refused until a load has completed, so an empty in-flight diagram never overwrites
/// persisted state. Saves are skipped while the diagram revision is unchanged.
#[derive(Debug, Clone)]
pub struct PersistenceBridge {
    key: String,
    loaded: bool,
    last_saved_rev: Option<u64>,
}

impl Default for PersistenceBridge {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

impl PersistenceBridge {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            loaded: false,
            last_saved_rev: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replaces `diagram` with the persisted state.
    ///
    /// Never fails: unreadable or malformed blobs reset the diagram to empty and are logged.
    /// A malformed blob is also removed from the store.
    pub fn load(&mut self, store: &mut impl BlobStore, diagram: &mut Diagram) -> LoadOutcome {
        let outcome = match store.get(&self.key) {
            Ok(Some(text)) => self.restore(store, diagram, &text),
            Ok(None) => {
                *diagram = seeded_diagram();
                log::debug!("no blob under {:?}; seeded a default class", self.key);
                self.last_saved_rev = None;
                LoadOutcome::Seeded
            }
            Err(err) if err.is_malformed() => self.discard(store, diagram, err),
            Err(err) => {
                log::warn!("cannot read persisted diagram {:?}: {err}", self.key);
                self.reset(diagram, err)
            }
        };
        self.loaded = true;
        outcome
    }

    fn restore(
        &mut self,
        store: &mut impl BlobStore,
        diagram: &mut Diagram,
        text: &str,
    ) -> LoadOutcome {
        let records = DiagramJson::from_json_str(&self.key, text).and_then(hydrate);
        let (nodes, edges) = match records {
            Ok(records) => records,
            Err(err) => return self.discard(store, diagram, err),
        };

        *diagram = Diagram::new(IdAllocator::seeded_from(nodes.iter().map(ClassNode::id)));
        let dropped_edges = replace_contents(diagram, nodes, edges);
        if dropped_edges > 0 {
            log::warn!(
                "dropped {dropped_edges} persisted edge(s) with missing endpoints from {:?}",
                self.key
            );
            self.last_saved_rev = None;
        } else {
            self.last_saved_rev = Some(diagram.rev());
        }
        log::debug!(
            "restored {} class(es) and {} edge(s) from {:?}",
            diagram.nodes().len(),
            diagram.edges().len(),
            self.key
        );

        LoadOutcome::Restored {
            nodes: diagram.nodes().len(),
            edges: diagram.edges().len(),
            dropped_edges,
        }
    }

    /// Drops an unusable blob from the store and resets to empty.
    fn discard(
        &mut self,
        store: &mut impl BlobStore,
        diagram: &mut Diagram,
        err: StoreError,
    ) -> LoadOutcome {
        log::warn!("discarding malformed persisted diagram {:?}: {err}", self.key);
        if let Err(remove_err) = store.remove(&self.key) {
            log::warn!("cannot remove persisted diagram {:?}: {remove_err}", self.key);
        }
        self.reset(diagram, err)
    }

    fn reset(&mut self, diagram: &mut Diagram, err: StoreError) -> LoadOutcome {
        *diagram = Diagram::default();
        self.last_saved_rev = Some(diagram.rev());
        LoadOutcome::Reset {
            reason: err.to_string(),
        }
    }

    /// Writes the diagram if a load has completed and the revision moved since the last save.
    ///
    /// Returns whether a write happened.
    pub fn save_if_changed(
        &mut self,
        store: &mut impl BlobStore,
        diagram: &Diagram,
    ) -> Result<bool, StoreError> {
        if !self.loaded || self.last_saved_rev == Some(diagram.rev()) {
            return Ok(false);
        }
        let text =
            DiagramJson::from_records(diagram.nodes(), diagram.edges()).to_json_string(&self.key)?;
        store.set(&self.key, &text)?;
        self.last_saved_rev = Some(diagram.rev());
        log::debug!("saved rev {} to {:?}", diagram.rev(), self.key);
        Ok(true)
    }
}

fn seeded_diagram() -> Diagram {
    let mut diagram = Diagram::default();
    let id = diagram.ids_mut().next_id();
    replace_contents(
        &mut diagram,
        vec![ClassNode::placeholder(id, SEED_NODE_POSITION)],
        Vec::new(),
    );
    diagram
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{LoadOutcome, PersistenceBridge, DEFAULT_STORAGE_KEY, SEED_NODE_POSITION};
    use crate::model::fixtures::shop_diagram;
    use crate::model::{Diagram, NodeId, Position, RelationshipType};
    use crate::ops::{apply_op, Connection, Op};
    use crate::store::testing::TempDir;
    use crate::store::{BlobFolder, BlobStore, MemoryBlobStore};

    #[fixture]
    fn tmp() -> TempDir {
        TempDir::new("persist")
    }

    fn loaded(store: &mut impl BlobStore) -> (PersistenceBridge, Diagram) {
        let mut bridge = PersistenceBridge::default();
        let mut diagram = Diagram::default();
        bridge.load(store, &mut diagram);
        (bridge, diagram)
    }

    #[test]
    fn missing_blob_seeds_one_default_class() {
        let mut store = MemoryBlobStore::new();

        let mut bridge = PersistenceBridge::default();
        let mut diagram = Diagram::default();

        assert_eq!(bridge.load(&mut store, &mut diagram), LoadOutcome::Seeded);

        assert_eq!(diagram.nodes().len(), 1);
        let node = &diagram.nodes()[0];
        assert_eq!(node.id().as_str(), "1");
        assert_eq!(node.class_name(), "Class 1");
        assert_eq!(node.position(), SEED_NODE_POSITION);
        assert!(diagram.selection().is_none());
        assert_eq!(diagram.ids().peek(), 2);
    }

    #[test]
    fn seeded_class_is_written_on_first_save() {
        let mut store = MemoryBlobStore::new();
        let (mut bridge, diagram) = loaded(&mut store);

        assert!(bridge.save_if_changed(&mut store, &diagram).unwrap());
        assert!(store.contains_key(DEFAULT_STORAGE_KEY));
        assert!(!bridge.save_if_changed(&mut store, &diagram).unwrap());
    }

    #[test]
    fn save_is_refused_before_load_completes() {
        let mut store = MemoryBlobStore::new();
        let mut bridge = PersistenceBridge::default();

        let saved = bridge.save_if_changed(&mut store, &shop_diagram()).unwrap();

        assert!(!saved);
        assert!(!store.contains_key(DEFAULT_STORAGE_KEY));
    }

    #[rstest]
    fn two_nodes_one_edge_survive_a_fresh_session(tmp: TempDir) {
        let mut diagram = Diagram::default();
        for x in [0.0, 200.0] {
            apply_op(
                &mut diagram,
                Op::AddNode {
                    position: Position::new(x, 10.0),
                },
            );
        }
        apply_op(&mut diagram, Op::Connect(Connection::new("1", "2")));
        let edge_id = diagram.edges()[0].id().clone();
        apply_op(
            &mut diagram,
            Op::UpdateRelationshipType {
                edge_id: edge_id.clone(),
                relationship_type: RelationshipType::Inheritance,
            },
        );
        apply_op(
            &mut diagram,
            Op::UpdateEdgeLabel {
                edge_id,
                label: "extends".to_owned(),
            },
        );

        let mut folder = BlobFolder::new(tmp.path());
        let mut bridge = PersistenceBridge::default();
        let mut scratch = Diagram::default();
        bridge.load(&mut folder, &mut scratch);
        assert!(bridge.save_if_changed(&mut folder, &diagram).unwrap());

        let mut reopened = BlobFolder::new(tmp.path());
        let (_, restored) = loaded(&mut reopened);

        assert_eq!(restored.nodes().len(), 2);
        for (before, after) in diagram.nodes().iter().zip(restored.nodes()) {
            assert_eq!(after.id(), before.id());
            assert_eq!(after.class_name(), before.class_name());
            assert_eq!(after.attributes(), before.attributes());
            assert_eq!(after.methods(), before.methods());
        }
        let edge = &restored.edges()[0];
        assert_eq!(edge.relationship_type(), RelationshipType::Inheritance);
        assert_eq!(edge.label(), "extends");
        assert!(restored.selection().is_none());
        assert_eq!(restored.ids().peek(), 3);
    }

    #[rstest]
    #[case::not_json("{nodes: oops")]
    #[case::wrong_shape(r#"{"nodes": 3}"#)]
    #[case::empty_id(r#"{"nodes": [{"id": "", "data": {"className": "A"}}]}"#)]
    fn malformed_blob_resets_to_empty_and_removes_the_key(#[case] blob: &str) {
        let mut store = MemoryBlobStore::new();
        store.set(DEFAULT_STORAGE_KEY, blob).unwrap();
        let mut bridge = PersistenceBridge::default();
        let mut diagram = shop_diagram();

        let outcome = bridge.load(&mut store, &mut diagram);

        assert!(matches!(outcome, LoadOutcome::Reset { .. }));
        assert!(diagram.is_empty());
        assert!(!store.contains_key(DEFAULT_STORAGE_KEY));
        assert!(bridge.is_loaded());
        assert!(!bridge.save_if_changed(&mut store, &diagram).unwrap());
    }

    #[rstest]
    fn undecodable_blob_file_is_discarded_like_bad_json(tmp: TempDir) {
        let mut folder = BlobFolder::new(tmp.path());
        let path = folder.path_for(DEFAULT_STORAGE_KEY).unwrap();
        std::fs::write(&path, [0xff, 0xfe, b'{']).unwrap();
        let mut bridge = PersistenceBridge::default();
        let mut diagram = shop_diagram();

        let outcome = bridge.load(&mut folder, &mut diagram);

        assert!(matches!(outcome, LoadOutcome::Reset { .. }));
        assert!(diagram.is_empty());
        assert!(!path.exists());
        assert!(!bridge.save_if_changed(&mut folder, &diagram).unwrap());
    }

    #[test]
    fn dangling_persisted_edges_are_dropped_and_rewritten() {
        let mut store = MemoryBlobStore::new();
        store
            .set(
                DEFAULT_STORAGE_KEY,
                r#"{"nodes":[{"id":"3","data":{"className":"A"}},{"id":"12","data":{"className":"B"}}],
                   "edges":[{"id":"a","source":"3","target":"12","data":{"edgeIndex":5,"totalEdges":9}},
                            {"id":"b","source":"3","target":"77"}]}"#,
            )
            .unwrap();

        let mut bridge = PersistenceBridge::default();
        let mut diagram = Diagram::default();
        let outcome = bridge.load(&mut store, &mut diagram);

        assert_eq!(
            outcome,
            LoadOutcome::Restored {
                nodes: 2,
                edges: 1,
                dropped_edges: 1,
            }
        );
        let edge = &diagram.edges()[0];
        assert_eq!((edge.edge_index(), edge.total_edges()), (0, 1));
        assert_eq!(diagram.ids().peek(), 13);
        assert!(diagram.node(&NodeId::new("12").unwrap()).is_some());
        assert!(bridge.save_if_changed(&mut store, &diagram).unwrap());
    }

    #[test]
    fn unchanged_revision_is_not_saved_again() {
        let mut store = MemoryBlobStore::new();
        let (mut bridge, mut diagram) = loaded(&mut store);
        bridge.save_if_changed(&mut store, &diagram).unwrap();

        apply_op(&mut diagram, Op::ClearSelection);
        assert!(!bridge.save_if_changed(&mut store, &diagram).unwrap());

        apply_op(
            &mut diagram,
            Op::AddNode {
                position: Position::default(),
            },
        );
        assert!(bridge.save_if_changed(&mut store, &diagram).unwrap());
    }
}
