// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One open diagram session.
//!
//! [`Editor`] owns the diagram and its blob store. Every op, key press, import, and clear goes
//! through it and is written through to the store once it has been applied.

use rand::Rng;

use crate::format::{export_class_diagram, into_records, parse_class_diagram, ImportGrammar};
use crate::model::{Diagram, DiagramSnapshot};
use crate::nav::{self, KeyOutcome, NavKey};
use crate::ops::{apply_op, apply_ops, replace_contents, ApplyResult, Op};
use crate::store::{BlobStore, LoadOutcome, PersistenceBridge, StoreError, DEFAULT_STORAGE_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub storage_key: String,
    pub import_grammar: ImportGrammar,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            import_grammar: ImportGrammar::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub classes: usize,
    pub relationships: usize,
}

#[derive(Debug)]
pub struct Editor<S> {
    diagram: Diagram,
    store: S,
    bridge: PersistenceBridge,
    config: EditorConfig,
    load_outcome: LoadOutcome,
    save_error: Option<StoreError>,
}

impl<S: BlobStore> Editor<S> {
    /// Opens a session, loading (or seeding) the diagram from `store`.
    pub fn open(mut store: S, config: EditorConfig) -> Self {
        let mut bridge = PersistenceBridge::new(config.storage_key.clone());
        let mut diagram = Diagram::default();
        let load_outcome = bridge.load(&mut store, &mut diagram);

        let mut editor = Self {
            diagram,
            store,
            bridge,
            config,
            load_outcome,
            save_error: None,
        };
        editor.persist();
        editor
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn snapshot(&self) -> DiagramSnapshot {
        self.diagram.snapshot()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// The most recent failed write-through, if it has not been taken yet.
    pub fn take_save_error(&mut self) -> Option<StoreError> {
        self.save_error.take()
    }

    pub fn dispatch(&mut self, op: Op) -> ApplyResult {
        let result = apply_op(&mut self.diagram, op);
        self.persist();
        result
    }

    pub fn dispatch_all(&mut self, ops: impl IntoIterator<Item = Op>) -> ApplyResult {
        let result = apply_ops(&mut self.diagram, ops);
        self.persist();
        result
    }

    pub fn handle_key(&mut self, key: NavKey) -> KeyOutcome {
        let outcome = nav::handle_key(&mut self.diagram, key);
        if outcome.is_consumed() {
            self.persist();
        }
        outcome
    }

    /// Replaces the diagram contents with the classes and relationships parsed from `text`.
    ///
    /// Imported classes get fresh ids and positions drawn from `rng`.
    pub fn import_text(&mut self, text: &str, rng: &mut impl Rng) -> ImportSummary {
        let parsed = parse_class_diagram(text, self.config.import_grammar);
        let (nodes, edges) = into_records(parsed, self.diagram.ids_mut(), rng);
        let summary = ImportSummary {
            classes: nodes.len(),
            relationships: edges.len(),
        };
        replace_contents(&mut self.diagram, nodes, edges);
        log::debug!(
            "imported {} class(es) and {} relationship(s)",
            summary.classes,
            summary.relationships
        );
        self.persist();
        summary
    }

    pub fn export_text(&self) -> String {
        export_class_diagram(self.diagram.nodes(), self.diagram.edges())
    }

    pub fn clear(&mut self) -> ApplyResult {
        self.dispatch(Op::Clear)
    }

    fn persist(&mut self) {
        match self.bridge.save_if_changed(&mut self.store, &self.diagram) {
            Ok(_) => {}
            Err(err) => {
                log::warn!("cannot save diagram {:?}: {err}", self.bridge.key());
                self.save_error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{Editor, EditorConfig, ImportSummary};
    use crate::format::ImportGrammar;
    use crate::model::{NodeId, Position, RelationshipType, Selection};
    use crate::nav::NavKey;
    use crate::ops::{Connection, Op};
    use crate::store::{
        BlobStore, DiagramJson, LoadOutcome, MemoryBlobStore, StoreError, DEFAULT_STORAGE_KEY,
    };

    fn persisted(store: &MemoryBlobStore) -> DiagramJson {
        let text = store
            .get(DEFAULT_STORAGE_KEY)
            .unwrap()
            .expect("blob is written");
        DiagramJson::from_json_str(DEFAULT_STORAGE_KEY, &text).unwrap()
    }

    #[test]
    fn open_seeds_and_writes_through() {
        let editor = Editor::open(MemoryBlobStore::new(), EditorConfig::default());

        assert_eq!(editor.load_outcome(), &LoadOutcome::Seeded);
        assert_eq!(persisted(editor.store()).nodes.len(), 1);
    }

    #[test]
    fn every_content_change_is_written_through() {
        let mut editor = Editor::open(MemoryBlobStore::new(), EditorConfig::default());

        editor.dispatch(Op::AddNode {
            position: Position::new(300.0, 80.0),
        });
        editor.dispatch(Op::Connect(Connection::new("1", "2")));

        let json = persisted(editor.store());
        assert_eq!(json.nodes.len(), 2);
        assert_eq!(json.edges.len(), 1);
        assert_eq!(json.edges[0].source, "1");
    }

    #[test]
    fn reopening_restores_the_session() {
        let mut editor = Editor::open(MemoryBlobStore::new(), EditorConfig::default());
        editor.dispatch(Op::AddNode {
            position: Position::default(),
        });
        let store = editor.store().clone();

        let mut reopened = Editor::open(store, EditorConfig::default());
        reopened.dispatch(Op::AddNode {
            position: Position::default(),
        });

        let ids = reopened
            .diagram()
            .nodes()
            .iter()
            .map(|node| node.id().as_str().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn keys_go_through_the_navigator() {
        let mut editor = Editor::open(MemoryBlobStore::new(), EditorConfig::default());

        assert!(editor.handle_key(NavKey::Tab).is_consumed());
        assert_eq!(
            editor.diagram().selection(),
            &Selection::Frame(NodeId::new("1").unwrap())
        );

        editor.handle_key(NavKey::Delete);
        assert!(editor.diagram().nodes().is_empty());
        assert!(persisted(editor.store()).nodes.is_empty());
    }

    #[test]
    fn import_replaces_contents_with_fresh_ids() {
        let mut editor = Editor::open(MemoryBlobStore::new(), EditorConfig::default());
        let mut rng = StdRng::seed_from_u64(1);

        let summary = editor.import_text(
            "class A {\n  x: i32\n  y()\n}\nclass B {\n}\nA ..> B\nA --> Missing\n",
            &mut rng,
        );

        assert_eq!(
            summary,
            ImportSummary {
                classes: 2,
                relationships: 1,
            }
        );
        let names = editor
            .diagram()
            .nodes()
            .iter()
            .map(|node| (node.id().as_str().to_owned(), node.class_name().to_owned()))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [("2".to_owned(), "A".to_owned()), ("3".to_owned(), "B".to_owned())]
        );
        assert_eq!(persisted(editor.store()).nodes.len(), 2);
    }

    #[test]
    fn extended_grammar_keeps_dependency_through_export_and_import() {
        let config = EditorConfig {
            import_grammar: ImportGrammar::Extended,
            ..EditorConfig::default()
        };
        let mut editor = Editor::open(MemoryBlobStore::new(), config);
        editor.dispatch(Op::AddNode {
            position: Position::default(),
        });
        editor.dispatch(Op::Connect(Connection::new("1", "2")));
        let edge_id = editor.diagram().edges()[0].id().clone();
        editor.dispatch(Op::UpdateRelationshipType {
            edge_id,
            relationship_type: RelationshipType::Dependency,
        });

        let text = editor.export_text();
        editor.import_text(&text, &mut StdRng::seed_from_u64(3));

        assert_eq!(editor.diagram().edges().len(), 1);
        assert_eq!(
            editor.diagram().edges()[0].relationship_type(),
            RelationshipType::Dependency
        );
    }

    #[test]
    fn clear_empties_the_persisted_blob() {
        let mut editor = Editor::open(MemoryBlobStore::new(), EditorConfig::default());

        editor.clear();

        assert!(editor.diagram().is_empty());
        let json = persisted(editor.store());
        assert!(json.nodes.is_empty() && json.edges.is_empty());
    }

    struct FailingStore;

    impl BlobStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::InvalidKey {
                key: key.to_owned(),
            })
        }

        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn failed_saves_are_kept_for_the_front_end() {
        let mut editor = Editor::open(FailingStore, EditorConfig::default());
        assert!(editor.take_save_error().is_some());
        assert!(editor.take_save_error().is_none());

        editor.dispatch(Op::AddNode {
            position: Position::default(),
        });

        assert_eq!(editor.diagram().nodes().len(), 2);
        assert!(editor.take_save_error().is_some());
    }
}
