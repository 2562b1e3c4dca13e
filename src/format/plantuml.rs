// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! PlantUML-ish class diagram text.
//!
//! Export writes one `class` block per node and one relationship line per edge, using the full
//! five-symbol vocabulary. Import is deliberately lenient: it never fails, it just skips what it
//! cannot read. Under [`ImportGrammar::Compatible`] relationship symbols only distinguish
//! aggregation from association, so an exported inheritance/composition/dependency edge comes
//! back as an association.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::OnceLock;

use rand::Rng;
use regex::Regex;

use crate::model::{
    ClassNode, EdgeId, IdAllocator, NodeId, Position, RelationshipEdge, RelationshipType,
    DEFAULT_EDGE_LABEL,
};

/// Imported classes are scattered uniformly over `[0, IMPORT_SPREAD)` on both axes.
pub const IMPORT_SPREAD: f64 = 500.0;

/// How relationship symbols are mapped to types on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportGrammar {
    /// A symbol containing `o` is an aggregation, everything else an association.
    #[default]
    Compatible,
    /// Recognizes every symbol the exporter writes.
    Extended,
}

impl ImportGrammar {
    pub fn relationship_type(self, symbol: &str) -> RelationshipType {
        match self {
            Self::Compatible if symbol.contains('o') => RelationshipType::Aggregation,
            Self::Compatible => RelationshipType::Association,
            Self::Extended => {
                if symbol.contains("<|") || symbol.contains("|>") {
                    RelationshipType::Inheritance
                } else if symbol.contains('*') {
                    RelationshipType::Composition
                } else if symbol.contains("..") {
                    RelationshipType::Dependency
                } else if symbol.contains('o') {
                    RelationshipType::Aggregation
                } else {
                    RelationshipType::Association
                }
            }
        }
    }
}

pub fn relationship_symbol(relationship_type: RelationshipType) -> &'static str {
    match relationship_type {
        RelationshipType::Inheritance => "<|--",
        RelationshipType::Aggregation => "o--",
        RelationshipType::Composition => "*--",
        RelationshipType::Dependency => "..>",
        RelationshipType::Association => "-->",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClass {
    pub name: String,
    pub attributes: Vec<String>,
    pub methods: Vec<String>,
}

/// A relationship whose endpoints resolved to parsed classes (indices into `classes`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRelation {
    pub source: usize,
    pub target: usize,
    pub relationship_type: RelationshipType,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedClassDiagram {
    pub classes: Vec<ParsedClass>,
    pub relations: Vec<ParsedRelation>,
}

fn is_plain_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn export_name(name: &str) -> String {
    if is_plain_name(name) {
        name.to_owned()
    } else {
        format!("\"{}\"", name.replace('"', "'"))
    }
}

pub fn export_class_diagram(nodes: &[ClassNode], edges: &[RelationshipEdge]) -> String {
    let names = nodes
        .iter()
        .map(|node| (node.id(), export_name(node.class_name())))
        .collect::<HashMap<&NodeId, String>>();

    let mut out = String::from("@startuml\n");
    for node in nodes {
        let _ = writeln!(out, "class {} {{", names[node.id()]);
        for line in node.attributes().iter().chain(node.methods()) {
            let _ = writeln!(out, "  {}", line.trim());
        }
        out.push_str("}\n");
    }

    if !edges.is_empty() {
        out.push('\n');
    }
    for edge in edges {
        let (Some(source), Some(target)) = (names.get(edge.source()), names.get(edge.target()))
        else {
            continue;
        };
        let symbol = relationship_symbol(edge.relationship_type());
        let _ = write!(out, "{source} {symbol} {target}");
        let label = edge.label().trim();
        if !label.is_empty() {
            let _ = write!(out, " : {label}");
        }
        out.push('\n');
    }

    out.push_str("@enduml\n");
    out
}

// Groups: quoted name, bare name, one-line body, multi-line body. A multi-line block closes on
// the first line holding only `}`, so braces inside members stay in the body.
fn class_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r#"(?m)^[ \t]*class[ \t]+(?:"([^"\n]*)"|([A-Za-z_][A-Za-z0-9_]*))[ \t]*\{"#,
            r#"(?:([^\n]*)\}[ \t\r]*$|[ \t\r]*\n((?s:.*?))^[ \t]*\}[ \t\r]*$)"#,
        ))
        .expect("class block regex must compile")
    })
}

// Groups: quoted source, bare source, symbol, quoted target, bare target, label.
fn relation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r#"^(?:"([^"]*)"|([A-Za-z_][A-Za-z0-9_]*))\s+"#,
            r#"([<|*o]*[-.]{2,}[>|*o]*)\s+"#,
            r#"(?:"([^"]*)"|([A-Za-z_][A-Za-z0-9_]*))\s*(?::\s*(.*))?$"#,
        ))
        .expect("relation regex must compile")
    })
}

fn captured_name(caps: &regex::Captures<'_>, quoted: usize, bare: usize) -> Option<String> {
    caps.get(quoted)
        .or_else(|| caps.get(bare))
        .map(|m| m.as_str().trim().to_owned())
}

fn is_ignorable_line(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with('\'') || trimmed.starts_with('@')
}

/// Parses class blocks and relationship lines. Relationships that name an unknown class are
/// dropped.
pub fn parse_class_diagram(input: &str, grammar: ImportGrammar) -> ParsedClassDiagram {
    let mut parsed = ParsedClassDiagram::default();

    for caps in class_block_regex().captures_iter(input) {
        let Some(name) = captured_name(&caps, 1, 2) else {
            continue;
        };
        let mut class = ParsedClass {
            name,
            attributes: Vec::new(),
            methods: Vec::new(),
        };
        let body = caps.get(3).or_else(|| caps.get(4)).map_or("", |m| m.as_str());
        for line in body.lines().map(str::trim) {
            if is_ignorable_line(line) {
                continue;
            }
            if line.contains('(') {
                class.methods.push(line.to_owned());
            } else {
                class.attributes.push(line.to_owned());
            }
        }
        parsed.classes.push(class);
    }

    let mut index_by_name = HashMap::new();
    for (index, class) in parsed.classes.iter().enumerate() {
        index_by_name.entry(class.name.clone()).or_insert(index);
    }

    let rest = class_block_regex().replace_all(input, "");
    for line in rest.lines().map(str::trim) {
        if is_ignorable_line(line) {
            continue;
        }
        let Some(caps) = relation_regex().captures(line) else {
            continue;
        };
        let (Some(source_name), Some(target_name)) =
            (captured_name(&caps, 1, 2), captured_name(&caps, 4, 5))
        else {
            continue;
        };
        let (Some(&source), Some(&target)) = (
            index_by_name.get(&source_name),
            index_by_name.get(&target_name),
        ) else {
            continue;
        };
        let symbol = caps.get(3).map_or("", |m| m.as_str());
        let label = caps
            .get(6)
            .map(|m| m.as_str().trim().to_owned())
            .filter(|label| !label.is_empty());
        parsed.relations.push(ParsedRelation {
            source,
            target,
            relationship_type: grammar.relationship_type(symbol),
            label,
        });
    }

    parsed
}

/// Turns parsed text into live records: fresh node ids from `ids`, random positions from `rng`.
pub fn into_records(
    parsed: ParsedClassDiagram,
    ids: &mut IdAllocator,
    rng: &mut impl Rng,
) -> (Vec<ClassNode>, Vec<RelationshipEdge>) {
    let nodes = parsed
        .classes
        .into_iter()
        .map(|class| {
            let position = Position::new(
                rng.gen_range(0.0..IMPORT_SPREAD),
                rng.gen_range(0.0..IMPORT_SPREAD),
            );
            ClassNode::new(ids.next_id(), position, class.name)
                .with_members(class.attributes, class.methods)
        })
        .collect::<Vec<_>>();

    let edges = parsed
        .relations
        .into_iter()
        .enumerate()
        .filter_map(|(index, relation)| {
            let source = nodes.get(relation.source)?.id().clone();
            let target = nodes.get(relation.target)?.id().clone();
            let edge_id = EdgeId::new(format!("edge-{source}-{target}-{index}")).ok()?;
            let mut edge = RelationshipEdge::new(edge_id, source, target);
            edge.set_relationship_type(relation.relationship_type);
            edge.set_label(relation.label.as_deref().unwrap_or(DEFAULT_EDGE_LABEL));
            Some(edge)
        })
        .collect();

    (nodes, edges)
}
