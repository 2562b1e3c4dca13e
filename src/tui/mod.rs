// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Stands in for the canvas: classes are listed as boxes with their sections, edges are listed
//! with their fan-out slot, and every key is turned into editor ops.

use std::{
    error::Error,
    fs, io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::editor::{Editor, EditorConfig};
use crate::model::fixtures::shop_diagram;
use crate::model::{
    ClassNode, DiagramSnapshot, EdgeId, NodeId, Section, SectionLayout, Viewport,
};
use crate::nav::NavKey;
use crate::ops::{Connection, Op};
use crate::store::{BlobStore, DiagramJson, MemoryBlobStore, DEFAULT_STORAGE_KEY};

const FOCUS_COLOR: Color = Color::LightGreen;
const PENDING_COLOR: Color = Color::Yellow;
const PLACEHOLDER_COLOR: Color = Color::DarkGray;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Runs the interactive terminal UI until the user quits.
///
/// `export_path` is where `x` writes the text export.
pub fn run<S: BlobStore>(editor: Editor<S>, export_path: PathBuf) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(editor, export_path);

    while !app.should_quit {
        app.expire_toast(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// An in-memory session preloaded with a small shop model.
pub fn demo_editor() -> Editor<MemoryBlobStore> {
    let diagram = shop_diagram();
    let mut store = MemoryBlobStore::new();
    let blob = DiagramJson::from_records(diagram.nodes(), diagram.edges())
        .to_json_string(DEFAULT_STORAGE_KEY)
        .and_then(|text| store.set(DEFAULT_STORAGE_KEY, &text));
    if let Err(err) = blob {
        log::warn!("cannot seed demo diagram: {err}");
    }
    Editor::open(store, EditorConfig::default())
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditTarget {
    Section { node_id: NodeId, section: Section },
    EdgeLabel(EdgeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InlineEdit {
    target: EditTarget,
    buffer: String,
}

struct App<S> {
    editor: Editor<S>,
    export_path: PathBuf,
    viewport: Viewport,
    canvas_size: (u16, u16),
    edit: Option<InlineEdit>,
    connect_from: Option<NodeId>,
    toast: Option<Toast>,
    should_quit: bool,
}

impl<S: BlobStore> App<S> {
    fn new(editor: Editor<S>, export_path: PathBuf) -> Self {
        Self {
            editor,
            export_path,
            viewport: Viewport::default(),
            canvas_size: (80, 24),
            edit: None,
            connect_from: None,
            toast: None,
            should_quit: false,
        }
    }

    fn snapshot(&self) -> DiagramSnapshot {
        self.editor.snapshot()
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.edit.is_some() {
            self.handle_edit_key(key);
        } else {
            self.handle_normal_key(key);
        }
        if let Some(err) = self.editor.take_save_error() {
            self.set_toast(format!("Save failed: {err}"));
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if let Some(nav_key) = NavKey::from_key_event(&key) {
            if !self.editor.handle_key(nav_key).is_consumed() {
                self.set_toast("Nothing selected");
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('a') => {
                let (width, height) = self.canvas_size;
                let position = self.viewport.center(f64::from(width), f64::from(height));
                self.editor.dispatch(Op::AddNode { position });
            }
            KeyCode::Char('+') => self.append_row(true),
            KeyCode::Char('m') => self.append_row(false),
            KeyCode::Char('i') | KeyCode::Enter => self.start_section_edit(),
            KeyCode::Char('c') => self.connect_gesture(),
            KeyCode::Char('e') => self.cycle_edge_selection(),
            KeyCode::Char('t') => self.cycle_edge_type(),
            KeyCode::Char('l') => self.start_label_edit(),
            KeyCode::Char('x') => self.export(),
            KeyCode::Esc => {
                self.connect_from = None;
                self.editor.dispatch(Op::ClearSelection);
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.edit = None,
            KeyCode::Enter => self.commit_edit(),
            KeyCode::Backspace => {
                edit.buffer.pop();
            }
            KeyCode::Char(ch) => edit.buffer.push(ch),
            _ => {}
        }
    }

    fn selected_node(&self) -> Option<&ClassNode> {
        let diagram = self.editor.diagram();
        diagram.selected_node_id().and_then(|id| diagram.node(id))
    }

    fn append_row(&mut self, attribute: bool) {
        let Some(node_id) = self.selected_node().map(|node| node.id().clone()) else {
            self.set_toast("Select a class first");
            return;
        };
        let op = if attribute {
            Op::AddAttribute {
                node_id,
                text: None,
            }
        } else {
            Op::AddMethod {
                node_id,
                text: None,
            }
        };
        self.editor.dispatch(op);
    }

    fn start_section_edit(&mut self) {
        let diagram = self.editor.diagram();
        let (Some(node), Some(section)) = (self.selected_node(), diagram.selected_section()) else {
            self.set_toast("Select a section to edit");
            return;
        };
        // The frame has no text of its own; editing it renames the class.
        let section = match section {
            Section::Frame => Section::ClassName,
            other => other,
        };
        let buffer = section_text(node, section).unwrap_or_default().to_owned();
        self.edit = Some(InlineEdit {
            target: EditTarget::Section {
                node_id: node.id().clone(),
                section,
            },
            buffer,
        });
    }

    fn start_label_edit(&mut self) {
        let diagram = self.editor.diagram();
        let Some(edge) = diagram.selected_edge_id().and_then(|id| diagram.edge(id)) else {
            self.set_toast("Select an edge first (e)");
            return;
        };
        self.edit = Some(InlineEdit {
            target: EditTarget::EdgeLabel(edge.id().clone()),
            buffer: edge.label().to_owned(),
        });
    }

    fn commit_edit(&mut self) {
        let Some(InlineEdit { target, buffer }) = self.edit.take() else {
            return;
        };
        let op = match target {
            EditTarget::Section { node_id, section } => Op::SetSectionText {
                node_id,
                section,
                text: buffer,
            },
            EditTarget::EdgeLabel(edge_id) => Op::UpdateEdgeLabel {
                edge_id,
                label: buffer,
            },
        };
        self.editor.dispatch(op);
    }

    fn connect_gesture(&mut self) {
        let Some(node_id) = self.selected_node().map(|node| node.id().clone()) else {
            self.set_toast("Select a class to connect from");
            return;
        };
        match self.connect_from.take() {
            None => {
                self.set_toast(format!("Connecting from #{node_id}: focus the target, press c"));
                self.connect_from = Some(node_id);
            }
            Some(source) => {
                let result = self.editor.dispatch(Op::Connect(Connection::new(
                    source.as_str(),
                    node_id.as_str(),
                )));
                if result.content_changed() {
                    self.set_toast(format!("Connected #{source} to #{node_id}"));
                }
            }
        }
    }

    fn cycle_edge_selection(&mut self) {
        let diagram = self.editor.diagram();
        let edges = diagram.edges();
        let next = match diagram.selected_edge_id() {
            None => edges.first(),
            Some(current) => edges
                .iter()
                .position(|edge| edge.id() == current)
                .and_then(|index| edges.get(index + 1)),
        }
        .map(|edge| edge.id().clone());
        self.editor.dispatch(Op::SelectEdge { edge_id: next });
    }

    fn cycle_edge_type(&mut self) {
        let diagram = self.editor.diagram();
        let Some(edge) = diagram.selected_edge_id().and_then(|id| diagram.edge(id)) else {
            self.set_toast("Select an edge first (e)");
            return;
        };
        let op = Op::UpdateRelationshipType {
            edge_id: edge.id().clone(),
            relationship_type: edge.relationship_type().cycle(),
        };
        self.editor.dispatch(op);
    }

    fn export(&mut self) {
        let text = self.editor.export_text();
        match write_export(&self.export_path, &text) {
            Ok(()) => {
                let message = format!("Exported to {}", self.export_path.display());
                self.set_toast(message);
            }
            Err(err) => self.set_toast(format!("Export failed: {err}")),
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }
}

fn write_export(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}

/// The editable text behind a section, or `None` for the frame and placeholder slots.
fn section_text(node: &ClassNode, section: Section) -> Option<&str> {
    match section {
        Section::Frame => None,
        Section::ClassName => Some(node.class_name()),
        Section::Attribute(row) => node.attributes().get(row).map(String::as_str),
        Section::Method(row) => node.methods().get(row).map(String::as_str),
    }
}

fn draw<S: BlobStore>(frame: &mut Frame<'_>, app: &mut App<S>) {
    let area = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[0]);
    app.canvas_size = (panes[0].width, panes[0].height);

    let snapshot = app.snapshot();
    let (lines, focus_line) = class_lines(&snapshot, app.connect_from.as_ref());
    let visible = panes[0].height.saturating_sub(2) as usize;
    let scroll = focus_line.map_or(0, |line| line.saturating_sub(visible / 2));
    let classes = Paragraph::new(Text::from(lines))
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Classes ({})", snapshot.nodes.len())),
        );
    frame.render_widget(classes, panes[0]);

    let items = edge_items(&snapshot);
    let mut state = ListState::default();
    state.select(
        snapshot
            .selected_edge_id
            .as_ref()
            .and_then(|id| snapshot.edges.iter().position(|edge| edge.id() == id)),
    );
    let edges = List::new(items)
        .highlight_style(Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::REVERSED))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Relationships ({})", snapshot.edges.len())),
        );
    frame.render_stateful_widget(edges, panes[1], &mut state);

    frame.render_widget(Paragraph::new(footer_line(app)), layout[1]);
}

/// Renders every class as a box of its sections. Also returns the line of the focused section.
fn class_lines(
    snapshot: &DiagramSnapshot,
    connect_from: Option<&NodeId>,
) -> (Vec<Line<'static>>, Option<usize>) {
    let mut lines = Vec::new();
    let mut focus_line = None;

    for node in snapshot.nodes.iter() {
        let layout = SectionLayout::of(node);
        let focused = snapshot
            .selection
            .section()
            .filter(|_| snapshot.selection.node_id() == Some(node.id()))
            .map(|section| layout.index_of(layout.clamp(section)));
        let frame_style = if connect_from == Some(node.id()) {
            Style::default().fg(PENDING_COLOR)
        } else if focused.is_some() {
            Style::default().fg(FOCUS_COLOR)
        } else {
            Style::default()
        };
        let section_style = |index: usize| {
            if focused == Some(index) {
                Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            }
        };

        let position = node.position();
        let title = format!("┌─ #{} ({:.0}, {:.0})", node.id(), position.x, position.y);
        let title_style = if focused == Some(0) {
            frame_style.add_modifier(Modifier::REVERSED)
        } else {
            frame_style
        };
        if focused.is_some() {
            focus_line = Some(lines.len());
        }
        lines.push(Line::from(Span::styled(title, title_style)));

        for index in 1..layout.total() {
            let section = layout.section_at(index);
            if index == 2 || index == 2 + layout.attr_slots() {
                lines.push(Line::from(Span::styled("├─", frame_style)));
            }
            let (text, placeholder) = match (section_text(node, section), section) {
                (Some(text), _) => (text.to_owned(), false),
                (None, Section::Attribute(_)) => ("Add Attribute".to_owned(), true),
                (None, _) => ("Add Method".to_owned(), true),
            };
            let mut style = section_style(index);
            if placeholder {
                style = style.fg(PLACEHOLDER_COLOR);
            }
            if section == Section::ClassName {
                style = style.add_modifier(Modifier::BOLD);
            }
            lines.push(Line::from(vec![
                Span::styled("│ ", frame_style),
                Span::styled(text, style),
            ]));
        }
        lines.push(Line::from(Span::styled("└─", frame_style)));
    }

    (lines, focus_line)
}

fn edge_items(snapshot: &DiagramSnapshot) -> Vec<ListItem<'static>> {
    let name_of = |id: &NodeId| {
        snapshot
            .nodes
            .iter()
            .find(|node| node.id() == id)
            .map_or_else(|| format!("#{id}"), |node| node.class_name().to_owned())
    };
    snapshot
        .edges
        .iter()
        .map(|edge| {
            ListItem::new(format!(
                "{} {} {}  {:?}  [{}/{}] {:+.0}",
                name_of(edge.source()),
                crate::format::relationship_symbol(edge.relationship_type()),
                name_of(edge.target()),
                edge.label(),
                edge.edge_index() + 1,
                edge.total_edges(),
                edge.visual_offset(),
            ))
        })
        .collect()
}

fn footer_line<S: BlobStore>(app: &App<S>) -> Line<'static> {
    if let Some(edit) = &app.edit {
        let what = match &edit.target {
            EditTarget::Section { .. } => "Edit",
            EditTarget::EdgeLabel(_) => "Label",
        };
        return Line::from(vec![
            Span::styled(format!("{what}: "), Style::default().fg(FOOTER_KEY_COLOR)),
            Span::raw(format!("{}▏", edit.buffer)),
            Span::styled(
                "  Enter commit  Esc cancel",
                Style::default().fg(FOOTER_LABEL_COLOR),
            ),
        ]);
    }
    if let Some(toast) = &app.toast {
        return Line::from(Span::raw(toast.message.clone()));
    }

    let hints = [
        ("Tab", "next"),
        ("Del", "delete"),
        ("a", "class"),
        ("+", "attr"),
        ("m", "method"),
        ("i", "edit"),
        ("c", "connect"),
        ("e", "edge"),
        ("t", "type"),
        ("l", "label"),
        ("x", "export"),
        ("q", "quit"),
    ];
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(key, Style::default().fg(FOOTER_KEY_COLOR)));
        spans.push(Span::styled(
            format!(" {label}  "),
            Style::default().fg(FOOTER_LABEL_COLOR),
        ));
    }
    Line::from(spans)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
