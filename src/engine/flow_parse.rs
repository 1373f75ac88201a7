// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowchart source parsing.
//!
//! Covers the subset the generator's system instruction steers models toward:
//! `graph`/`flowchart` headers, `[]`/`()`/`{}` node shapes, `-->`-style links
//! with optional `|label|`s, and statement chains. Styling statements are
//! skipped; structural errors are reported with their line number.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlowDirection {
    TopDown,
    BottomUp,
    LeftRight,
    RightLeft,
}

impl FlowDirection {
    pub(crate) fn is_vertical(self) -> bool {
        matches!(self, Self::TopDown | Self::BottomUp)
    }

    pub(crate) fn is_reversed(self) -> bool {
        matches!(self, Self::BottomUp | Self::RightLeft)
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "" | "TD" | "TB" => Some(Self::TopDown),
            "BT" => Some(Self::BottomUp),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeShape {
    Rect,
    Round,
    Diamond,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FlowNode {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkKind {
    Arrow,
    Open,
    Thick,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FlowEdge {
    pub from: usize,
    pub to: usize,
    pub label: Option<String>,
    pub kind: LinkKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FlowGraph {
    pub direction: FlowDirection,
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    index: BTreeMap<String, usize>,
}

impl FlowGraph {
    fn new(direction: FlowDirection) -> Self {
        Self {
            direction,
            nodes: Vec::new(),
            edges: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    pub(crate) fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// A later definition with an explicit label/shape refines a node that was
    /// first seen as a bare reference.
    fn ensure_node(&mut self, id: &str, label: Option<String>, shape: Option<NodeShape>) -> usize {
        if let Some(&idx) = self.index.get(id) {
            if let Some(label) = label {
                self.nodes[idx].label = label;
            }
            if let Some(shape) = shape {
                self.nodes[idx].shape = shape;
            }
            return idx;
        }

        let idx = self.nodes.len();
        self.nodes.push(FlowNode {
            id: id.to_owned(),
            label: label.unwrap_or_else(|| id.to_owned()),
            shape: shape.unwrap_or(NodeShape::Rect),
        });
        self.index.insert(id.to_owned(), idx);
        idx
    }
}

pub(crate) fn parse_flowchart(source: &str) -> Result<FlowGraph, ParseError> {
    let mut graph: Option<FlowGraph> = None;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with("%%") {
            continue;
        }

        match graph.as_mut() {
            None => {
                graph = Some(parse_header(line, line_no)?);
            }
            Some(graph) => {
                if skippable_statement(line) {
                    continue;
                }
                for statement in line.split(';') {
                    let statement = statement.trim();
                    if statement.is_empty() {
                        continue;
                    }
                    parse_statement(graph, statement, line_no)?;
                }
            }
        }
    }

    graph.ok_or_else(|| ParseError {
        line: 1,
        message: "expected a 'graph' or 'flowchart' header".to_owned(),
    })
}

fn parse_header(line: &str, line_no: usize) -> Result<FlowGraph, ParseError> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens.next().unwrap_or_default();
    if keyword != "graph" && keyword != "flowchart" {
        return Err(ParseError {
            line: line_no,
            message: format!("expected a 'graph' or 'flowchart' header, found {keyword:?}"),
        });
    }

    let direction_token = tokens.next().unwrap_or_default();
    let direction = FlowDirection::from_token(direction_token).ok_or_else(|| ParseError {
        line: line_no,
        message: format!("unknown direction {direction_token:?}"),
    })?;

    Ok(FlowGraph::new(direction))
}

/// Styling and grouping statements carry no structure we render; subgraph
/// membership is flattened.
fn skippable_statement(line: &str) -> bool {
    const SKIP_PREFIXES: [&str; 7] = [
        "subgraph ",
        "classDef ",
        "class ",
        "style ",
        "linkStyle ",
        "click ",
        "direction ",
    ];

    line == "end" || SKIP_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

struct Cursor<'a> {
    rest: &'a str,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(statement: &'a str, line: usize) -> Self {
        Self {
            rest: statement,
            line,
        }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn eat(&mut self, token: &str) -> bool {
        let current = self.rest;
        if let Some(rest) = current.strip_prefix(token) {
            self.rest = rest;
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line,
            message: message.into(),
        }
    }
}

fn parse_statement(graph: &mut FlowGraph, statement: &str, line_no: usize) -> Result<(), ParseError> {
    let mut cursor = Cursor::new(statement, line_no);

    cursor.skip_ws();
    let mut prev = parse_node_ref(graph, &mut cursor)?;

    loop {
        cursor.skip_ws();
        if cursor.at_end() {
            return Ok(());
        }

        let kind = parse_link(&mut cursor)?;
        cursor.skip_ws();
        let label = parse_edge_label(&mut cursor)?;
        cursor.skip_ws();
        let next = parse_node_ref(graph, &mut cursor)?;

        graph.edges.push(FlowEdge {
            from: prev,
            to: next,
            label,
            kind,
        });
        prev = next;
    }
}

fn parse_node_ref(graph: &mut FlowGraph, cursor: &mut Cursor<'_>) -> Result<usize, ParseError> {
    let rest = cursor.rest;
    let id_len = rest
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_alphanumeric() && *ch != '_')
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if id_len == 0 {
        return Err(cursor.error(format!("expected a node id, found {:?}", head(rest))));
    }

    let id = &rest[..id_len];
    let after_id = &rest[id_len..];

    const BRACKETS: [(&str, &str, NodeShape); 5] = [
        ("((", "))", NodeShape::Round),
        ("[[", "]]", NodeShape::Rect),
        ("[", "]", NodeShape::Rect),
        ("(", ")", NodeShape::Round),
        ("{", "}", NodeShape::Diamond),
    ];

    for (open, close, shape) in BRACKETS {
        let Some(body) = after_id.strip_prefix(open) else {
            continue;
        };
        let Some(end) = body.find(close) else {
            return Err(cursor.error(format!("unmatched '{open}' for node '{id}'")));
        };
        let label = unquote(body[..end].trim()).to_owned();
        cursor.rest = &body[end + close.len()..];
        return Ok(graph.ensure_node(id, Some(label), Some(shape)));
    }

    cursor.rest = after_id;
    Ok(graph.ensure_node(id, None, None))
}

fn parse_link(cursor: &mut Cursor<'_>) -> Result<LinkKind, ParseError> {
    const LINKS: [(&str, LinkKind); 4] = [
        ("-.->", LinkKind::Dotted),
        ("-->", LinkKind::Arrow),
        ("==>", LinkKind::Thick),
        ("---", LinkKind::Open),
    ];

    for (token, kind) in LINKS {
        if cursor.eat(token) {
            return Ok(kind);
        }
    }

    Err(cursor.error(format!("expected a link like '-->', found {:?}", head(cursor.rest))))
}

fn parse_edge_label(cursor: &mut Cursor<'_>) -> Result<Option<String>, ParseError> {
    if !cursor.eat("|") {
        return Ok(None);
    }

    let rest = cursor.rest;
    let Some(end) = rest.find('|') else {
        return Err(cursor.error("unclosed edge label, expected '|'"));
    };
    let label = unquote(rest[..end].trim()).to_owned();
    cursor.rest = &rest[end + 1..];
    Ok(Some(label))
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

fn head(rest: &str) -> &str {
    let end = rest
        .char_indices()
        .nth(8)
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    rest[..end].trim_end()
}
