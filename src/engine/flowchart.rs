// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::canvas::Canvas;
use super::flow_layout::{layout_flowchart, FlowLayout};
use super::flow_parse::{parse_flowchart, FlowGraph, LinkKind};
use super::svg::emit_svg;
use super::{DiagramEngine, EngineConfig, EngineError, RenderRequest, Rendered, SecurityLevel};

/// The built-in engine behind the preview pipeline.
#[derive(Debug, Clone, Default)]
pub struct FlowchartEngine {
    config: EngineConfig,
}

impl FlowchartEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl DiagramEngine for FlowchartEngine {
    fn render(&self, request: RenderRequest<'_>) -> Result<Rendered, EngineError> {
        let mut graph = parse_flowchart(request.source()).map_err(|err| EngineError::Parse {
            line: err.line,
            message: err.message,
        })?;

        if self.config.security_level == SecurityLevel::Strict {
            sanitize_labels(&mut graph);
        }

        let layout = layout_flowchart(&graph);
        let canvas = render_canvas(&graph, &layout);
        let svg = emit_svg(&graph, &layout, &self.config);

        Ok(Rendered::new(request.render_id(), svg, canvas))
    }
}

fn sanitize_labels(graph: &mut FlowGraph) {
    let strip = |label: &str| -> String {
        label.chars().filter(|ch| !matches!(ch, '<' | '>' | '&')).collect()
    };
    for node in &mut graph.nodes {
        node.label = strip(&node.label);
    }
    for edge in &mut graph.edges {
        if let Some(label) = &edge.label {
            edge.label = Some(strip(label));
        }
    }
}

fn render_canvas(graph: &FlowGraph, layout: &FlowLayout) -> Vec<String> {
    let back_count = layout.back_edges.iter().filter(|&&b| b).count();
    let label_slack = graph
        .edges
        .iter()
        .filter_map(|edge| edge.label.as_ref())
        .map(|label| label.chars().count() + 3)
        .max()
        .unwrap_or(0);

    let (extra_w, extra_h) = if graph.direction.is_vertical() {
        (back_count * 2 + usize::from(back_count > 0) + label_slack, 0)
    } else {
        (label_slack, back_count * 2 + usize::from(back_count > 0))
    };

    let mut canvas = Canvas::new(layout.width + extra_w, layout.height + extra_h);

    for (node, node_box) in graph.nodes.iter().zip(&layout.boxes) {
        canvas.draw_box(
            node_box.x,
            node_box.y,
            node_box.width,
            node_box.height,
            node.shape,
            &node.label,
        );
    }

    let mut lane = 0;
    for (edge_idx, edge) in graph.edges.iter().enumerate() {
        if layout.back_edges[edge_idx] {
            if graph.direction.is_vertical() {
                draw_back_edge_vertical(&mut canvas, graph, layout, edge_idx, layout.width + 1 + lane * 2);
            } else {
                draw_back_edge_horizontal(&mut canvas, graph, layout, edge_idx, layout.height + 1 + lane * 2);
            }
            lane += 1;
        } else if graph.direction.is_vertical() {
            draw_forward_edge_vertical(&mut canvas, graph, layout, edge_idx);
        } else {
            draw_forward_edge_horizontal(&mut canvas, graph, layout, edge_idx);
        }
    }

    canvas.into_lines()
}

fn corner(going_down: bool, going_right: bool, entering_horizontal: bool) -> char {
    // `entering_horizontal` is the glyph where a vertical run turns into a
    // horizontal one; the other is where the horizontal run turns vertical.
    match (going_down, going_right, entering_horizontal) {
        (true, true, true) => '└',
        (true, false, true) => '┘',
        (false, true, true) => '┌',
        (false, false, true) => '┐',
        (true, true, false) => '┐',
        (true, false, false) => '┌',
        (false, true, false) => '┘',
        (false, false, false) => '└',
    }
}

fn line_char(kind: LinkKind, vertical: bool) -> char {
    match (kind, vertical) {
        (LinkKind::Thick, true) => '┃',
        (LinkKind::Thick, false) => '━',
        (LinkKind::Dotted, true) => '┊',
        (LinkKind::Dotted, false) => '┄',
        (_, true) => '│',
        (_, false) => '─',
    }
}

fn draw_forward_edge_vertical(
    canvas: &mut Canvas,
    graph: &FlowGraph,
    layout: &FlowLayout,
    edge_idx: usize,
) {
    let edge = &graph.edges[edge_idx];
    let from = &layout.boxes[edge.from];
    let to = &layout.boxes[edge.to];

    let fx = from.center_x();
    let tx = to.center_x();

    let going_down = to.y > from.bottom();
    let (start_y, end_y) = if going_down {
        (from.bottom() + 1, to.y.saturating_sub(1))
    } else if from.y > to.bottom() {
        (from.y.saturating_sub(1), to.bottom() + 1)
    } else {
        return;
    };

    let vch = line_char(edge.kind, true);
    let hch = line_char(edge.kind, false);
    let arrow = match (edge.kind, going_down) {
        (LinkKind::Open, _) => vch,
        (_, true) => '▼',
        (_, false) => '▲',
    };

    if fx == tx {
        canvas.draw_vline(fx, start_y, if going_down { end_y.saturating_sub(1) } else { end_y + 1 }, vch);
        canvas.set(fx, end_y, arrow);
    } else {
        let going_right = tx > fx;
        if (start_y as i64 - end_y as i64).unsigned_abs() as usize >= 1 {
            let step = if going_down { 1 } else { -1i64 };
            let second = (start_y as i64 + step) as usize;
            canvas.draw_vline(tx, second, if going_down { end_y.saturating_sub(1) } else { end_y + 1 }, vch);
        }
        if tx > fx + 1 || fx > tx + 1 {
            let (lo, hi) = if going_right { (fx + 1, tx - 1) } else { (tx + 1, fx - 1) };
            if lo <= hi {
                canvas.draw_hline(lo, hi, start_y, hch);
            }
        }
        canvas.set(fx, start_y, corner(going_down, going_right, true));
        canvas.set(tx, start_y, corner(going_down, going_right, false));
        canvas.set(tx, end_y, arrow);
    }

    if let Some(label) = &edge.label {
        let label_x = fx.max(tx) + 2;
        canvas.draw_text(label_x, start_y, label);
    }
}

fn draw_forward_edge_horizontal(
    canvas: &mut Canvas,
    graph: &FlowGraph,
    layout: &FlowLayout,
    edge_idx: usize,
) {
    let edge = &graph.edges[edge_idx];
    let from = &layout.boxes[edge.from];
    let to = &layout.boxes[edge.to];

    let fy = from.center_y();
    let ty = to.center_y();

    let going_right = to.x > from.right();
    let (start_x, end_x) = if going_right {
        (from.right() + 1, to.x.saturating_sub(1))
    } else if from.x > to.right() {
        (from.x.saturating_sub(1), to.right() + 1)
    } else {
        return;
    };

    let vch = line_char(edge.kind, true);
    let hch = line_char(edge.kind, false);
    let arrow = match (edge.kind, going_right) {
        (LinkKind::Open, _) => hch,
        (_, true) => '▶',
        (_, false) => '◀',
    };

    if fy == ty {
        canvas.draw_hline(start_x, if going_right { end_x.saturating_sub(1) } else { end_x + 1 }, fy, hch);
        canvas.set(end_x, fy, arrow);
    } else {
        let going_down = ty > fy;
        let (lo, hi) = if going_down { (fy + 1, ty - 1) } else { (ty + 1, fy - 1) };
        if lo <= hi {
            canvas.draw_vline(start_x, lo, hi, vch);
        }
        canvas.set(start_x, fy, corner(going_down, going_right, false));
        canvas.set(start_x, ty, corner(going_down, going_right, true));
        let (hlo, hhi) = if going_right { (start_x + 1, end_x.saturating_sub(1)) } else { (end_x + 1, start_x.saturating_sub(1)) };
        if hlo <= hhi {
            canvas.draw_hline(hlo, hhi, ty, hch);
        }
        canvas.set(end_x, ty, arrow);
    }

    if let Some(label) = &edge.label {
        canvas.draw_text(start_x + 1, fy.min(ty).saturating_sub(1).max(0), label);
    }
}

fn draw_back_edge_vertical(
    canvas: &mut Canvas,
    graph: &FlowGraph,
    layout: &FlowLayout,
    edge_idx: usize,
    lane_x: usize,
) {
    let edge = &graph.edges[edge_idx];
    let from = &layout.boxes[edge.from];
    let to = &layout.boxes[edge.to];

    let from_y = from.center_y();
    let to_y = to.center_y();

    canvas.draw_hline(from.right() + 1, lane_x.saturating_sub(1), from_y, '─');
    if from_y.abs_diff(to_y) >= 2 {
        canvas.draw_vline(lane_x, to_y.min(from_y) + 1, to_y.max(from_y) - 1, '│');
    }
    canvas.set(lane_x, from_y, if to_y < from_y { '┘' } else { '┐' });
    canvas.set(lane_x, to_y, if to_y < from_y { '┐' } else { '┘' });
    canvas.draw_hline(to.right() + 2, lane_x.saturating_sub(1), to_y, '─');
    canvas.set(to.right() + 1, to_y, '◀');
}

fn draw_back_edge_horizontal(
    canvas: &mut Canvas,
    graph: &FlowGraph,
    layout: &FlowLayout,
    edge_idx: usize,
    lane_y: usize,
) {
    let edge = &graph.edges[edge_idx];
    let from = &layout.boxes[edge.from];
    let to = &layout.boxes[edge.to];

    let from_x = from.center_x();
    let to_x = to.center_x();

    canvas.draw_vline(from_x, from.bottom() + 1, lane_y.saturating_sub(1), '│');
    if from_x.abs_diff(to_x) >= 2 {
        canvas.draw_hline(from_x.min(to_x) + 1, from_x.max(to_x) - 1, lane_y, '─');
    }
    canvas.set(from_x, lane_y, if to_x < from_x { '┘' } else { '└' });
    canvas.set(to_x, lane_y, if to_x < from_x { '└' } else { '┘' });
    canvas.draw_vline(to_x, to.bottom() + 2, lane_y.saturating_sub(1), '│');
    canvas.set(to_x, to.bottom() + 1, '▲');
}
