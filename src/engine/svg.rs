// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Vector-markup emission for a laid-out flowchart.
//!
//! Cell coordinates from the layout are scaled to pixels; nodes become
//! rects/polygons and edges become marker-tipped lines or curves depending on
//! the configured curve style.

use super::flow_layout::{FlowLayout, NodeBox};
use super::flow_parse::{FlowGraph, LinkKind, NodeShape};
use super::{CurveStyle, EngineConfig};

const CELL_W: i64 = 10;
const CELL_H: i64 = 20;
const MARGIN: i64 = 20;
const FONT_SIZE: i64 = 14;

pub(crate) fn emit_svg(graph: &FlowGraph, layout: &FlowLayout, config: &EngineConfig) -> String {
    let vars = &config.theme_variables;
    let width = layout.width as i64 * CELL_W + 2 * MARGIN;
    let height = layout.height as i64 * CELL_H + 2 * MARGIN;

    let mut out = String::with_capacity(1024);
    out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\"");
    if config.flowchart.use_max_width {
        out.push_str(" width=\"100%\"");
    } else {
        push_attr_num(&mut out, " width", width);
    }
    out.push_str(" viewBox=\"0 0 ");
    push_num(&mut out, width);
    out.push(' ');
    push_num(&mut out, height);
    out.push_str("\">");

    out.push_str("<defs><marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"9\" refY=\"5\" markerWidth=\"7\" markerHeight=\"7\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"");
    out.push_str(vars.line_color);
    out.push_str("\"/></marker></defs>");

    out.push_str("<rect width=\"100%\" height=\"100%\" fill=\"");
    out.push_str(vars.background_color);
    out.push_str("\"/>");

    for (edge_idx, edge) in graph.edges.iter().enumerate() {
        let from = &layout.boxes[edge.from];
        let to = &layout.boxes[edge.to];
        let reversed = layout.back_edges[edge_idx];
        let (x0, y0, x1, y1) = endpoints(graph, from, to, reversed);

        let dashed = edge.kind == LinkKind::Dotted;
        let thick = edge.kind == LinkKind::Thick;
        let arrowed = edge.kind != LinkKind::Open;

        match config.flowchart.curve {
            CurveStyle::Linear => {
                out.push_str("<line");
                push_attr_num(&mut out, " x1", x0);
                push_attr_num(&mut out, " y1", y0);
                push_attr_num(&mut out, " x2", x1);
                push_attr_num(&mut out, " y2", y1);
                push_edge_style(&mut out, vars.line_color, dashed, thick, arrowed);
            }
            CurveStyle::Basis => {
                // One quadratic bend through the midpoint, offset sideways.
                let (mx, my) = curve_control(x0, y0, x1, y1);
                out.push_str("<path fill=\"none\" d=\"M ");
                push_num(&mut out, x0);
                out.push(' ');
                push_num(&mut out, y0);
                out.push_str(" Q ");
                push_num(&mut out, mx);
                out.push(' ');
                push_num(&mut out, my);
                out.push(' ');
                push_num(&mut out, x1);
                out.push(' ');
                push_num(&mut out, y1);
                out.push('"');
                push_edge_style(&mut out, vars.line_color, dashed, thick, arrowed);
            }
        }

        if let Some(label) = &edge.label {
            out.push_str("<text text-anchor=\"middle\"");
            push_attr_num(&mut out, " x", (x0 + x1) / 2);
            push_attr_num(&mut out, " y", (y0 + y1) / 2 - 4);
            push_attr_num(&mut out, " font-size", FONT_SIZE - 2);
            out.push_str(" fill=\"");
            out.push_str(vars.line_color);
            out.push_str("\">");
            push_escaped(&mut out, label);
            out.push_str("</text>");
        }
    }

    for (node, node_box) in graph.nodes.iter().zip(&layout.boxes) {
        let x = node_box.x as i64 * CELL_W + MARGIN;
        let y = node_box.y as i64 * CELL_H + MARGIN;
        let w = node_box.width as i64 * CELL_W;
        let h = node_box.height as i64 * CELL_H;

        match node.shape {
            NodeShape::Rect | NodeShape::Round => {
                out.push_str("<rect");
                push_attr_num(&mut out, " x", x);
                push_attr_num(&mut out, " y", y);
                push_attr_num(&mut out, " width", w);
                push_attr_num(&mut out, " height", h);
                if node.shape == NodeShape::Round {
                    push_attr_num(&mut out, " rx", h / 2);
                }
                push_node_style(&mut out, config);
            }
            NodeShape::Diamond => {
                out.push_str("<polygon points=\"");
                push_point(&mut out, x + w / 2, y);
                push_point(&mut out, x + w, y + h / 2);
                push_point(&mut out, x + w / 2, y + h);
                push_point(&mut out, x, y + h / 2);
                out.push('"');
                push_node_style(&mut out, config);
            }
        }

        out.push_str("<text text-anchor=\"middle\" dominant-baseline=\"middle\"");
        push_attr_num(&mut out, " x", x + w / 2);
        push_attr_num(&mut out, " y", y + h / 2);
        push_attr_num(&mut out, " font-size", FONT_SIZE);
        out.push_str(" font-family=\"sans-serif\" fill=\"");
        out.push_str(vars.primary_text_color);
        out.push_str("\">");
        push_escaped(&mut out, &node.label);
        out.push_str("</text>");
    }

    out.push_str("</svg>");
    out
}

fn endpoints(
    graph: &FlowGraph,
    from: &NodeBox,
    to: &NodeBox,
    reversed: bool,
) -> (i64, i64, i64, i64) {
    let (fx, fy, tx, ty) = if graph.direction.is_vertical() {
        if reversed {
            // Back edges leave the side and re-enter the side.
            (from.right() + 1, from.center_y(), to.right() + 1, to.center_y())
        } else {
            (from.center_x(), from.bottom() + 1, to.center_x(), to.y)
        }
    } else if reversed {
        (from.center_x(), from.bottom() + 1, to.center_x(), to.bottom() + 1)
    } else {
        (from.right() + 1, from.center_y(), to.x, to.center_y())
    };

    (
        fx as i64 * CELL_W + MARGIN,
        fy as i64 * CELL_H + MARGIN,
        tx as i64 * CELL_W + MARGIN,
        ty as i64 * CELL_H + MARGIN,
    )
}

fn curve_control(x0: i64, y0: i64, x1: i64, y1: i64) -> (i64, i64) {
    let mx = (x0 + x1) / 2;
    let my = (y0 + y1) / 2;
    // Perpendicular nudge keeps parallel edges visually apart.
    let dx = x1 - x0;
    let dy = y1 - y0;
    (mx + dy.signum() * 8, my - dx.signum() * 8)
}

fn push_edge_style(out: &mut String, line_color: &str, dashed: bool, thick: bool, arrowed: bool) {
    out.push_str(" stroke=\"");
    out.push_str(line_color);
    out.push('"');
    push_attr_num(out, " stroke-width", if thick { 3 } else { 2 });
    if dashed {
        out.push_str(" stroke-dasharray=\"4 4\"");
    }
    if arrowed {
        out.push_str(" marker-end=\"url(#arrow)\"");
    }
    out.push_str("/>");
}

fn push_node_style(out: &mut String, config: &EngineConfig) {
    let vars = &config.theme_variables;
    out.push_str(" fill=\"");
    out.push_str(vars.primary_color);
    out.push_str("\" stroke=\"");
    out.push_str(vars.primary_border_color);
    out.push_str("\" stroke-width=\"2\"/>");
}

fn push_point(out: &mut String, x: i64, y: i64) {
    push_num(out, x);
    out.push(',');
    push_num(out, y);
    out.push(' ');
}

fn push_num(out: &mut String, value: i64) {
    let mut buffer = itoa::Buffer::new();
    out.push_str(buffer.format(value));
}

fn push_attr_num(out: &mut String, name_with_space: &str, value: i64) {
    out.push_str(name_with_space);
    out.push_str("=\"");
    push_num(out, value);
    out.push('"');
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
