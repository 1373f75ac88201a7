// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layered flowchart layout.
//!
//! Back edges are detected first so cycles cannot push layers apart; forward
//! edges then get longest-path layers, and layers become rows (vertical
//! directions) or columns (horizontal directions) of cell coordinates.

use smallvec::SmallVec;

use super::flow_parse::{FlowGraph, NodeShape};

pub(crate) const BOX_HEIGHT: usize = 3;
pub(crate) const ROW_GAP: usize = 2;
pub(crate) const COL_GAP: usize = 3;
pub(crate) const H_COL_GAP: usize = 6;
pub(crate) const H_ROW_GAP: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl NodeBox {
    pub(crate) fn center_x(&self) -> usize {
        self.x + self.width / 2
    }

    pub(crate) fn center_y(&self) -> usize {
        self.y + self.height / 2
    }

    pub(crate) fn right(&self) -> usize {
        self.x + self.width - 1
    }

    pub(crate) fn bottom(&self) -> usize {
        self.y + self.height - 1
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FlowLayout {
    pub boxes: Vec<NodeBox>,
    pub layers: Vec<SmallVec<[usize; 8]>>,
    pub node_layer: Vec<usize>,
    pub back_edges: Vec<bool>,
    pub width: usize,
    pub height: usize,
}

pub(crate) fn layout_flowchart(graph: &FlowGraph) -> FlowLayout {
    let node_count = graph.nodes.len();
    let back_edges = find_back_edges(graph);
    let node_layer = assign_layers(graph, &back_edges);

    let layer_count = node_layer.iter().copied().max().map_or(0, |max| max + 1);
    let mut layers: Vec<SmallVec<[usize; 8]>> = vec![SmallVec::new(); layer_count];
    for node in 0..node_count {
        let mut layer = node_layer[node];
        if graph.direction.is_reversed() {
            layer = layer_count - 1 - layer;
        }
        layers[layer].push(node);
    }

    let mut boxes = vec![
        NodeBox {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        };
        node_count
    ];

    if graph.direction.is_vertical() {
        place_vertical(graph, &layers, &mut boxes);
    } else {
        place_horizontal(graph, &layers, &mut boxes);
    }

    let width = boxes.iter().map(|b| b.x + b.width).max().unwrap_or(0);
    let height = boxes.iter().map(|b| b.y + b.height).max().unwrap_or(0);

    FlowLayout {
        boxes,
        layers,
        node_layer,
        back_edges,
        width,
        height,
    }
}

fn box_width(graph: &FlowGraph, node: usize) -> usize {
    let label_width = graph.nodes[node].label.chars().count().max(1);
    // Diamonds get one extra pad column per side so the slanted corners read.
    let pad = match graph.nodes[node].shape {
        NodeShape::Diamond => 3,
        _ => 2,
    };
    label_width + 2 * pad
}

fn place_vertical(graph: &FlowGraph, layers: &[SmallVec<[usize; 8]>], boxes: &mut [NodeBox]) {
    let mut layer_widths = Vec::with_capacity(layers.len());
    for layer in layers {
        let total: usize = layer.iter().map(|&node| box_width(graph, node)).sum();
        let gaps = layer.len().saturating_sub(1) * COL_GAP;
        layer_widths.push(total + gaps);
    }
    let max_width = layer_widths.iter().copied().max().unwrap_or(0);

    let mut y = 0;
    for (layer, layer_width) in layers.iter().zip(&layer_widths) {
        let mut x = (max_width - layer_width) / 2;
        for &node in layer {
            let width = box_width(graph, node);
            boxes[node] = NodeBox {
                x,
                y,
                width,
                height: BOX_HEIGHT,
            };
            x += width + COL_GAP;
        }
        y += BOX_HEIGHT + ROW_GAP;
    }
}

fn place_horizontal(graph: &FlowGraph, layers: &[SmallVec<[usize; 8]>], boxes: &mut [NodeBox]) {
    let mut layer_heights = Vec::with_capacity(layers.len());
    for layer in layers {
        let total = layer.len() * BOX_HEIGHT;
        let gaps = layer.len().saturating_sub(1) * H_ROW_GAP;
        layer_heights.push(total + gaps);
    }
    let max_height = layer_heights.iter().copied().max().unwrap_or(0);

    let mut x = 0;
    for (layer, layer_height) in layers.iter().zip(&layer_heights) {
        let column_width = layer.iter().map(|&node| box_width(graph, node)).max().unwrap_or(0);
        let mut y = (max_height - layer_height) / 2;
        for &node in layer {
            let width = box_width(graph, node);
            boxes[node] = NodeBox {
                // Center each box within its column.
                x: x + (column_width - width) / 2,
                y,
                width,
                height: BOX_HEIGHT,
            };
            y += BOX_HEIGHT + H_ROW_GAP;
        }
        x += column_width + H_COL_GAP;
    }
}

/// Depth-first search marking edges that point back into the active stack.
fn find_back_edges(graph: &FlowGraph) -> Vec<bool> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        White,
        Gray,
        Black,
    }

    let node_count = graph.nodes.len();
    let mut outgoing: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); node_count];
    for (edge_idx, edge) in graph.edges.iter().enumerate() {
        outgoing[edge.from].push(edge_idx);
    }

    let mut marks = vec![Mark::White; node_count];
    let mut back = vec![false; graph.edges.len()];

    for start in 0..node_count {
        if marks[start] != Mark::White {
            continue;
        }

        // (node, next outgoing-edge position) frames.
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        marks[start] = Mark::Gray;

        while let Some(&mut (node, cursor)) = stack.last_mut() {
            if cursor >= outgoing[node].len() {
                marks[node] = Mark::Black;
                stack.pop();
                continue;
            }

            let edge_idx = outgoing[node][cursor];
            if let Some(frame) = stack.last_mut() {
                frame.1 += 1;
            }

            let target = graph.edges[edge_idx].to;
            match marks[target] {
                Mark::Gray => back[edge_idx] = true,
                Mark::White => {
                    marks[target] = Mark::Gray;
                    stack.push((target, 0));
                }
                Mark::Black => {}
            }
        }
    }

    back
}

/// Longest-path layering over forward edges only.
fn assign_layers(graph: &FlowGraph, back_edges: &[bool]) -> Vec<usize> {
    let node_count = graph.nodes.len();
    let mut layer = vec![0usize; node_count];

    // Forward edges form a DAG, so node_count passes suffice to settle.
    for _ in 0..node_count {
        let mut changed = false;
        for (edge_idx, edge) in graph.edges.iter().enumerate() {
            if back_edges[edge_idx] {
                continue;
            }
            if layer[edge.to] < layer[edge.from] + 1 {
                layer[edge.to] = layer[edge.from] + 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    layer
}
