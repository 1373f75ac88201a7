// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Character canvas for the terminal projection of a rendered diagram.

use super::flow_parse::NodeShape;

#[derive(Debug, Clone)]
pub(crate) struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, ch: char) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = ch;
        }
    }

    fn get(&self, x: usize, y: usize) -> char {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            ' '
        }
    }

    pub(crate) fn draw_text(&mut self, x: usize, y: usize, text: &str) {
        for (offset, ch) in text.chars().enumerate() {
            self.set(x + offset, y, ch);
        }
    }

    /// Horizontal run; an existing vertical line becomes a crossing.
    pub(crate) fn draw_hline(&mut self, x0: usize, x1: usize, y: usize, ch: char) {
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        for x in lo..=hi {
            let merged = if self.get(x, y) == '│' { '┼' } else { ch };
            self.set(x, y, merged);
        }
    }

    /// Vertical run; an existing horizontal line becomes a crossing.
    pub(crate) fn draw_vline(&mut self, x: usize, y0: usize, y1: usize, ch: char) {
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        for y in lo..=hi {
            let merged = if self.get(x, y) == '─' { '┼' } else { ch };
            self.set(x, y, merged);
        }
    }

    pub(crate) fn draw_box(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        shape: NodeShape,
        label: &str,
    ) {
        if width < 2 || height < 2 {
            return;
        }

        let (tl, tr, bl, br) = match shape {
            NodeShape::Rect => ('┌', '┐', '└', '┘'),
            NodeShape::Round => ('╭', '╮', '╰', '╯'),
            NodeShape::Diamond => ('╱', '╲', '╲', '╱'),
        };

        let right = x + width - 1;
        let bottom = y + height - 1;

        for cx in x + 1..right {
            self.set(cx, y, '─');
            self.set(cx, bottom, '─');
        }
        for cy in y + 1..bottom {
            self.set(x, cy, '│');
            self.set(right, cy, '│');
        }
        self.set(x, y, tl);
        self.set(right, y, tr);
        self.set(x, bottom, bl);
        self.set(right, bottom, br);

        let label_width = label.chars().count();
        let inner = width.saturating_sub(2);
        let label_x = x + 1 + inner.saturating_sub(label_width) / 2;
        let label_y = y + height / 2;
        self.draw_text(label_x, label_y, label);
    }

    pub(crate) fn into_lines(self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.height);
        for y in 0..self.height {
            let row: String = self.cells[y * self.width..(y + 1) * self.width].iter().collect();
            lines.push(row.trim_end().to_owned());
        }
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::Canvas;
    use crate::engine::flow_parse::NodeShape;

    #[test]
    fn boxes_center_their_labels() {
        let mut canvas = Canvas::new(10, 3);
        canvas.draw_box(0, 0, 9, 3, NodeShape::Rect, "hi");
        let lines = canvas.into_lines();
        assert_eq!(lines[0], "┌───────┐");
        assert!(lines[1].contains("hi"));
        assert_eq!(lines[2], "└───────┘");
    }

    #[test]
    fn crossing_lines_merge_into_a_junction() {
        let mut canvas = Canvas::new(5, 5);
        canvas.draw_vline(2, 0, 4, '│');
        canvas.draw_hline(0, 4, 2, '─');
        let lines = canvas.into_lines();
        assert_eq!(lines[2].chars().nth(2), Some('┼'));
    }
}
