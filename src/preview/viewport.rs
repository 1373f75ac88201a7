// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Step-zoom bounds (the zoom-in/zoom-out controls).
pub const ZOOM_STEP: f32 = 0.1;
pub const STEP_ZOOM_MIN: f32 = 0.5;
pub const STEP_ZOOM_MAX: f32 = 2.0;

/// Factor-zoom bounds (the wheel-style entry point).
pub const FACTOR_ZOOM_MIN: f32 = 0.1;
pub const FACTOR_ZOOM_MAX: f32 = 5.0;

/// 2D affine view transform over the rendered canvas.
///
/// Independent of rendering: renders never touch it, and the fullscreen
/// preview shares the same instance so both entry points see one state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f32,
    offset_x: i32,
    offset_y: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

impl Viewport {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> (i32, i32) {
        (self.offset_x, self.offset_y)
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    pub fn zoom_in(&mut self) {
        self.scale = (self.scale + ZOOM_STEP).clamp(STEP_ZOOM_MIN, STEP_ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.scale = (self.scale - ZOOM_STEP).clamp(STEP_ZOOM_MIN, STEP_ZOOM_MAX);
    }

    /// Wheel-style multiplicative zoom with its wider clamp range.
    pub fn zoom_by(&mut self, factor: f32) {
        self.scale = (self.scale * factor).clamp(FACTOR_ZOOM_MIN, FACTOR_ZOOM_MAX);
    }

    /// Restores the identity transform exactly.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Nearest-neighbor projection of canvas lines through the transform into a
/// `cols` x `rows` window. Scale duplicates cells above 1 and samples below
/// it; offsets shift which region is visible.
pub fn project_canvas(lines: &[String], cols: usize, rows: usize, viewport: &Viewport) -> Vec<String> {
    let scale = viewport.scale.max(FACTOR_ZOOM_MIN);
    let (offset_x, offset_y) = viewport.offset();

    let grid: Vec<Vec<char>> = lines.iter().map(|line| line.chars().collect()).collect();

    let mut out = Vec::with_capacity(rows);
    for row in 0..rows {
        let src_y = (row as f32 / scale) as i64 + offset_y as i64;
        let mut line = String::with_capacity(cols);
        if src_y >= 0 && (src_y as usize) < grid.len() {
            let src_line = &grid[src_y as usize];
            for col in 0..cols {
                let src_x = (col as f32 / scale) as i64 + offset_x as i64;
                let ch = if src_x >= 0 && (src_x as usize) < src_line.len() {
                    src_line[src_x as usize]
                } else {
                    ' '
                };
                line.push(ch);
            }
        }
        out.push(line.trim_end().to_owned());
    }
    out
}
