// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The diagram engine boundary.
//!
//! The preview pipeline only sees this narrow surface: diagram source plus a
//! render id in, vector markup and a terminal canvas out, or an error
//! message. Every call terminates in one of those two outcomes. The built-in
//! [`FlowchartEngine`] covers the flowchart subset; anything else reports a
//! parse error like any other invalid source.

use std::fmt;

mod canvas;
mod flow_layout;
mod flow_parse;
mod flowchart;
mod svg;

pub use flowchart::FlowchartEngine;

/// Engine-wide configuration, set once at startup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub theme: EngineTheme,
    pub security_level: SecurityLevel,
    pub flowchart: FlowchartHints,
    pub theme_variables: ThemeVariables,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_theme(EngineTheme::Default)
    }
}

impl EngineConfig {
    pub fn for_theme(theme: EngineTheme) -> Self {
        Self {
            theme,
            security_level: SecurityLevel::Loose,
            flowchart: FlowchartHints::default(),
            theme_variables: ThemeVariables::for_theme(theme),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineTheme {
    Default,
    Dark,
}

/// `Strict` removes markup-significant characters from labels before they
/// reach any output; `Loose` passes label text through (escaped for SVG).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityLevel {
    Strict,
    Loose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveStyle {
    Linear,
    Basis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowchartHints {
    pub curve: CurveStyle,
    pub use_max_width: bool,
}

impl Default for FlowchartHints {
    fn default() -> Self {
        Self {
            curve: CurveStyle::Basis,
            use_max_width: true,
        }
    }
}

/// Fill/stroke palette applied to the emitted vector markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeVariables {
    pub primary_color: &'static str,
    pub primary_text_color: &'static str,
    pub primary_border_color: &'static str,
    pub line_color: &'static str,
    pub background_color: &'static str,
}

impl ThemeVariables {
    pub fn for_theme(theme: EngineTheme) -> Self {
        match theme {
            EngineTheme::Default => Self {
                primary_color: "#3b82f6",
                primary_text_color: "#ffffff",
                primary_border_color: "#2563eb",
                line_color: "#64748b",
                background_color: "#ffffff",
            },
            EngineTheme::Dark => Self {
                primary_color: "#1e3a8a",
                primary_text_color: "#e2e8f0",
                primary_border_color: "#3b82f6",
                line_color: "#94a3b8",
                background_color: "#0f172a",
            },
        }
    }
}

/// One render call: the source text and a fresh unique render id.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    render_id: u64,
    source: &'a str,
}

impl<'a> RenderRequest<'a> {
    pub fn new(render_id: u64, source: &'a str) -> Self {
        Self { render_id, source }
    }

    pub fn render_id(&self) -> u64 {
        self.render_id
    }

    pub fn source(&self) -> &'a str {
        self.source
    }
}

/// A successful render: vector markup plus its terminal projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    render_id: u64,
    svg: String,
    canvas: Vec<String>,
}

impl Rendered {
    pub fn new(render_id: u64, svg: String, canvas: Vec<String>) -> Self {
        Self {
            render_id,
            svg,
            canvas,
        }
    }

    pub fn render_id(&self) -> u64 {
        self.render_id
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn canvas(&self) -> &[String] {
        &self.canvas
    }

    pub fn canvas_width(&self) -> usize {
        self.canvas.iter().map(|line| line.chars().count()).max().unwrap_or(0)
    }

    pub fn canvas_height(&self) -> usize {
        self.canvas.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    Parse { line: usize, message: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Text in, markup out. Implementations must be total: every call returns
/// either markup or an error message. `Send` because the shell owns its
/// pipeline on a blocking worker thread.
pub trait DiagramEngine: Send {
    fn render(&self, request: RenderRequest<'_>) -> Result<Rendered, EngineError>;
}
