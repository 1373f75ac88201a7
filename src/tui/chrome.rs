// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared chrome: panel titles, the footer hint bar, overlay placement.

use ratatui::prelude::*;

use super::theme::TuiTheme;

pub(crate) const FOOTER_BRAND: &str = "🅿 🆁 🅾 🆃 🅴 🆄 🆂 ";

#[derive(Debug, Clone, Copy)]
pub(crate) struct FooterHint {
    pub key: &'static str,
    pub label: &'static str,
}

pub(crate) fn footer_line(hints: &[FooterHint], theme: &TuiTheme) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3 + 1);
    for hint in hints {
        spans.push(Span::styled(hint.key, theme.hint_key_style()));
        spans.push(Span::styled(format!(" {}  ", hint.label), theme.hint_label_style()));
    }
    spans.push(Span::styled(FOOTER_BRAND, Style::default().add_modifier(Modifier::BOLD)));
    Line::from(spans)
}

pub(crate) fn view_title(label: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!(" {label} {suffix} "),
        None => format!(" {label} "),
    }
}

/// A centered overlay rectangle clamped to `area`.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
