// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;

use ratatui::style::{Color, Modifier, Style};

const FOCUS_COLOR: Color = Color::LightGreen;
const ERROR_COLOR: Color = Color::Red;
const HINT_KEY_COLOR: Color = Color::Cyan;
const HINT_LABEL_COLOR: Color = Color::Gray;

/// Styling knobs for the shell. `NO_COLOR` in the environment drops every
/// color and leaves only modifiers.
#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    monochrome: bool,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Self {
        let monochrome = env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
        Self { monochrome }
    }

    fn colored(&self, style: Style, color: Color) -> Style {
        if self.monochrome {
            style
        } else {
            style.fg(color)
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.colored(Style::default(), FOCUS_COLOR)
        } else {
            Style::default()
        }
    }

    pub(crate) fn selection_style(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.colored(Style::default(), ERROR_COLOR)
    }

    pub(crate) fn hint_key_style(&self) -> Style {
        self.colored(Style::default(), HINT_KEY_COLOR)
    }

    pub(crate) fn hint_label_style(&self) -> Style {
        self.colored(Style::default(), HINT_LABEL_COLOR)
    }

    pub(crate) fn toast_style(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }
}
