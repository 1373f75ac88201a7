// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Live preview: the debounced render pipeline and the pan/zoom viewport.

mod pipeline;
mod viewport;

pub use pipeline::{PipelinePhase, RenderPipeline, DEFAULT_DEBOUNCE};
pub use viewport::{
    project_canvas, Viewport, FACTOR_ZOOM_MAX, FACTOR_ZOOM_MIN, STEP_ZOOM_MAX, STEP_ZOOM_MIN,
    ZOOM_STEP,
};
