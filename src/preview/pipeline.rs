// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, Instant};

use crate::engine::{DiagramEngine, EngineError, RenderRequest, Rendered};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Idle,
    Pending,
    Rendered,
    Error,
}

/// Debounced source-to-markup pipeline.
///
/// Every source change restarts the debounce window; once it elapses the
/// latest source is rendered under a fresh monotonically increasing sequence
/// number. Results are applied latest-issued-wins: a completion whose
/// sequence number is not the newest issued is discarded, so a stale render
/// can never overwrite a newer one regardless of completion order. A failed
/// render keeps the previous markup on screen.
pub struct RenderPipeline {
    engine: Box<dyn DiagramEngine>,
    debounce: Duration,
    source: String,
    dirty_since: Option<Instant>,
    last_issued: u64,
    rendered: Option<Rendered>,
    error: Option<String>,
    phase: PipelinePhase,
}

impl RenderPipeline {
    pub fn new(engine: Box<dyn DiagramEngine>) -> Self {
        Self::with_debounce(engine, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(engine: Box<dyn DiagramEngine>, debounce: Duration) -> Self {
        Self {
            engine,
            debounce,
            source: String::new(),
            dirty_since: None,
            last_issued: 0,
            rendered: None,
            error: None,
            phase: PipelinePhase::Idle,
        }
    }

    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rendered(&self) -> Option<&Rendered> {
        self.rendered.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the source and restarts the debounce window at `now`.
    pub fn set_source(&mut self, source: impl Into<String>, now: Instant) {
        self.source = source.into();
        self.dirty_since = Some(now);
        self.phase = PipelinePhase::Pending;
    }

    /// True once the debounce window for the latest edit has elapsed.
    pub fn due(&self, now: Instant) -> bool {
        self.dirty_since
            .is_some_and(|dirty_since| now.duration_since(dirty_since) >= self.debounce)
    }

    /// Renders the latest source if its debounce window has elapsed. Returns
    /// true when a render was performed (successfully or not).
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.due(now) {
            return false;
        }
        self.dirty_since = None;

        let normalized = normalize_source(&self.source);
        if normalized.trim().is_empty() {
            // Nothing to render; keep whatever was last on screen.
            self.phase = if self.rendered.is_some() {
                PipelinePhase::Rendered
            } else {
                PipelinePhase::Idle
            };
            return false;
        }

        self.last_issued += 1;
        let seq = self.last_issued;
        let result = self.engine.render(RenderRequest::new(seq, &normalized));
        self.apply(seq, result);
        true
    }

    /// Applies a render outcome for sequence number `seq`. Stale outcomes
    /// (not the latest issued) are discarded and return false.
    pub fn apply(&mut self, seq: u64, result: Result<Rendered, EngineError>) -> bool {
        if seq != self.last_issued {
            return false;
        }

        match result {
            Ok(rendered) => {
                self.rendered = Some(rendered);
                self.error = None;
                self.phase = PipelinePhase::Rendered;
            }
            Err(err) => {
                // Stale-but-valid beats blank: prior markup stays up.
                self.error = Some(err.to_string());
                self.phase = PipelinePhase::Error;
            }
        }
        true
    }

    /// Reserves the next sequence number and returns it with the normalized
    /// source, for callers that render out-of-band.
    pub fn issue(&mut self) -> (u64, String) {
        self.last_issued += 1;
        (self.last_issued, normalize_source(&self.source))
    }
}

/// Generated source sometimes arrives with HTML-escaped angle brackets and
/// ampersands; turn them back into the literal characters the engine expects.
fn normalize_source(source: &str) -> String {
    source.replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&")
}
