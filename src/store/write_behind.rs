// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Debounced write-behind persistence.
//!
//! Mutations enqueue the latest serialized snapshot per record; a single
//! worker writes a snapshot once its flush deadline passes, so bursts of
//! edits within the window coalesce into one write. `flush` and `cancel`
//! exist for deterministic shutdown in tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use super::{StoragePort, StoreError};

pub const DEFAULT_FLUSH_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug)]
struct PendingWrite {
    value: String,
    due_at: Instant,
}

#[derive(Debug, Default)]
struct WriterState {
    pending: BTreeMap<String, PendingWrite>,
    in_flight: Option<String>,
    last_error: Option<StoreError>,
}

struct WriterInner {
    state: Mutex<WriterState>,
    cv: Condvar,
    port: Arc<dyn StoragePort>,
    delay: Duration,
}

/// Handle to the shared write-behind worker. Cloning shares the worker.
#[derive(Clone)]
pub struct WriteBehind {
    inner: Arc<WriterInner>,
}

impl WriteBehind {
    pub fn new(port: Arc<dyn StoragePort>) -> Self {
        Self::with_delay(port, DEFAULT_FLUSH_DELAY)
    }

    pub fn with_delay(port: Arc<dyn StoragePort>, delay: Duration) -> Self {
        let inner = Arc::new(WriterInner {
            state: Mutex::new(WriterState::default()),
            cv: Condvar::new(),
            port,
            delay,
        });

        std::thread::Builder::new()
            .name("proteus-write-behind".to_owned())
            .spawn({
                let inner = inner.clone();
                move || Self::run_worker(inner)
            })
            .expect("spawn write-behind worker thread");

        Self { inner }
    }

    /// Replaces any pending snapshot for `key` and restarts its idle window.
    pub fn enqueue(&self, key: impl Into<String>, value: String) {
        let due_at = Instant::now() + self.inner.delay;
        let mut state = self.inner.state.lock().expect("write-behind lock poisoned");
        state.pending.insert(key.into(), PendingWrite { value, due_at });
        self.inner.cv.notify_all();
    }

    /// Drops the pending snapshot for `key` without writing it.
    pub fn cancel(&self, key: &str) {
        let mut state = self.inner.state.lock().expect("write-behind lock poisoned");
        state.pending.remove(key);
    }

    /// Forces every pending snapshot due now and blocks until the worker has
    /// drained them all.
    pub fn flush(&self) {
        let now = Instant::now();
        let mut state = self.inner.state.lock().expect("write-behind lock poisoned");
        for pending in state.pending.values_mut() {
            pending.due_at = now;
        }
        self.inner.cv.notify_all();

        while !state.pending.is_empty() || state.in_flight.is_some() {
            state = self.inner.cv.wait(state).expect("write-behind cv poisoned");
        }
    }

    /// Returns and clears the most recent write failure, if any.
    pub fn take_last_error(&self) -> Option<StoreError> {
        let mut state = self.inner.state.lock().expect("write-behind lock poisoned");
        state.last_error.take()
    }

    fn run_worker(inner: Arc<WriterInner>) {
        loop {
            let (key, value) = {
                let mut state = inner.state.lock().expect("write-behind lock poisoned");

                loop {
                    let now = Instant::now();
                    let next_due = state
                        .pending
                        .iter()
                        .min_by_key(|(_, pending)| pending.due_at)
                        .map(|(key, pending)| (key.clone(), pending.due_at));

                    match next_due {
                        Some((key, due_at)) if due_at <= now => {
                            let Some(pending) = state.pending.remove(&key) else {
                                continue;
                            };
                            state.in_flight = Some(key.clone());
                            break (key, pending.value);
                        }
                        Some((_, due_at)) => {
                            let (guard, _) = inner
                                .cv
                                .wait_timeout(state, due_at - now)
                                .expect("write-behind cv poisoned");
                            state = guard;
                        }
                        None => {
                            state = inner.cv.wait(state).expect("write-behind cv poisoned");
                        }
                    }
                }
            };

            let result = inner.port.set(&key, &value);

            let mut state = inner.state.lock().expect("write-behind lock poisoned");
            if let Err(err) = result {
                state.last_error = Some(err);
            }
            state.in_flight = None;
            inner.cv.notify_all();
        }
    }
}
