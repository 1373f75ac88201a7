// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use proteus::engine::{DiagramEngine, EngineConfig, FlowchartEngine, RenderRequest};

// Benchmark identity (keep stable):
// - Group name in this file: `engine.render`
// - Case IDs (`small`, `medium`, `labeled_cycle`) must remain stable across
//   refactors so results stay comparable over time.

const SMALL: &str = "graph TD\n    A[Start] --> B{Is it working?}\n    B -->|Yes| C[Great!]\n    B -->|No| D[Debug]\n    D --> B";

const LABELED_CYCLE: &str = "graph LR\n    A[Request] -->|parse| B{Valid?}\n    B -->|yes| C[Handle]\n    B -->|no| D[Reject]\n    C --> E[Respond]\n    D --> E\n    E -.->|log| A";

fn medium_fixture() -> String {
    let mut source = String::from("graph TD\n");
    for i in 0..24 {
        source.push_str(&format!("    N{i}[Step {i}] --> N{}\n", i + 1));
        if i % 4 == 0 {
            source.push_str(&format!("    N{i} --> M{i}{{Check {i}}}\n"));
        }
    }
    source
}

fn benches_render(c: &mut Criterion) {
    let engine = FlowchartEngine::new(EngineConfig::default());
    let mut group = c.benchmark_group("engine.render");

    group.bench_function("small", |b| {
        b.iter(|| {
            let rendered =
                engine.render(RenderRequest::new(1, black_box(SMALL))).expect("render");
            black_box(rendered.svg().len())
        })
    });

    let medium = medium_fixture();
    group.bench_function("medium", |b| {
        b.iter(|| {
            let rendered = engine
                .render(RenderRequest::new(1, black_box(medium.as_str())))
                .expect("render");
            black_box(rendered.canvas_height())
        })
    });

    group.bench_function("labeled_cycle", |b| {
        b.iter(|| {
            let rendered =
                engine.render(RenderRequest::new(1, black_box(LABELED_CYCLE))).expect("render");
            black_box(rendered.svg().len())
        })
    });

    group.finish();
}

criterion_group!(benches, benches_render);
criterion_main!(benches);
