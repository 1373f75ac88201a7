// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use proteus::llm::extract_diagram_source;

// Benchmark identity (keep stable):
// - Group name in this file: `llm.extract`
// - Case IDs (`tagged_fence`, `bare_fence`, `chatty_response`) must remain
//   stable across refactors so results stay comparable over time.

const TAGGED: &str = "Here is your diagram:\n```mermaid\ngraph TD\n    A[Start] --> B{Is it working?}\n    B -->|Yes| C[Great!]\n```\nLet me know if you need changes.";

const BARE: &str = "```\ngraph LR\n    A --> B --> C\n```";

fn chatty_fixture() -> String {
    let mut response = String::new();
    for i in 0..50 {
        response.push_str(&format!("Some prose paragraph number {i} about diagrams.\n"));
    }
    response.push_str("<!-- model annotation -->\ngraph TD\n    A --> B\n");
    response
}

fn benches_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("llm.extract");

    group.bench_function("tagged_fence", |b| {
        b.iter(|| black_box(extract_diagram_source(black_box(TAGGED))).len())
    });

    group.bench_function("bare_fence", |b| {
        b.iter(|| black_box(extract_diagram_source(black_box(BARE))).len())
    });

    let chatty = chatty_fixture();
    group.bench_function("chatty_response", |b| {
        b.iter(|| black_box(extract_diagram_source(black_box(chatty.as_str()))).len())
    });

    group.finish();
}

criterion_group!(benches, benches_extract);
criterion_main!(benches);
