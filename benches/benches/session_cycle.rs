// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_overlay::session::SurfaceSession;
use understory_overlay::types::SessionConfig;
use understory_overlay_harness::{NodeId, VirtualHost, advance, dispatch_escape, layout};
use understory_placement::{Placement, PlacementConfig};

fn host() -> VirtualHost {
    VirtualHost::new()
        .with_measurement(layout(
            Rect::new(100.0, 100.0, 180.0, 130.0),
            Size::new(120.0, 40.0),
            Rect::new(0.0, 0.0, 800.0, 600.0),
        ))
        .with_nodes(Some(NodeId(1)), NodeId(2))
}

fn bench_cycles(c: &mut Criterion) {
    let config = SessionConfig::anchored(PlacementConfig::new(Placement::TOP).with_gap(4.0));
    let mut group = c.benchmark_group("session_cycle");

    group.bench_function("open_enter_close_exit", |b| {
        b.iter_batched(
            || SurfaceSession::new(host(), config),
            |mut s| {
                s.open();
                advance(&mut s, VirtualHost::FRAME);
                s.close();
                advance(&mut s, config.animation_duration);
                black_box(s.phase())
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("rapid_toggle_x32", |b| {
        b.iter_batched(
            || SurfaceSession::new(host(), config),
            |mut s| {
                for _ in 0..32 {
                    s.open();
                    advance(&mut s, VirtualHost::FRAME);
                    s.close();
                    advance(&mut s, Duration::from_millis(10));
                }
                black_box(s.generation())
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("escape_dismiss", |b| {
        b.iter_batched(
            || {
                let mut s = SurfaceSession::new(host(), config);
                s.open();
                advance(&mut s, VirtualHost::FRAME);
                s
            },
            |mut s| black_box(dispatch_escape(&mut s)),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_cycles);
criterion_main!(benches);
