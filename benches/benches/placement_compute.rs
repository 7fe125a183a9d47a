// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_placement::{Placement, PlacementConfig, compute_position};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1280.0, 800.0);

/// Anchors scattered over the viewport, a share of them hugging the edges.
fn gen_anchors(count: usize, seed: u64) -> Vec<Rect> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let w = 16.0 + rng.next_f64() * 120.0;
            let h = 16.0 + rng.next_f64() * 32.0;
            let x = rng.next_f64() * (VIEWPORT.width() - w);
            let y = rng.next_f64() * (VIEWPORT.height() - h);
            Rect::from_origin_size((x, y), Size::new(w, h))
        })
        .collect()
}

fn bench_compute(c: &mut Criterion) {
    let anchors = gen_anchors(4096, 0x5eed);
    let surface = Rect::from_origin_size((0.0, 0.0), Size::new(240.0, 160.0));
    let mut group = c.benchmark_group("compute_position");
    group.throughput(Throughput::Elements(anchors.len() as u64));

    for placement in [Placement::BOTTOM, "right-start".parse().unwrap()] {
        for auto_flip in [false, true] {
            let config = PlacementConfig::new(placement)
                .with_gap(8.0)
                .with_auto_flip(auto_flip);
            let name = format!("{placement}_flip={auto_flip}");
            group.bench_function(name, |b| {
                b.iter(|| {
                    let mut acc = 0.0;
                    for &anchor in &anchors {
                        let pos = compute_position(anchor, surface, &config, VIEWPORT);
                        acc += pos.left + pos.top;
                    }
                    black_box(acc)
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_compute);
criterion_main!(benches);
