// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored placement: flip and shift near the viewport edges.
//!
//! Resolves the same request for anchors in the middle and near each edge of a viewport.
//!
//! Run:
//! - `cargo run -p understory_demos --example overlay_placement`

use kurbo::{Rect, Size};
use understory_placement::{PlacementConfig, check_geometry, compute_position};

fn main() {
    let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
    let surface = Rect::from_origin_size((0.0, 0.0), Size::new(180.0, 60.0));

    let anchors = [
        ("center", Rect::new(360.0, 280.0, 440.0, 310.0)),
        ("bottom edge", Rect::new(360.0, 560.0, 440.0, 590.0)),
        ("top edge", Rect::new(360.0, 4.0, 440.0, 34.0)),
        ("left edge", Rect::new(2.0, 280.0, 40.0, 310.0)),
        ("right edge", Rect::new(770.0, 280.0, 798.0, 310.0)),
    ];

    for request in ["bottom", "top-start", "left", "right-end"] {
        let placement = match request.parse() {
            Ok(p) => p,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        let config = PlacementConfig::new(placement).with_gap(8.0);
        println!("request {request}:");
        for (name, anchor) in anchors {
            let pos = compute_position(anchor, surface, &config, viewport);
            println!(
                "  {name:<12} -> {:<10} at ({:>6.1}, {:>6.1})",
                pos.placement.to_string(),
                pos.left,
                pos.top
            );
        }
    }

    let broken = Rect::new(f64::NAN, 0.0, 10.0, 10.0);
    if let Err(err) = check_geometry(broken, surface, viewport) {
        println!("rejected input: {err}");
    }
    if let Err(err) = "middle".parse::<understory_placement::Placement>() {
        println!("rejected placement: {err}");
    }
}
