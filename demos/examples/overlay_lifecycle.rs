// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tooltip lifecycle on a virtual clock.
//!
//! Opens an anchored tooltip, lets it enter, closes it, reopens it during the exit
//! animation, and prints every instruction the render host received.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example overlay_lifecycle`

use std::time::Duration;

use kurbo::{Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_overlay::session::SurfaceSession;
use understory_overlay::types::{DismissalPolicy, DismissTriggers, SessionConfig};
use understory_overlay_harness::{NodeId, VirtualHost, advance, layout};
use understory_placement::{Placement, PlacementConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let host = VirtualHost::new()
        .with_measurement(layout(
            Rect::new(200.0, 120.0, 280.0, 148.0),
            Size::new(140.0, 32.0),
            Rect::new(0.0, 0.0, 640.0, 480.0),
        ))
        .with_nodes(Some(NodeId(1)), NodeId(2));
    let config = SessionConfig::anchored(PlacementConfig::new(Placement::TOP).with_gap(6.0))
        .with_dismissal(DismissalPolicy::new(DismissTriggers::ESCAPE))
        .with_animation_duration(Duration::from_millis(120));
    let mut tooltip = SurfaceSession::new(host, config);

    tooltip.open();
    advance(&mut tooltip, VirtualHost::FRAME);
    tracing::info!(phase = ?tooltip.phase(), position = ?tooltip.position(), "entered");
    println!("after enter: {:?} at {:?}", tooltip.phase(), tooltip.position());

    tooltip.close();
    advance(&mut tooltip, Duration::from_millis(40));
    tracing::info!(phase = ?tooltip.phase(), "reopening during exit");
    println!("mid exit:    {:?}", tooltip.phase());

    tooltip.open();
    advance(&mut tooltip, Duration::from_millis(200));
    println!("reopened:    {:?}", tooltip.phase());

    tooltip.close();
    advance(&mut tooltip, Duration::from_millis(200));
    println!("closed:      {:?}", tooltip.phase());

    tracing::info!(
        mounts = tooltip.host().mounts(),
        unmounts = tooltip.host().unmounts(),
        "tooltip finished"
    );
    println!("\nhost log:");
    for (i, step) in tooltip.host().log().iter().enumerate() {
        println!("  {i:>2}: {step:?}");
    }
    println!(
        "mounts={} unmounts={} t={:?}",
        tooltip.host().mounts(),
        tooltip.host().unmounts(),
        tooltip.host().now()
    );
}
