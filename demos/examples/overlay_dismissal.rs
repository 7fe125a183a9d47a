// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popover dismissal: outside clicks, Escape, and controlled mode.
//!
//! The session configuration is loaded from JSON. The first popover closes itself; the
//! second is controlled and only reports close requests to its owner.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example overlay_dismissal`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_overlay::session::SurfaceSession;
use understory_overlay::types::{DismissReason, SessionConfig};
use understory_overlay_harness::{
    NodeId, VirtualHost, advance, dispatch_escape, dispatch_pointer_down, layout, next_turn,
};

const CONFIG: &str = r#"{
    "placement": { "placement": { "side": "bottom", "align": "start" }, "gap": 4.0 },
    "dismissal": { "triggers": "ESCAPE | OUTSIDE_POINTER" },
    "animation_duration": { "secs": 0, "nanos": 150000000 }
}"#;

const TRIGGER: NodeId = NodeId(1);
const POPOVER: NodeId = NodeId(2);
const MENU_ITEM: NodeId = NodeId(3);
const ELSEWHERE: NodeId = NodeId(40);

fn host() -> VirtualHost {
    VirtualHost::new()
        .with_measurement(layout(
            Rect::new(40.0, 40.0, 120.0, 64.0),
            Size::new(200.0, 120.0),
            Rect::new(0.0, 0.0, 1024.0, 768.0),
        ))
        .with_nodes(Some(TRIGGER), POPOVER)
        .with_child(POPOVER, MENU_ITEM)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config: SessionConfig = match serde_json::from_str(CONFIG) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "invalid config");
            return;
        }
    };

    // Uncontrolled: the click that opened the popover cannot close it.
    let mut popover = SurfaceSession::new(host(), config);
    popover.open();
    let closed = dispatch_pointer_down(&mut popover, ELSEWHERE);
    println!("same-turn click outside closes: {closed}");
    next_turn(&mut popover);
    let closed = dispatch_pointer_down(&mut popover, MENU_ITEM);
    println!("click on menu item closes:      {closed}");
    advance(&mut popover, VirtualHost::FRAME);
    let closed = dispatch_pointer_down(&mut popover, ELSEWHERE);
    tracing::info!(closed, phase = ?popover.phase(), "clicked outside the open popover");
    println!("click outside closes:           {closed}");
    advance(&mut popover, config.animation_duration);
    println!("phase: {:?}, unmounts: {}", popover.phase(), popover.host().unmounts());

    // Controlled: the owner holds the open flag and decides.
    let open = Rc::new(RefCell::new(false));
    let requests: Rc<RefCell<Vec<DismissReason>>> = Rc::default();
    let sink = requests.clone();
    let flag = open.clone();
    let mut controlled = SurfaceSession::new(host(), config.controlled()).with_open_change(
        move |next, reason| {
            sink.borrow_mut().push(reason);
            *flag.borrow_mut() = next;
        },
    );

    *open.borrow_mut() = true;
    controlled.set_open(*open.borrow());
    advance(&mut controlled, VirtualHost::FRAME);
    let requested = dispatch_escape(&mut controlled);
    tracing::info!(requested, open = *open.borrow(), "escape on controlled popover");
    println!(
        "\ncontrolled after Escape: {:?}, requests: {:?}",
        controlled.phase(),
        requests.borrow()
    );

    // The owner accepts the request on its next render.
    let next = *open.borrow();
    controlled.set_open(next);
    advance(&mut controlled, config.animation_duration);
    println!("controlled after owner update: {:?}", controlled.phase());
}
