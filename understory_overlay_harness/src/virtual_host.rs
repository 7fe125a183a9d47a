// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A render host backed by a virtual clock and an instruction log.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use understory_overlay::host::{ListenerRegistry, ParentLookup, RenderHost, Scheduler};
use understory_overlay::styles::StyleRegistry;
use understory_overlay::types::{ListenerKind, Measurement, SurfaceState, Token};

/// Style id installed on first mount.
pub const TRANSITION_STYLES: &str = "understory-overlay-transitions";

/// Node in the virtual host's element tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Handle of a scheduled frame or timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Handle of an attached listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u32);

/// Misbehaviours the host can simulate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostFaults {
    /// `cancel` is recorded but the callback still fires.
    pub leaky_cancel: bool,
}

/// What the session asked the host to do, in order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Instruction {
    /// The surface was mounted.
    Mount,
    /// A phase and position were presented.
    Present(SurfaceState),
    /// The surface was unmounted.
    Unmount,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    id: TimerId,
    due: Duration,
    token: Token,
}

/// Deterministic [`OverlayHost`](understory_overlay::host::OverlayHost) for tests and demos.
///
/// Frames fire every [`frame_interval`](Self::frame_interval) of virtual time. Zero-delay
/// timers fire on the next turn, never synchronously. Callbacks fire in due order, ties in
/// scheduling order.
pub struct VirtualHost {
    now: Duration,
    frame_interval: Duration,
    next_id: u64,
    queue: Vec<Scheduled>,
    cancelled: usize,
    faults: HostFaults,
    listeners: Vec<(ListenerId, ListenerKind)>,
    next_listener: u32,
    log: Vec<Instruction>,
    measurement: Option<Measurement>,
    anchor: Option<NodeId>,
    surface: NodeId,
    mounted: bool,
    parents: BTreeMap<NodeId, NodeId>,
    styles: StyleRegistry,
}

impl fmt::Debug for VirtualHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualHost")
            .field("now", &self.now)
            .field("queued", &self.queue.len())
            .field("listeners", &self.listeners)
            .field("mounted", &self.mounted)
            .field("log_len", &self.log.len())
            .finish_non_exhaustive()
    }
}

impl Default for VirtualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualHost {
    /// Default frame interval.
    pub const FRAME: Duration = Duration::from_millis(16);

    /// Create a host with surface node `NodeId(0)`, no anchor, and no layout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            frame_interval: Self::FRAME,
            next_id: 0,
            queue: Vec::new(),
            cancelled: 0,
            faults: HostFaults::default(),
            listeners: Vec::new(),
            next_listener: 0,
            log: Vec::new(),
            measurement: None,
            anchor: None,
            surface: NodeId(0),
            mounted: false,
            parents: BTreeMap::new(),
            styles: StyleRegistry::new(),
        }
    }

    /// Set the simulated faults.
    #[must_use]
    pub fn with_faults(mut self, faults: HostFaults) -> Self {
        self.faults = faults;
        self
    }

    /// Set the layout returned by `measure` while mounted.
    #[must_use]
    pub fn with_measurement(mut self, measurement: Measurement) -> Self {
        self.measurement = Some(measurement);
        self
    }

    /// Set the anchor and surface root nodes.
    #[must_use]
    pub fn with_nodes(mut self, anchor: Option<NodeId>, surface: NodeId) -> Self {
        self.anchor = anchor;
        self.surface = surface;
        self
    }

    /// Record `child` as a child of `parent`.
    #[must_use]
    pub fn with_child(mut self, parent: NodeId, child: NodeId) -> Self {
        self.parents.insert(child, parent);
        self
    }

    /// Replace the layout, e.g. after a simulated resize.
    pub fn set_measurement(&mut self, measurement: Option<Measurement>) {
        self.measurement = measurement;
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Interval between animation frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Everything the session asked the host to render, in order.
    #[must_use]
    pub fn log(&self) -> &[Instruction] {
        &self.log
    }

    /// Number of mounts in the log.
    #[must_use]
    pub fn mounts(&self) -> usize {
        self.count(|i| matches!(i, Instruction::Mount))
    }

    /// Number of unmounts in the log.
    #[must_use]
    pub fn unmounts(&self) -> usize {
        self.count(|i| matches!(i, Instruction::Unmount))
    }

    /// Last presented state, if any.
    #[must_use]
    pub fn last_present(&self) -> Option<SurfaceState> {
        self.log.iter().rev().find_map(|i| match i {
            Instruction::Present(s) => Some(*s),
            _ => None,
        })
    }

    /// True between mount and unmount.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// True if a listener of `kind` is attached.
    #[must_use]
    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.iter().any(|(_, k)| *k == kind)
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of callbacks still queued, including leaked cancelled ones.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Number of `cancel` calls received.
    #[must_use]
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Installed styles.
    #[must_use]
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Pop the earliest callback due at or before `deadline`, moving the clock to it.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<Token> {
        let (i, _) = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= deadline)
            .min_by_key(|(_, s)| (s.due, s.id))?;
        let s = self.queue.remove(i);
        if s.due > self.now {
            self.now = s.due;
        }
        Some(s.token)
    }

    /// Move the clock forward to `to` if it is later.
    pub fn settle_clock(&mut self, to: Duration) {
        if to > self.now {
            self.now = to;
        }
    }

    fn count(&self, pred: impl Fn(&Instruction) -> bool) -> usize {
        self.log.iter().filter(|i| pred(i)).count()
    }

    fn schedule(&mut self, due: Duration, token: Token) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.queue.push(Scheduled { id, due, token });
        id
    }
}

impl RenderHost for VirtualHost {
    type Node = NodeId;

    fn mount(&mut self) {
        if self.styles.ensure(TRANSITION_STYLES) {
            tracing::debug!("installed transition styles");
        }
        self.mounted = true;
        self.log.push(Instruction::Mount);
    }

    fn present(&mut self, state: SurfaceState) {
        self.log.push(Instruction::Present(state));
    }

    fn unmount(&mut self) {
        self.mounted = false;
        self.log.push(Instruction::Unmount);
    }

    fn measure(&mut self) -> Option<Measurement> {
        self.measurement.filter(|_| self.mounted)
    }

    fn anchor_node(&self) -> Option<NodeId> {
        self.anchor
    }

    fn surface_node(&self) -> Option<NodeId> {
        self.mounted.then_some(self.surface)
    }
}

impl Scheduler for VirtualHost {
    type TimerHandle = TimerId;

    fn request_frame(&mut self, token: Token) -> TimerId {
        let due = self.now + self.frame_interval;
        self.schedule(due, token)
    }

    fn set_timeout(&mut self, delay: Duration, token: Token) -> TimerId {
        let due = self.now + delay;
        self.schedule(due, token)
    }

    fn cancel(&mut self, handle: TimerId) {
        self.cancelled += 1;
        if !self.faults.leaky_cancel {
            self.queue.retain(|s| s.id != handle);
        }
    }
}

impl ListenerRegistry for VirtualHost {
    type ListenerHandle = ListenerId;

    fn listen(&mut self, kind: ListenerKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, kind));
        id
    }

    fn unlisten(&mut self, handle: ListenerId) {
        self.listeners.retain(|(id, _)| *id != handle);
    }
}

impl ParentLookup<NodeId> for VirtualHost {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.parents.get(node).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_overlay::types::{Generation, Wakeup};

    fn token() -> Token {
        // Tokens are only minted by sessions; borrow one from a lifecycle.
        let mut lc = understory_overlay::lifecycle::Lifecycle::new(Duration::ZERO);
        lc.open()
            .into_iter()
            .find_map(|s| match s {
                understory_overlay::lifecycle::Step::RequestFrame(t) => Some(t),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn callbacks_fire_in_due_order() {
        let mut host = VirtualHost::new();
        let t = token();
        let late = host.set_timeout(Duration::from_millis(50), t);
        let frame = host.request_frame(t);
        let now = host.set_timeout(Duration::ZERO, t);
        assert!(late < frame && frame < now);

        assert_eq!(host.pop_due(Duration::ZERO), Some(t));
        assert_eq!(host.now(), Duration::ZERO);
        assert_eq!(host.pop_due(Duration::from_millis(20)), Some(t));
        assert_eq!(host.now(), VirtualHost::FRAME);
        assert_eq!(host.pop_due(Duration::from_millis(20)), None);
        assert_eq!(host.queued(), 1);
    }

    #[test]
    fn leaky_cancel_keeps_callbacks_queued() {
        let mut host = VirtualHost::new().with_faults(HostFaults { leaky_cancel: true });
        let t = token();
        assert_eq!(t.wakeup(), Wakeup::EnterFrame);
        assert!(t.generation() > Generation::default());
        let id = host.request_frame(t);
        host.cancel(id);
        assert_eq!(host.cancelled(), 1);
        assert_eq!(host.queued(), 1);

        let mut honest = VirtualHost::new();
        let id = honest.request_frame(t);
        honest.cancel(id);
        assert_eq!(honest.queued(), 0);
    }

    #[test]
    fn surface_node_exists_only_while_mounted() {
        let mut host = VirtualHost::new().with_nodes(Some(NodeId(1)), NodeId(2));
        assert_eq!(host.surface_node(), None);
        host.mount();
        assert_eq!(host.surface_node(), Some(NodeId(2)));
        assert!(host.styles().contains(TRANSITION_STYLES));
        host.unmount();
        assert_eq!(host.surface_node(), None);
        assert_eq!(host.log(), [Instruction::Mount, Instruction::Unmount]);
    }
}
