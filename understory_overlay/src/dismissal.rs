// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dismissal coordinator: turns external signals into close requests.
//!
//! ## Overview
//!
//! [`Dismissal`] tracks which global listeners one session has attached and whether the
//! outside-pointer listener is armed. It decides whether a signal becomes a close request;
//! the session decides what a close request does (close directly, or only notify the caller
//! in controlled mode).
//!
//! ## Listener lifetime
//!
//! - Listeners are attached when the session leaves `Closed` and detached when it returns
//!   there (or is destroyed). Reopening from `Closing` keeps them attached.
//! - Escape and scroll listeners attach synchronously.
//! - The outside-pointer listener attaches on a delayed tick, so the pointer event that
//!   opened the surface cannot immediately close it.
//! - The auto-close timer starts when the surface becomes visible and only counts while it
//!   stays visible in the same generation.

use core::time::Duration;

use crate::host::{ListenerRegistry, ParentLookup, RenderHost, Scheduler, is_within};
use crate::timers::Timers;
use crate::types::{DismissReason, DismissalPolicy, Generation, ListenerKind, Token, Wakeup};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Outside<L> {
    /// Not listening.
    Idle,
    /// Waiting for the arming tick scheduled under this generation.
    Arming(Generation),
    /// Listening.
    Armed(L),
}

/// Listener state of one session.
#[derive(Debug)]
pub struct Dismissal<L> {
    policy: DismissalPolicy,
    escape: Option<L>,
    scroll: Option<L>,
    outside: Outside<L>,
}

impl<L: Copy + Eq> Dismissal<L> {
    /// Create a detached coordinator for `policy`.
    #[must_use]
    pub fn new(policy: DismissalPolicy) -> Self {
        Self {
            policy,
            escape: None,
            scroll: None,
            outside: Outside::Idle,
        }
    }

    /// The policy this coordinator was created with.
    #[must_use]
    pub fn policy(&self) -> &DismissalPolicy {
        &self.policy
    }

    /// True while any listener is attached or the outside-pointer listener is arming.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.escape.is_some() || self.scroll.is_some() || self.outside != Outside::Idle
    }

    /// True once the outside-pointer listener is live.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        matches!(self.outside, Outside::Armed(_))
    }

    /// Attach listeners for an open cycle that started under `generation`.
    pub(crate) fn attach<H>(
        &mut self,
        host: &mut H,
        timers: &mut Timers<H::TimerHandle>,
        generation: Generation,
    ) where
        H: ListenerRegistry<ListenerHandle = L> + Scheduler,
    {
        if self.is_attached() {
            return;
        }
        if self.policy.escape_closes() {
            self.escape = Some(host.listen(ListenerKind::Escape));
        }
        if self.policy.scroll_closes() {
            self.scroll = Some(host.listen(ListenerKind::Scroll));
        }
        if self.policy.outside_click_closes() {
            self.outside = Outside::Arming(generation);
            timers.after(
                host,
                Duration::ZERO,
                Token::new(generation, Wakeup::ArmOutsidePointer),
            );
        }
    }

    /// Handle the arming tick. Stale ticks are ignored.
    pub(crate) fn arm<H>(&mut self, host: &mut H, token: Token)
    where
        H: ListenerRegistry<ListenerHandle = L>,
    {
        match self.outside {
            Outside::Arming(g) if g == token.generation() => {
                self.outside = Outside::Armed(host.listen(ListenerKind::OutsidePointer));
            }
            _ => {
                tracing::debug!(?token, "ignoring stale outside-pointer arming tick");
            }
        }
    }

    /// Restart the outside-pointer delay for a cycle reopened under `generation`.
    ///
    /// Escape and scroll listeners stay attached. A live outside-pointer listener is
    /// detached and armed again on a later tick; pending ticks of the old cycle go stale.
    pub(crate) fn rearm<H>(
        &mut self,
        host: &mut H,
        timers: &mut Timers<H::TimerHandle>,
        generation: Generation,
    ) where
        H: ListenerRegistry<ListenerHandle = L> + Scheduler,
    {
        match self.outside {
            Outside::Idle => return,
            Outside::Armed(l) => host.unlisten(l),
            Outside::Arming(_) => {}
        }
        self.outside = Outside::Arming(generation);
        timers.after(
            host,
            Duration::ZERO,
            Token::new(generation, Wakeup::ArmOutsidePointer),
        );
    }

    /// Start visible-scoped work (auto-close) under the visible phase's `generation`.
    pub(crate) fn entered<S: Scheduler>(
        &self,
        host: &mut S,
        timers: &mut Timers<S::TimerHandle>,
        generation: Generation,
    ) {
        if let Some(delay) = self.policy.auto_close {
            timers.after(host, delay, Token::new(generation, Wakeup::AutoClose));
        }
    }

    /// Detach every listener. Pending arming ticks become stale.
    pub(crate) fn detach<H>(&mut self, host: &mut H)
    where
        H: ListenerRegistry<ListenerHandle = L>,
    {
        if let Some(l) = self.escape.take() {
            host.unlisten(l);
        }
        if let Some(l) = self.scroll.take() {
            host.unlisten(l);
        }
        if let Outside::Armed(l) = self.outside {
            host.unlisten(l);
        }
        self.outside = Outside::Idle;
    }

    /// Escape key pressed.
    #[must_use]
    pub fn on_escape(&self) -> Option<DismissReason> {
        self.escape.map(|_| DismissReason::Escape)
    }

    /// Viewport scrolled.
    #[must_use]
    pub fn on_scroll(&self) -> Option<DismissReason> {
        self.scroll.map(|_| DismissReason::Scroll)
    }

    /// Pointer pressed on `target`.
    ///
    /// Requests a close only when armed and `target` lies outside both the anchor and
    /// the surface subtrees.
    #[must_use]
    pub fn on_pointer_down<H>(&self, host: &H, target: H::Node) -> Option<DismissReason>
    where
        H: RenderHost + ParentLookup<<H as RenderHost>::Node>,
    {
        if !self.is_armed() {
            return None;
        }
        let inside = [host.anchor_node(), host.surface_node()]
            .into_iter()
            .flatten()
            .any(|root| is_within(target, root, host));
        (!inside).then_some(DismissReason::OutsidePointer)
    }
}
