// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle state machine: `Closed → Mounting → Visible → Closing → Closed`.
//!
//! ## Overview
//!
//! [`Lifecycle`] owns the phase and the generation counter. Each entry point returns the
//! ordered [`Step`]s the owner must carry out against its host; the machine itself performs
//! no side effects, which keeps it testable without a host.
//!
//! ## Transitions
//!
//! | From       | Input                    | To         | Steps                                             |
//! |------------|--------------------------|------------|---------------------------------------------------|
//! | `Closed`   | open                     | `Mounting` | mount, present, request frame, attach listeners   |
//! | `Mounting` | enter frame              | `Visible`  | measure, present, entered                         |
//! | `Mounting` | close                    | `Closed`   | cancel timers, detach listeners, unmount          |
//! | `Visible`  | close                    | `Closing`  | cancel timers, present, exit timeout              |
//! | `Closing`  | exit elapsed             | `Closed`   | cancel timers, detach listeners, unmount          |
//! | `Closing`  | open                     | `Mounting` | cancel timers, present, request frame, rearm      |
//!
//! Every other input is a no-op. Closing from `Mounting` skips the exit animation because
//! the enter animation never started. Reopening from `Closing` never passes through `Closed`,
//! so the host sees no unmount/mount pair. Its listeners stay attached, except that the
//! outside-pointer listener is re-armed on a later turn like on a fresh open.
//!
//! ## Generations
//!
//! Every transition advances the [`Generation`]. A frame or timer token is only accepted when
//! its generation matches and the phase is the one it was scheduled for.
//! After [`Lifecycle::destroy`] nothing is accepted and every entry point is a no-op.

use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;

use crate::types::{Generation, SurfacePhase, Token, Wakeup};

/// A host-facing action produced by a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Mount the surface in its pre-enter state.
    Mount,
    /// Hand the new phase (and current position) to the host.
    Present(SurfacePhase),
    /// Measure and recompute the anchored position.
    Measure,
    /// Schedule a callback on the next animation frame.
    RequestFrame(Token),
    /// Schedule a callback after a delay.
    SetTimeout(Duration, Token),
    /// Cancel pending lifecycle and auto-close callbacks.
    CancelTimers,
    /// Attach dismissal listeners for a fresh open cycle.
    Attach,
    /// Reopened from `Closing`: delay the outside-pointer listener again.
    Rearm,
    /// The surface just became visible; start visible-scoped work.
    Entered,
    /// Detach dismissal listeners and cancel their pending callbacks.
    Detach,
    /// Unmount the surface.
    Unmount,
}

/// Phase and generation of one surface.
#[derive(Clone, Debug)]
pub struct Lifecycle {
    phase: SurfacePhase,
    generation: Generation,
    exit_duration: Duration,
    destroyed: bool,
}

impl Lifecycle {
    /// Create a closed lifecycle whose exit animation lasts `exit_duration`.
    #[must_use]
    pub fn new(exit_duration: Duration) -> Self {
        Self {
            phase: SurfacePhase::Closed,
            generation: Generation::default(),
            exit_duration,
            destroyed: false,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SurfacePhase {
        self.phase
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// True once [`destroy`](Self::destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Request open.
    pub fn open(&mut self) -> Vec<Step> {
        if self.destroyed {
            return Vec::new();
        }
        match self.phase {
            SurfacePhase::Closed => {
                let token = self.enter(SurfacePhase::Mounting, Wakeup::EnterFrame);
                vec![
                    Step::Mount,
                    Step::Present(SurfacePhase::Mounting),
                    Step::RequestFrame(token),
                    Step::Attach,
                ]
            }
            SurfacePhase::Closing => {
                let token = self.enter(SurfacePhase::Mounting, Wakeup::EnterFrame);
                vec![
                    Step::CancelTimers,
                    Step::Present(SurfacePhase::Mounting),
                    Step::RequestFrame(token),
                    Step::Rearm,
                ]
            }
            SurfacePhase::Mounting | SurfacePhase::Visible => Vec::new(),
        }
    }

    /// Request close.
    pub fn close(&mut self) -> Vec<Step> {
        if self.destroyed {
            return Vec::new();
        }
        match self.phase {
            SurfacePhase::Mounting => self.finish(),
            SurfacePhase::Visible => {
                let token = self.enter(SurfacePhase::Closing, Wakeup::ExitElapsed);
                vec![
                    Step::CancelTimers,
                    Step::Present(SurfacePhase::Closing),
                    Step::SetTimeout(self.exit_duration, token),
                ]
            }
            SurfacePhase::Closed | SurfacePhase::Closing => Vec::new(),
        }
    }

    /// Deliver a fired frame or timer.
    ///
    /// Stale tokens and tokens not owned by the lifecycle produce no steps.
    pub fn fire(&mut self, token: Token) -> Vec<Step> {
        if !self.accepts(token) {
            if !self.destroyed {
                tracing::debug!(
                    ?token,
                    current = ?self.generation,
                    "ignoring stale lifecycle callback"
                );
            }
            return Vec::new();
        }
        match token.wakeup() {
            Wakeup::EnterFrame => {
                self.transition(SurfacePhase::Visible);
                vec![
                    Step::Measure,
                    Step::Present(SurfacePhase::Visible),
                    Step::Entered,
                ]
            }
            Wakeup::ExitElapsed => self.finish(),
            Wakeup::AutoClose | Wakeup::ArmOutsidePointer => Vec::new(),
        }
    }

    /// True if `token` was scheduled under the current generation for the current phase.
    ///
    /// Covers the phase-bound wakeups; [`Wakeup::ArmOutsidePointer`] is never accepted here.
    #[must_use]
    pub fn accepts(&self, token: Token) -> bool {
        if self.destroyed || token.generation() != self.generation {
            return false;
        }
        matches!(
            (token.wakeup(), self.phase),
            (Wakeup::EnterFrame, SurfacePhase::Mounting)
                | (Wakeup::AutoClose, SurfacePhase::Visible)
                | (Wakeup::ExitElapsed, SurfacePhase::Closing)
        )
    }

    /// Tear down. Idempotent.
    ///
    /// The phase resets to `Closed` without an unmount step: the owning UI instance is
    /// going away and takes its nodes with it.
    pub fn destroy(&mut self) -> Vec<Step> {
        if self.destroyed {
            return Vec::new();
        }
        self.transition(SurfacePhase::Closed);
        self.destroyed = true;
        vec![Step::CancelTimers, Step::Detach]
    }

    fn finish(&mut self) -> Vec<Step> {
        self.transition(SurfacePhase::Closed);
        vec![Step::CancelTimers, Step::Detach, Step::Unmount]
    }

    fn enter(&mut self, to: SurfacePhase, wakeup: Wakeup) -> Token {
        self.transition(to);
        Token::new(self.generation, wakeup)
    }

    fn transition(&mut self, to: SurfacePhase) {
        let from = self.phase;
        self.phase = to;
        self.generation = self.generation.next();
        tracing::trace!(?from, ?to, generation = self.generation.get(), "surface phase");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXIT: Duration = Duration::from_millis(200);

    fn frame_token(steps: &[Step]) -> Token {
        steps
            .iter()
            .find_map(|s| match s {
                Step::RequestFrame(t) => Some(*t),
                _ => None,
            })
            .unwrap()
    }

    fn timeout_token(steps: &[Step]) -> Token {
        steps
            .iter()
            .find_map(|s| match s {
                Step::SetTimeout(_, t) => Some(*t),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn open_mounts_then_waits_for_frame() {
        let mut lc = Lifecycle::new(EXIT);
        let steps = lc.open();
        assert_eq!(lc.phase(), SurfacePhase::Mounting);
        assert_eq!(steps[0], Step::Mount);
        assert_eq!(steps[1], Step::Present(SurfacePhase::Mounting));
        assert_eq!(steps[3], Step::Attach);

        let token = frame_token(&steps);
        assert_eq!(token.wakeup(), Wakeup::EnterFrame);
        assert_eq!(
            lc.fire(token),
            vec![
                Step::Measure,
                Step::Present(SurfacePhase::Visible),
                Step::Entered
            ]
        );
        assert_eq!(lc.phase(), SurfacePhase::Visible);
    }

    #[test]
    fn full_round_trip() {
        let mut lc = Lifecycle::new(EXIT);
        let t = frame_token(&lc.open());
        let _ = lc.fire(t);
        let steps = lc.close();
        assert_eq!(lc.phase(), SurfacePhase::Closing);
        assert!(steps.contains(&Step::SetTimeout(EXIT, timeout_token(&steps))));
        let exit = timeout_token(&steps);
        assert_eq!(
            lc.fire(exit),
            vec![Step::CancelTimers, Step::Detach, Step::Unmount]
        );
        assert_eq!(lc.phase(), SurfacePhase::Closed);
    }

    #[test]
    fn open_and_close_are_idempotent() {
        let mut lc = Lifecycle::new(EXIT);
        assert!(lc.close().is_empty());
        let t = frame_token(&lc.open());
        assert!(lc.open().is_empty());
        let _ = lc.fire(t);
        assert!(lc.open().is_empty());
        let _ = lc.close();
        assert!(lc.close().is_empty());
    }

    #[test]
    fn close_while_mounting_skips_exit_animation() {
        let mut lc = Lifecycle::new(EXIT);
        let t = frame_token(&lc.open());
        let steps = lc.close();
        assert_eq!(lc.phase(), SurfacePhase::Closed);
        assert!(steps.contains(&Step::Unmount));
        assert!(!steps.iter().any(|s| matches!(s, Step::SetTimeout(..))));
        assert!(lc.fire(t).is_empty());
        assert_eq!(lc.phase(), SurfacePhase::Closed);
    }

    #[test]
    fn reopen_while_closing_never_unmounts() {
        let mut lc = Lifecycle::new(EXIT);
        let t = frame_token(&lc.open());
        let _ = lc.fire(t);
        let exit = timeout_token(&lc.close());
        let steps = lc.open();
        assert_eq!(lc.phase(), SurfacePhase::Mounting);
        assert!(!steps.contains(&Step::Mount));
        assert!(!steps.contains(&Step::Unmount));
        assert_eq!(steps[0], Step::CancelTimers);
        assert_eq!(steps.last(), Some(&Step::Rearm));
        assert!(!steps.contains(&Step::Attach));

        // The superseded exit timer fires anyway: ignored.
        assert!(lc.fire(exit).is_empty());
        assert_eq!(lc.phase(), SurfacePhase::Mounting);

        let t = frame_token(&steps);
        let _ = lc.fire(t);
        assert_eq!(lc.phase(), SurfacePhase::Visible);
    }

    #[test]
    fn every_transition_advances_generation() {
        let mut lc = Lifecycle::new(EXIT);
        let g0 = lc.generation();
        let t = frame_token(&lc.open());
        let g1 = lc.generation();
        let _ = lc.fire(t);
        let g2 = lc.generation();
        let _ = lc.close();
        let g3 = lc.generation();
        assert!(g0 < g1 && g1 < g2 && g2 < g3);
    }

    #[test]
    fn accepts_only_matching_phase() {
        let mut lc = Lifecycle::new(EXIT);
        let t = frame_token(&lc.open());
        assert!(lc.accepts(t));
        let wrong = Token::new(t.generation(), Wakeup::ExitElapsed);
        assert!(!lc.accepts(wrong));
        let arm = Token::new(t.generation(), Wakeup::ArmOutsidePointer);
        assert!(!lc.accepts(arm));
        let _ = lc.fire(t);
        let auto = Token::new(lc.generation(), Wakeup::AutoClose);
        assert!(lc.accepts(auto));
        assert!(lc.fire(auto).is_empty());
    }

    #[test]
    fn destroy_is_final_and_idempotent() {
        let mut lc = Lifecycle::new(EXIT);
        let t = frame_token(&lc.open());
        let _ = lc.fire(t);
        let exit = timeout_token(&lc.close());
        assert_eq!(lc.destroy(), vec![Step::CancelTimers, Step::Detach]);
        assert!(lc.is_destroyed());
        assert_eq!(lc.phase(), SurfacePhase::Closed);
        assert!(lc.destroy().is_empty());
        assert!(lc.fire(exit).is_empty());
        assert!(lc.open().is_empty());
        assert!(lc.close().is_empty());
        assert_eq!(lc.phase(), SurfacePhase::Closed);
    }
}
