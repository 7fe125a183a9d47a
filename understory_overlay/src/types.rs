// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the overlay engine: phases, generations, wakeup tokens, and configuration.
//!
//! ## Overview
//!
//! These types describe the contract between a [`SurfaceSession`](crate::session::SurfaceSession)
//! and its render host. The host receives [`SurfaceState`] values and hands back [`Token`]s and
//! [`Measurement`]s; the caller configures a session with a [`SessionConfig`].

use core::time::Duration;

use kurbo::Rect;
use understory_placement::{PlacementConfig, Position};

/// Lifecycle phase of a surface.
///
/// The render host paints the surface for every phase except [`Closed`](Self::Closed).
/// [`Mounting`](Self::Mounting) is the invisible pre-enter state, [`Visible`](Self::Visible)
/// carries the enter animation, and [`Closing`](Self::Closing) the exit animation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SurfacePhase {
    /// Not mounted.
    #[default]
    Closed,
    /// Mounted in the pre-enter state, waiting one frame for a committed layout.
    Mounting,
    /// Entered and measured.
    Visible,
    /// Playing the exit animation; unmounts when it elapses.
    Closing,
}

impl SurfacePhase {
    /// True when the render host should have the surface mounted.
    #[must_use]
    pub const fn is_mounted(self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// True while the surface is opening or open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Mounting | Self::Visible)
    }
}

/// Monotonic counter that invalidates callbacks scheduled under an earlier value.
///
/// A session advances its generation on every phase transition and on destroy.
/// A [`Token`] carrying an older generation is stale and is ignored when it fires.
///
/// `u64` is ample for practical lifetimes; behavior on overflow is unspecified.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// What a scheduled callback is for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Wakeup {
    /// The animation frame between `Mounting` and `Visible`.
    EnterFrame,
    /// The exit animation has run for its full duration.
    ExitElapsed,
    /// The auto-close delay has elapsed.
    AutoClose,
    /// The delayed tick after opening that arms outside-pointer dismissal.
    ArmOutsidePointer,
}

/// Opaque payload of a scheduled frame or timer.
///
/// Handed to the host by [`Scheduler`](crate::host::Scheduler); the host passes it back to
/// [`SurfaceSession::fire`](crate::session::SurfaceSession::fire) when the callback runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    generation: Generation,
    wakeup: Wakeup,
}

impl Token {
    pub(crate) const fn new(generation: Generation, wakeup: Wakeup) -> Self {
        Self { generation, wakeup }
    }

    /// Generation the callback was scheduled under.
    #[must_use]
    pub const fn generation(self) -> Generation {
        self.generation
    }

    /// Purpose of the callback.
    #[must_use]
    pub const fn wakeup(self) -> Wakeup {
        self.wakeup
    }
}

/// What the render host should show.
///
/// Handed to [`RenderHost::present`](crate::host::RenderHost::present) whenever either field changes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceState {
    /// Current phase; never [`SurfacePhase::Closed`] (that is signalled by unmount).
    pub phase: SurfacePhase,
    /// Resolved anchored position, or `None` when unanchored or not yet measured.
    pub position: Option<Position>,
}

/// Boxes measured by the render host, all in one coordinate space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Measurement {
    /// The trigger element.
    pub anchor: Rect,
    /// The rendered (not yet visible) surface.
    pub surface: Rect,
    /// The visible scrollable area.
    pub viewport: Rect,
}

/// Global listeners a session can attach through
/// [`ListenerRegistry`](crate::host::ListenerRegistry).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Key listener that reports the escape key.
    Escape,
    /// Pointer-down listener anywhere in the document/window.
    OutsidePointer,
    /// Scroll listener on the viewport.
    Scroll,
}

bitflags::bitflags! {
    /// External signals that request a close.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct DismissTriggers: u8 {
        /// Escape key closes the surface.
        const ESCAPE          = 0b0000_0001;
        /// Pointer-down outside anchor and surface closes the surface.
        const OUTSIDE_POINTER = 0b0000_0010;
        /// Scrolling the viewport closes the surface.
        const SCROLL          = 0b0000_0100;
    }
}

impl Default for DismissTriggers {
    fn default() -> Self {
        Self::ESCAPE | Self::OUTSIDE_POINTER
    }
}

/// Why a close was requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DismissReason {
    /// Escape key.
    Escape,
    /// Pointer-down outside anchor and surface.
    OutsidePointer,
    /// Viewport scrolled.
    Scroll,
    /// Auto-close delay elapsed.
    Timeout,
}

/// Which signals close a session and whether it closes on its own.
///
/// Fixed for the session's lifetime.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DismissalPolicy {
    /// Signals that request a close.
    pub triggers: DismissTriggers,
    /// Close this long after becoming visible, if set.
    pub auto_close: Option<Duration>,
}

impl DismissalPolicy {
    /// A policy with no triggers and no auto-close.
    pub const NONE: Self = Self {
        triggers: DismissTriggers::empty(),
        auto_close: None,
    };

    /// Create a policy from triggers, without auto-close.
    #[must_use]
    pub const fn new(triggers: DismissTriggers) -> Self {
        Self {
            triggers,
            auto_close: None,
        }
    }

    /// Set the auto-close delay.
    #[must_use]
    pub const fn with_auto_close(mut self, delay: Duration) -> Self {
        self.auto_close = Some(delay);
        self
    }

    /// Escape key requests a close.
    #[must_use]
    pub const fn escape_closes(&self) -> bool {
        self.triggers.contains(DismissTriggers::ESCAPE)
    }

    /// Pointer-down outside anchor and surface requests a close.
    #[must_use]
    pub const fn outside_click_closes(&self) -> bool {
        self.triggers.contains(DismissTriggers::OUTSIDE_POINTER)
    }

    /// Scrolling the viewport requests a close.
    #[must_use]
    pub const fn scroll_closes(&self) -> bool {
        self.triggers.contains(DismissTriggers::SCROLL)
    }
}

/// Who owns the open state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpenControl {
    /// The session closes itself on dismissal requests.
    #[default]
    Uncontrolled,
    /// The caller owns the open state; dismissal requests are advisory and only
    /// reach the open-change callback.
    Controlled,
}

/// Static configuration of a session.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Anchored placement; `None` for unanchored surfaces such as centered modals.
    pub placement: Option<PlacementConfig>,
    /// Dismissal signals and auto-close.
    pub dismissal: DismissalPolicy,
    /// Length of the exit animation.
    pub animation_duration: Duration,
    /// Controlled or uncontrolled open state.
    pub control: OpenControl,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            placement: None,
            dismissal: DismissalPolicy::default(),
            animation_duration: Duration::from_millis(150),
            control: OpenControl::Uncontrolled,
        }
    }
}

impl SessionConfig {
    /// Configuration for a surface anchored with `placement`.
    #[must_use]
    pub fn anchored(placement: PlacementConfig) -> Self {
        Self {
            placement: Some(placement),
            ..Self::default()
        }
    }

    /// Configuration for an unanchored surface.
    #[must_use]
    pub fn unanchored() -> Self {
        Self::default()
    }

    /// Set the dismissal policy.
    #[must_use]
    pub fn with_dismissal(mut self, dismissal: DismissalPolicy) -> Self {
        self.dismissal = dismissal;
        self
    }

    /// Set the exit animation duration.
    #[must_use]
    pub fn with_animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration = duration;
        self
    }

    /// Hand ownership of the open state to the caller.
    #[must_use]
    pub fn controlled(mut self) -> Self {
        self.control = OpenControl::Controlled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_predicates() {
        assert!(!SurfacePhase::Closed.is_mounted());
        assert!(SurfacePhase::Mounting.is_mounted());
        assert!(SurfacePhase::Closing.is_mounted());
        assert!(SurfacePhase::Visible.is_open());
        assert!(!SurfacePhase::Closing.is_open());
    }

    #[test]
    fn generation_is_monotonic() {
        let g = Generation::default();
        assert!(g.next() > g);
        assert_eq!(g.next().next().get(), 2);
    }

    #[test]
    fn policy_accessors_mirror_triggers() {
        let p = DismissalPolicy::default();
        assert!(p.escape_closes());
        assert!(p.outside_click_closes());
        assert!(!p.scroll_closes());
        assert_eq!(p.auto_close, None);

        let p = DismissalPolicy::new(DismissTriggers::SCROLL)
            .with_auto_close(Duration::from_millis(4000));
        assert!(!p.escape_closes());
        assert!(p.scroll_closes());
        assert_eq!(p.auto_close, Some(Duration::from_millis(4000)));

        assert!(DismissalPolicy::NONE.triggers.is_empty());
    }

    #[test]
    fn config_builders() {
        let cfg = SessionConfig::unanchored()
            .with_animation_duration(Duration::from_millis(300))
            .controlled();
        assert_eq!(cfg.placement, None);
        assert_eq!(cfg.animation_duration, Duration::from_millis(300));
        assert_eq!(cfg.control, OpenControl::Controlled);
        assert!(SessionConfig::anchored(PlacementConfig::default()).placement.is_some());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_json_fills_defaults() {
        let cfg: SessionConfig = serde_json::from_str(
            r#"{ "dismissal": { "triggers": "ESCAPE | SCROLL" }, "control": "Controlled" }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.dismissal.triggers,
            DismissTriggers::ESCAPE | DismissTriggers::SCROLL
        );
        assert_eq!(cfg.dismissal.auto_close, None);
        assert_eq!(cfg.animation_duration, Duration::from_millis(150));
        assert_eq!(cfg.control, OpenControl::Controlled);
        assert_eq!(cfg.placement, None);
    }
}
