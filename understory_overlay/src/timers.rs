// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pending callback bookkeeping for one session.

use alloc::vec::Vec;
use core::time::Duration;

use crate::host::Scheduler;
use crate::types::Token;

/// Callbacks a session has scheduled and not yet seen fire or cancelled.
#[derive(Debug)]
pub(crate) struct Timers<T> {
    pending: Vec<(T, Token)>,
}

impl<T: Copy + Eq> Timers<T> {
    pub(crate) const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn frame<S: Scheduler<TimerHandle = T>>(&mut self, host: &mut S, token: Token) {
        let handle = host.request_frame(token);
        self.pending.push((handle, token));
    }

    pub(crate) fn after<S: Scheduler<TimerHandle = T>>(
        &mut self,
        host: &mut S,
        delay: Duration,
        token: Token,
    ) {
        let handle = host.set_timeout(delay, token);
        self.pending.push((handle, token));
    }

    /// Forget a fired callback. Returns false if it was not pending (cancelled or stale).
    pub(crate) fn settle(&mut self, token: Token) -> bool {
        match self.pending.iter().position(|(_, t)| *t == token) {
            Some(i) => {
                self.pending.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending callback whose token matches `pred`.
    pub(crate) fn cancel_where<S: Scheduler<TimerHandle = T>>(
        &mut self,
        host: &mut S,
        pred: impl Fn(Token) -> bool,
    ) {
        self.pending.retain(|&(handle, token)| {
            if pred(token) {
                host.cancel(handle);
                false
            } else {
                true
            }
        });
    }
}
