//! Test utilities for Tessera development.
//!
//! Provides a shared [`FaultPlan`] that counts copies, moves and live
//! values, and can be armed to fail the next copy or move after a given
//! number of successes. The element types in [`fixtures`] report to it.
//! [`Brittle`] turns the same triggers into panics, and can also be told
//! to panic when one chosen value is dropped.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

pub use fixtures::{Brittle, Flaky, FlakyMoveOnly, Probe, Tracked};

/// Which kind of element operation a fault was injected into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultKind {
    Copy,
    Move,
}

/// The error every fixture reports when its plan tells it to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InjectedFault {
    pub kind: FaultKind,
    /// 1-based count of operations of this kind when the fault fired.
    pub at: usize,
}

impl fmt::Display for InjectedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FaultKind::Copy => "copy",
            FaultKind::Move => "move",
        };
        write!(f, "injected {kind} failure at {kind} #{}", self.at)
    }
}

impl Error for InjectedFault {}

#[derive(Default)]
struct PlanState {
    copies: Cell<usize>,
    moves: Cell<usize>,
    fail_copy_at: Cell<Option<usize>>,
    fail_move_at: Cell<Option<usize>>,
    panic_drop_of: Cell<Option<i64>>,
    live: Cell<usize>,
    dropped: Cell<usize>,
}

/// Shared counters and fault triggers for one test.
///
/// Cloning a plan shares its state; every fixture built from it reports to
/// the same counters.
#[derive(Clone, Default)]
pub struct FaultPlan {
    state: Rc<PlanState>,
}

impl FaultPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `successes` more copies through, then fail the next one.
    ///
    /// Fires once; later copies succeed again.
    pub fn fail_copy_after(&self, successes: usize) {
        let at = self.state.copies.get() + successes + 1;
        self.state.fail_copy_at.set(Some(at));
    }

    /// Let `successes` more moves through, then fail the next one.
    ///
    /// Fires once; later moves succeed again.
    pub fn fail_move_after(&self, successes: usize) {
        let at = self.state.moves.get() + successes + 1;
        self.state.fail_move_at.set(Some(at));
    }

    /// Make the next drop of a [`Brittle`] holding `value` panic.
    ///
    /// Fires once; the value still counts as dropped.
    pub fn panic_on_drop_of(&self, value: i64) {
        self.state.panic_drop_of.set(Some(value));
    }

    /// Cancel any armed fault.
    pub fn disarm(&self) {
        self.state.fail_copy_at.set(None);
        self.state.fail_move_at.set(None);
        self.state.panic_drop_of.set(None);
    }

    /// Whether a fault is armed and has not fired yet.
    pub fn is_armed(&self) -> bool {
        self.state.fail_copy_at.get().is_some()
            || self.state.fail_move_at.get().is_some()
            || self.state.panic_drop_of.get().is_some()
    }

    /// Copies attempted so far, including failed ones.
    pub fn copies(&self) -> usize {
        self.state.copies.get()
    }

    /// Moves attempted so far, including failed ones.
    pub fn moves(&self) -> usize {
        self.state.moves.get()
    }

    /// Values created and not yet dropped. Moved-from values count until
    /// they are dropped.
    pub fn live(&self) -> usize {
        self.state.live.get()
    }

    /// Values dropped so far.
    pub fn dropped(&self) -> usize {
        self.state.dropped.get()
    }

    pub(crate) fn on_copy(&self) -> Result<(), InjectedFault> {
        Self::attempt(&self.state.copies, &self.state.fail_copy_at, FaultKind::Copy)
    }

    /// Count a copy that cannot fail, leaving any armed copy fault alone.
    pub(crate) fn count_copy(&self) {
        self.state.copies.set(self.state.copies.get() + 1);
    }

    pub(crate) fn on_move(&self) -> Result<(), InjectedFault> {
        Self::attempt(&self.state.moves, &self.state.fail_move_at, FaultKind::Move)
    }

    fn attempt(
        count: &Cell<usize>,
        trigger: &Cell<Option<usize>>,
        kind: FaultKind,
    ) -> Result<(), InjectedFault> {
        let n = count.get() + 1;
        count.set(n);
        if trigger.get() == Some(n) {
            trigger.set(None);
            return Err(InjectedFault { kind, at: n });
        }
        Ok(())
    }

    pub(crate) fn on_create(&self) {
        self.state.live.set(self.state.live.get() + 1);
    }

    pub(crate) fn on_drop(&self) {
        self.state.live.set(self.state.live.get() - 1);
        self.state.dropped.set(self.state.dropped.get() + 1);
    }

    /// Whether dropping `value` should panic now. Consumes the trigger.
    pub(crate) fn take_drop_panic(&self, value: Option<i64>) -> bool {
        if value.is_some() && self.state.panic_drop_of.get() == value {
            self.state.panic_drop_of.set(None);
            return true;
        }
        false
    }
}

impl fmt::Debug for FaultPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultPlan")
            .field("copies", &self.copies())
            .field("moves", &self.moves())
            .field("live", &self.live())
            .field("dropped", &self.dropped())
            .finish()
    }
}
