//! Element types that report to a [`FaultPlan`].
//!
//! - [`Flaky`]: fallible copy and move, relocated with [`CopyOnGrow`].
//! - [`FlakyMoveOnly`]: fallible move only, relocated with [`MoveOrAbandon`].
//! - [`Tracked`]: infallible, relocated with [`NoThrowMove`]; counts copies
//!   and drops.
//! - [`Brittle`]: relocated with [`CopyOnGrow`], but its copies and moves
//!   panic where the others would return an error, and its drop can be set
//!   to panic.
//!
//! A moved-from probe keeps living with no value (`value()` is `None`) until
//! it is dropped, which is what lets tests check that no value is lost or
//! duplicated.

use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

use tessera_array::{CopyOnGrow, Element, MoveOrAbandon, NoThrowMove, TryClone, TryMove};

use crate::{FaultPlan, InjectedFault};

/// Marker for probes that can be copied.
#[derive(Debug)]
pub enum Copyable {}

/// Marker for probes that can only be moved.
#[derive(Debug)]
pub enum MoveOnly {}

/// A value whose copies and moves consult a [`FaultPlan`].
pub struct Probe<M> {
    value: Option<i64>,
    plan: FaultPlan,
    _mode: PhantomData<M>,
}

/// Copyable probe: growth has the strong guarantee.
pub type Flaky = Probe<Copyable>;

/// Move-only probe: growth has the basic guarantee.
pub type FlakyMoveOnly = Probe<MoveOnly>;

impl<M> Probe<M> {
    /// A new live value. Construction never fails.
    pub fn new(plan: &FaultPlan, value: i64) -> Self {
        plan.on_create();
        Self {
            value: Some(value),
            plan: plan.clone(),
            _mode: PhantomData,
        }
    }

    /// The held value, or `None` once moved from.
    pub fn value(&self) -> Option<i64> {
        self.value
    }
}

impl<M> Drop for Probe<M> {
    fn drop(&mut self) {
        self.plan.on_drop();
    }
}

impl<M> PartialEq for Probe<M> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<M> fmt::Debug for Probe<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "Probe({v})"),
            None => f.write_str("Probe(moved)"),
        }
    }
}

impl Element for Flaky {
    type Error = InjectedFault;
    type Relocation = CopyOnGrow;
}

impl Element for FlakyMoveOnly {
    type Error = InjectedFault;
    type Relocation = MoveOrAbandon;
}

impl<M> TryMove for Probe<M>
where
    Probe<M>: Element<Error = InjectedFault>,
{
    fn try_move_from(src: &mut Self) -> Result<Self, Self::Error> {
        src.plan.on_move()?;
        src.plan.on_create();
        Ok(Self {
            value: src.value.take(),
            plan: src.plan.clone(),
            _mode: PhantomData,
        })
    }

    fn try_move_assign(&mut self, src: &mut Self) -> Result<(), Self::Error> {
        src.plan.on_move()?;
        self.value = src.value.take();
        Ok(())
    }
}

impl TryClone for Flaky {
    fn try_clone(&self) -> Result<Self, Self::Error> {
        self.plan.on_copy()?;
        self.plan.on_create();
        Ok(Self {
            value: self.value,
            plan: self.plan.clone(),
            _mode: PhantomData,
        })
    }
}

/// An infallible element that counts copies and drops.
pub struct Tracked {
    value: i64,
    plan: FaultPlan,
}

impl Tracked {
    pub fn new(plan: &FaultPlan, value: i64) -> Self {
        plan.on_create();
        Self {
            value,
            plan: plan.clone(),
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.plan.on_drop();
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for Tracked {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}

impl Element for Tracked {
    type Error = Infallible;
    type Relocation = NoThrowMove;
}

impl TryClone for Tracked {
    fn try_clone(&self) -> Result<Self, Self::Error> {
        // Counted only; armed copy faults are left for fallible fixtures.
        self.plan.count_copy();
        Ok(Self::new(&self.plan, self.value))
    }
}

/// An element that panics instead of failing.
///
/// Its copy and move operations never return `Err`; when the plan's copy or
/// move trigger fires they panic with the injected fault. Dropping the value
/// named by [`FaultPlan::panic_on_drop_of`] panics after the drop has been
/// counted. No panic is raised while the thread is already unwinding.
pub struct Brittle {
    value: Option<i64>,
    plan: FaultPlan,
}

impl Brittle {
    pub fn new(plan: &FaultPlan, value: i64) -> Self {
        plan.on_create();
        Self {
            value: Some(value),
            plan: plan.clone(),
        }
    }

    pub fn value(&self) -> Option<i64> {
        self.value
    }

    fn check(outcome: Result<(), InjectedFault>) {
        if let Err(fault) = outcome {
            if !std::thread::panicking() {
                panic!("{fault}");
            }
        }
    }
}

impl Drop for Brittle {
    fn drop(&mut self) {
        self.plan.on_drop();
        if self.plan.take_drop_panic(self.value) && !std::thread::panicking() {
            panic!("injected drop panic for {:?}", self.value);
        }
    }
}

impl fmt::Debug for Brittle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "Brittle({v})"),
            None => f.write_str("Brittle(moved)"),
        }
    }
}

impl Element for Brittle {
    type Error = Infallible;
    type Relocation = CopyOnGrow;
}

impl TryMove for Brittle {
    fn try_move_from(src: &mut Self) -> Result<Self, Self::Error> {
        Self::check(src.plan.on_move());
        src.plan.on_create();
        Ok(Self {
            value: src.value.take(),
            plan: src.plan.clone(),
        })
    }

    fn try_move_assign(&mut self, src: &mut Self) -> Result<(), Self::Error> {
        Self::check(src.plan.on_move());
        self.value = src.value.take();
        Ok(())
    }
}

impl TryClone for Brittle {
    fn try_clone(&self) -> Result<Self, Self::Error> {
        Self::check(self.plan.on_copy());
        self.plan.on_create();
        Ok(Self {
            value: self.value,
            plan: self.plan.clone(),
        })
    }
}
