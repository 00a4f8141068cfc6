//! # Trivial steppable units.
//!
//! - [`Unit`] — a bare steppable object: it counts steps and does nothing
//!   else until completed from outside. Useful as a join point for the
//!   linking helpers and in tests.
//! - [`Act`] — runs a fallible closure on its first effective step, then
//!   completes. The closure's `Err` is the supported way for user code to
//!   fail inside a traversal and exercise the owning node's containment.
//! - [`Nop`] — completes on its first effective step.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::Ctx;
use crate::error::StepError;
use crate::units::lifecycle::Lifecycle;
use crate::units::steppable::Steppable;

/// Bare steppable unit with no behavior of its own.
pub struct Unit {
    life: Rc<Lifecycle>,
}

impl Unit {
    pub fn new(ctx: &Ctx) -> Rc<Self> {
        Rc::new(Self {
            life: Lifecycle::new(ctx),
        })
    }
}

impl Steppable for Unit {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        &self.life
    }

    fn step(&self) -> Result<(), StepError> {
        self.life.mark_step();
        Ok(())
    }
}

type Action = Box<dyn FnOnce() -> Result<(), StepError>>;

/// Runs a closure once, then completes.
pub struct Act {
    life: Rc<Lifecycle>,
    action: RefCell<Option<Action>>,
}

impl Act {
    pub fn new(ctx: &Ctx, action: impl FnOnce() -> Result<(), StepError> + 'static) -> Rc<Self> {
        Rc::new(Self {
            life: Lifecycle::new(ctx),
            action: RefCell::new(Some(Box::new(action))),
        })
    }
}

impl Steppable for Act {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        &self.life
    }

    fn step(&self) -> Result<(), StepError> {
        if !self.life.mark_step() {
            return Ok(());
        }
        let action = self.action.borrow_mut().take();
        let result = match action {
            Some(action) => action(),
            None => Ok(()),
        };
        self.life.complete();
        result
    }
}

/// Does nothing, then completes — a one-tick placeholder.
pub struct Nop {
    life: Rc<Lifecycle>,
}

impl Nop {
    pub fn new(ctx: &Ctx) -> Rc<Self> {
        Rc::new(Self {
            life: Lifecycle::new(ctx),
        })
    }
}

impl Steppable for Nop {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        &self.life
    }

    fn step(&self) -> Result<(), StepError> {
        if self.life.mark_step() {
            self.life.complete();
        }
        Ok(())
    }
}
