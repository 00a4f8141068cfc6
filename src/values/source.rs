//! # Value-producing steppable units.
//!
//! [`Producer`] is the capability a [`Channel`](crate::Channel) consumes:
//! a steppable unit whose step may leave behind one yielded value. Two
//! built-in producers:
//!
//! - [`Expr`] — evaluates a closure on every effective step and yields the
//!   result; never completes on its own.
//! - [`Iterate`] — drains an iterator one item per step and completes on
//!   exhaustion.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::Ctx;
use crate::error::StepError;
use crate::units::{Lifecycle, Steppable};

/// A steppable unit that yields values as it is stepped.
pub trait Producer<T>: Steppable {
    /// Takes the value yielded by the most recent step, if any. Consuming
    /// it resets the slot; at most one value is pending at a time.
    fn take_value(&self) -> Option<T>;
}

/// Evaluates a closure each step, yielding its result.
pub struct Expr<T: 'static> {
    life: Rc<Lifecycle>,
    eval: RefCell<Box<dyn FnMut() -> T>>,
    yielded: RefCell<Option<T>>,
}

impl<T: 'static> Expr<T> {
    pub fn new(ctx: &Ctx, eval: impl FnMut() -> T + 'static) -> Rc<Self> {
        Rc::new(Self {
            life: Lifecycle::new(ctx),
            eval: RefCell::new(Box::new(eval)),
            yielded: RefCell::new(None),
        })
    }
}

impl<T: 'static> Steppable for Expr<T> {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        &self.life
    }

    fn step(&self) -> Result<(), StepError> {
        if !self.life.mark_step() {
            return Ok(());
        }
        let value = (self.eval.borrow_mut())();
        *self.yielded.borrow_mut() = Some(value);
        Ok(())
    }
}

impl<T: 'static> Producer<T> for Expr<T> {
    fn take_value(&self) -> Option<T> {
        self.yielded.borrow_mut().take()
    }
}

/// Drains an iterator one item per step; completes on exhaustion.
pub struct Iterate<T: 'static> {
    life: Rc<Lifecycle>,
    items: RefCell<Box<dyn Iterator<Item = T>>>,
    yielded: RefCell<Option<T>>,
}

impl<T: 'static> Iterate<T> {
    pub fn new<I>(ctx: &Ctx, items: I) -> Rc<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Rc::new(Self {
            life: Lifecycle::new(ctx),
            items: RefCell::new(Box::new(items.into_iter())),
            yielded: RefCell::new(None),
        })
    }
}

impl<T: 'static> Steppable for Iterate<T> {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        &self.life
    }

    fn step(&self) -> Result<(), StepError> {
        if !self.life.mark_step() {
            return Ok(());
        }
        match self.items.borrow_mut().next() {
            Some(value) => *self.yielded.borrow_mut() = Some(value),
            None => self.life.complete(),
        }
        Ok(())
    }
}

impl<T: 'static> Producer<T> for Iterate<T> {
    fn take_value(&self) -> Option<T> {
        self.yielded.borrow_mut().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use std::cell::Cell;

    fn ctx() -> Ctx {
        Ctx::new(&Config::default())
    }

    #[test]
    fn test_expr_yields_each_step() {
        let c = ctx();
        let counter = Rc::new(Cell::new(0u32));
        let n = counter.clone();
        let expr = Expr::new(&c, move || {
            n.set(n.get() + 1);
            n.get()
        });

        expr.step().unwrap();
        assert_eq!(expr.take_value(), Some(1));
        assert_eq!(expr.take_value(), None, "a yield is consumed once");

        expr.step().unwrap();
        assert_eq!(expr.take_value(), Some(2));
        assert!(expr.is_active(), "expressions never self-complete");
    }

    #[test]
    fn test_iterate_drains_then_completes() {
        let it = Iterate::new(&ctx(), vec![10, 20]);

        it.step().unwrap();
        assert_eq!(it.take_value(), Some(10));
        it.step().unwrap();
        assert_eq!(it.take_value(), Some(20));
        assert!(it.is_active(), "not yet exhausted");

        it.step().unwrap();
        assert_eq!(it.take_value(), None);
        assert!(!it.is_active(), "exhaustion completes the producer");
    }
}
