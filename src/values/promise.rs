//! # Single-assignment promise.
//!
//! [`Promise`] holds at most one produced value: a one-shot value-carrying
//! completion signal, not a reusable cell. The first successful
//! [`Promise::set`] stores the value, fires the "arrived" hooks exactly
//! once and completes the promise; reading before any set and setting twice
//! are contract violations surfaced to the caller.
//!
//! [`TimedPromise`] adds a deadline: if no value arrived by then, the
//! promise completes empty with [`TimedPromise::timed_out`] set and rejects
//! any later assignment.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::core::Ctx;
use crate::error::StepError;
use crate::units::{Lifecycle, Steppable};

type ArrivedHook = Box<dyn FnOnce()>;

/// One-shot value-bearing completion signal.
pub struct Promise<T> {
    life: Rc<Lifecycle>,
    value: RefCell<Option<T>>,
    available: Cell<bool>,
    arrived: RefCell<Vec<ArrivedHook>>,
}

impl<T> Promise<T> {
    pub fn new(ctx: &Ctx) -> Rc<Self> {
        Rc::new(Self {
            life: Lifecycle::new(ctx),
            value: RefCell::new(None),
            available: Cell::new(false),
            arrived: RefCell::new(Vec::new()),
        })
    }

    /// Whether a value has been assigned.
    pub fn is_available(&self) -> bool {
        self.available.get()
    }

    /// Assigns the value: fires the arrived hooks exactly once, then
    /// completes (disposes) the promise.
    ///
    /// # Errors
    /// [`StepError::AlreadySet`] if a value was already assigned, or if the
    /// promise completed without one (timed out or disposed).
    pub fn set(&self, value: T) -> Result<(), StepError> {
        if self.available.get() || !self.life.is_active() {
            return Err(StepError::AlreadySet {
                promise: self.life.label(),
            });
        }
        *self.value.borrow_mut() = Some(value);
        self.available.set(true);

        let hooks = self.arrived.take();
        for hook in hooks {
            hook();
        }
        self.life.complete();
        Ok(())
    }

    /// Reads the value.
    ///
    /// # Errors
    /// [`StepError::NotSet`] if no value has been assigned yet.
    pub fn get(&self) -> Result<T, StepError>
    where
        T: Clone,
    {
        self.value.borrow().clone().ok_or(StepError::NotSet)
    }

    /// Moves the value out. The promise stays settled; a second set still
    /// fails.
    ///
    /// # Errors
    /// [`StepError::NotSet`] if no value has been assigned yet (or it was
    /// already taken).
    pub fn take(&self) -> Result<T, StepError> {
        self.value.borrow_mut().take().ok_or(StepError::NotSet)
    }

    /// Registers a one-shot hook fired when the value arrives. Dropped
    /// silently if the promise already settled.
    pub fn when_arrived(&self, hook: impl FnOnce() + 'static) {
        if !self.life.is_active() {
            return;
        }
        self.arrived.borrow_mut().push(Box::new(hook));
    }

    /// Settles the promise empty: drops the arrived hooks (they will never
    /// fire) and completes.
    pub(crate) fn expire(&self) {
        self.arrived.borrow_mut().clear();
        self.life.complete();
    }
}

impl<T> Steppable for Promise<T> {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        &self.life
    }

    fn step(&self) -> Result<(), StepError> {
        self.life.mark_step();
        Ok(())
    }
}

/// Promise that completes empty at a deadline.
pub struct TimedPromise<T> {
    promise: Promise<T>,
    deadline: Duration,
    timed_out: Cell<bool>,
}

impl<T> TimedPromise<T> {
    /// `span` is measured from the logical clock at creation.
    pub fn new(ctx: &Ctx, span: Duration) -> Rc<Self> {
        Rc::new(Self {
            promise: Promise {
                life: Lifecycle::new(ctx),
                value: RefCell::new(None),
                available: Cell::new(false),
                arrived: RefCell::new(Vec::new()),
            },
            deadline: ctx.now() + span,
            timed_out: Cell::new(false),
        })
    }

    /// The wrapped promise (set/get/take/when_arrived).
    pub fn promise(&self) -> &Promise<T> {
        &self.promise
    }

    /// Whether the deadline fired before any value arrived.
    pub fn timed_out(&self) -> bool {
        self.timed_out.get()
    }
}

impl<T> Steppable for TimedPromise<T> {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        &self.promise.life
    }

    fn step(&self) -> Result<(), StepError> {
        if !self.promise.life.mark_step() {
            return Ok(());
        }
        if self.promise.life.ctx().now() >= self.deadline {
            self.timed_out.set(true);
            log::warn!(
                "timed promise {} expired before a value arrived",
                self.promise.life.label()
            );
            self.promise.expire();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;

    fn ctx() -> Ctx {
        Ctx::new(&Config::default())
    }

    #[test]
    fn test_get_before_set_fails() {
        let promise: Rc<Promise<u32>> = Promise::new(&ctx());
        let err = promise.get().unwrap_err();
        assert_eq!(err.as_label(), "value_not_set");
    }

    #[test]
    fn test_set_fires_arrived_once_and_completes() {
        let promise: Rc<Promise<u32>> = Promise::new(&ctx());
        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();
        promise.when_arrived(move || f.set(f.get() + 1));

        promise.set(7).unwrap();
        assert_eq!(fired.get(), 1);
        assert_eq!(promise.get().unwrap(), 7);
        assert!(!promise.is_active(), "a settled promise is disposed");
    }

    #[test]
    fn test_second_set_fails() {
        let promise: Rc<Promise<u32>> = Promise::new(&ctx());
        promise.set(1).unwrap();
        let err = promise.set(2).unwrap_err();
        assert_eq!(err.as_label(), "value_already_set");
        assert_eq!(promise.get().unwrap(), 1, "first value must stand");
    }

    #[test]
    fn test_take_moves_value_but_keeps_promise_settled() {
        let promise: Rc<Promise<String>> = Promise::new(&ctx());
        promise.set("done".to_string()).unwrap();
        assert_eq!(promise.take().unwrap(), "done");
        assert_eq!(promise.take().unwrap_err().as_label(), "value_not_set");
        assert!(
            promise.set("again".to_string()).is_err(),
            "taking must not reopen the promise"
        );
    }

    #[test]
    fn test_timed_promise_expires_empty() {
        let c = ctx();
        let promise: Rc<TimedPromise<u32>> = TimedPromise::new(&c, Duration::from_millis(100));
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        promise.promise().when_arrived(move || f.set(true));

        promise.step().unwrap();
        assert!(promise.is_active());

        c.advance(Duration::from_millis(100));
        promise.step().unwrap();
        assert!(!promise.is_active());
        assert!(promise.timed_out());
        assert!(!fired.get(), "arrived must not fire on timeout");
        assert!(
            promise.promise().set(1).is_err(),
            "a timed-out promise rejects assignment"
        );
    }

    #[test]
    fn test_timed_promise_value_beats_deadline() {
        let c = ctx();
        let promise: Rc<TimedPromise<u32>> = TimedPromise::new(&c, Duration::from_secs(1));
        promise.promise().set(42).unwrap();

        c.advance(Duration::from_secs(2));
        promise.step().unwrap();
        assert!(!promise.timed_out(), "settled promises do not time out");
        assert_eq!(promise.promise().get().unwrap(), 42);
    }
}
