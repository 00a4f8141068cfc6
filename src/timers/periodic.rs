//! # Periodic timer.
//!
//! Fires an "elapsed" notification each time the logical clock passes its
//! current deadline, then re-arms the next period. Unlike the one-shot
//! timer it never completes on its own; dispose it with `complete()`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::core::Ctx;
use crate::error::StepError;
use crate::units::{Lifecycle, Steppable};

type ElapsedHook = Box<dyn Fn(u64)>;

/// Steppable unit firing a recurring notification at fixed logical
/// intervals.
pub struct PeriodicTimer {
    life: Rc<Lifecycle>,
    interval: Duration,
    deadline: Cell<Duration>,
    periods: Cell<u64>,
    on_elapsed: RefCell<Vec<ElapsedHook>>,
}

impl PeriodicTimer {
    /// The first firing is one `interval` after the clock at creation. A
    /// zero interval degenerates to one firing per effective step.
    pub fn new(ctx: &Ctx, interval: Duration) -> Rc<Self> {
        Rc::new(Self {
            life: Lifecycle::new(ctx),
            interval,
            deadline: Cell::new(ctx.now() + interval),
            periods: Cell::new(0),
            on_elapsed: RefCell::new(Vec::new()),
        })
    }

    /// Registers a recurring hook receiving the 1-based period number.
    pub fn when_elapsed(&self, hook: impl Fn(u64) + 'static) {
        self.on_elapsed.borrow_mut().push(Box::new(hook));
    }

    /// Number of periods fired so far.
    pub fn periods(&self) -> u64 {
        self.periods.get()
    }

    /// The configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Steppable for PeriodicTimer {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        &self.life
    }

    fn step(&self) -> Result<(), StepError> {
        if !self.life.mark_step() {
            return Ok(());
        }
        let now = self.life.ctx().now();
        if now < self.deadline.get() {
            return Ok(());
        }

        let period = self.periods.get() + 1;
        self.periods.set(period);
        for hook in self.on_elapsed.borrow().iter() {
            hook(period);
        }

        // One notification per step; skip whole periods missed by sparse
        // ticks rather than firing a backlog. A zero interval cannot
        // outrun the clock, so it re-arms at `now` and fires each step.
        if self.interval.is_zero() {
            self.deadline.set(now);
            return Ok(());
        }
        let mut next = self.deadline.get() + self.interval;
        while next <= now {
            next += self.interval;
        }
        self.deadline.set(next);
        Ok(())
    }
}
