//! # One-shot timer.
//!
//! Completes on the first step at which the logical clock has reached its
//! deadline, then stays completed. The deadline is absolute — clock reading
//! at creation plus the requested span — so the timer stays correct under
//! variable tick spacing instead of drifting like a decrementing counter
//! would.

use std::rc::Rc;
use std::time::Duration;

use crate::core::Ctx;
use crate::error::StepError;
use crate::units::{Lifecycle, Steppable};

/// Steppable unit completing once its deadline elapses.
pub struct OneShotTimer {
    life: Rc<Lifecycle>,
    deadline: Duration,
}

impl OneShotTimer {
    /// `span` is measured from the logical clock at creation.
    pub fn new(ctx: &Ctx, span: Duration) -> Rc<Self> {
        Rc::new(Self {
            life: Lifecycle::new(ctx),
            deadline: ctx.now() + span,
        })
    }

    /// The absolute logical deadline.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Logical time left until the deadline (zero once reached).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_sub(self.life.ctx().now())
    }
}

impl Steppable for OneShotTimer {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        &self.life
    }

    fn step(&self) -> Result<(), StepError> {
        if !self.life.mark_step() {
            return Ok(());
        }
        if self.life.ctx().now() >= self.deadline {
            self.life.complete();
        }
        Ok(())
    }
}
