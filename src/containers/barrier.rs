//! # Draining barrier.
//!
//! [`Barrier`] completes once it holds no active members and no pending
//! insertions. The check order is deliberate and deterministic: every step
//! merges pending insertions *before* the drained check, so an addition
//! that is already complete on arrival is accounted for in the same step it
//! merges, and the barrier can never declare completion while insertions
//! are still in flight.
//!
//! [`TimedBarrier`] adds a deadline: when the logical clock reaches it, the
//! barrier force-completes with [`TimedBarrier::timed_out`] set, whether or
//! not it drained. Draining wins a tie: a barrier whose last member is done
//! by the deadline tick completes normally.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::core::Ctx;
use crate::error::StepError;
use crate::units::{Lifecycle, Steppable};

use super::group::{Container, Group};

/// Container completing only when drained of active members and pending
/// insertions.
pub struct Barrier {
    group: Group,
}

impl Barrier {
    pub fn new(ctx: &Ctx) -> Rc<Self> {
        Rc::new(Self::new_inner(ctx))
    }

    pub(crate) fn new_inner(ctx: &Ctx) -> Self {
        Self {
            group: Group::new_inner(ctx),
        }
    }
}

impl Steppable for Barrier {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        self.group.lifecycle_ref()
    }

    fn step(&self) -> Result<(), StepError> {
        if !self.group.lifecycle_ref().mark_step() {
            return Ok(());
        }
        self.group.prune();
        // Merge-then-check: pending insertions become visible before the
        // drained decision for this step.
        self.group.merge();

        if !self.group.any_active() && self.group.pending_count() == 0 {
            self.group.lifecycle_ref().complete();
        }
        Ok(())
    }
}

impl Container for Barrier {
    fn as_group(&self) -> &Group {
        &self.group
    }
}

/// Barrier that force-completes at a deadline.
pub struct TimedBarrier {
    barrier: Barrier,
    deadline: Duration,
    timed_out: Cell<bool>,
}

impl TimedBarrier {
    /// `span` is measured from the logical clock at creation.
    pub fn new(ctx: &Ctx, span: Duration) -> Rc<Self> {
        Rc::new(Self {
            barrier: Barrier::new_inner(ctx),
            deadline: ctx.now() + span,
            timed_out: Cell::new(false),
        })
    }

    /// Whether the deadline, not draining, completed this barrier.
    pub fn timed_out(&self) -> bool {
        self.timed_out.get()
    }

    /// The absolute logical deadline.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

impl Steppable for TimedBarrier {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        self.barrier.lifecycle()
    }

    fn step(&self) -> Result<(), StepError> {
        if !self.is_active() {
            return Ok(());
        }
        // Drain wins the tie: on the exact deadline tick a barrier that
        // drained is a normal completion, not a timeout.
        self.barrier.step()?;
        if !self.is_active() {
            return Ok(());
        }
        let life = self.barrier.lifecycle();
        if life.ctx().now() >= self.deadline {
            self.timed_out.set(true);
            log::warn!("timed barrier {} expired before draining", life.label());
            life.complete();
        }
        Ok(())
    }
}

impl Container for TimedBarrier {
    fn as_group(&self) -> &Group {
        self.barrier.as_group()
    }
}
