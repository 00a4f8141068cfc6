//! # First-completion trigger.
//!
//! [`Trigger`] watches a set of members and completes as soon as any one of
//! them completes, recording which member fired. The dual of a barrier:
//! any-of instead of all-of.
//!
//! [`TimedTrigger`] force-completes at a deadline with no fired member,
//! marking [`TimedTrigger::timed_out`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::core::Ctx;
use crate::error::StepError;
use crate::units::{Lifecycle, Steppable};

use super::group::{Container, Group};

/// Container completing when the first of its members completes.
pub struct Trigger {
    group: Group,
    fired: RefCell<Option<Rc<dyn Steppable>>>,
}

impl Trigger {
    pub fn new(ctx: &Ctx) -> Rc<Self> {
        Rc::new(Self::new_inner(ctx))
    }

    pub(crate) fn new_inner(ctx: &Ctx) -> Self {
        Self {
            group: Group::new_inner(ctx),
            fired: RefCell::new(None),
        }
    }

    /// The member whose completion fired the trigger, once completed.
    pub fn fired(&self) -> Option<Rc<dyn Steppable>> {
        self.fired.borrow().clone()
    }
}

impl Steppable for Trigger {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        self.group.lifecycle_ref()
    }

    fn step(&self) -> Result<(), StepError> {
        if !self.group.lifecycle_ref().mark_step() {
            return Ok(());
        }
        // Same merge-then-check discipline as the barrier: an addition that
        // completed before arriving can fire the trigger on its merge step.
        self.group.merge();

        let first_done = self
            .group
            .snapshot()
            .into_iter()
            .find(|m| !m.is_active());
        if let Some(member) = first_done {
            *self.fired.borrow_mut() = Some(member);
            self.group.lifecycle_ref().complete();
        }
        Ok(())
    }
}

impl Container for Trigger {
    fn as_group(&self) -> &Group {
        &self.group
    }
}

/// Trigger that force-completes at a deadline.
pub struct TimedTrigger {
    trigger: Trigger,
    deadline: Duration,
    timed_out: Cell<bool>,
}

impl TimedTrigger {
    /// `span` is measured from the logical clock at creation.
    pub fn new(ctx: &Ctx, span: Duration) -> Rc<Self> {
        Rc::new(Self {
            trigger: Trigger::new_inner(ctx),
            deadline: ctx.now() + span,
            timed_out: Cell::new(false),
        })
    }

    /// The member whose completion fired the trigger, if any did in time.
    pub fn fired(&self) -> Option<Rc<dyn Steppable>> {
        self.trigger.fired()
    }

    /// Whether the deadline fired before any member completed.
    pub fn timed_out(&self) -> bool {
        self.timed_out.get()
    }
}

impl Steppable for TimedTrigger {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        self.trigger.lifecycle()
    }

    fn step(&self) -> Result<(), StepError> {
        if !self.is_active() {
            return Ok(());
        }
        // Same tie-break as the timed barrier: a member completion seen on
        // the exact deadline tick fires the trigger, not the timeout.
        self.trigger.step()?;
        if !self.is_active() {
            return Ok(());
        }
        let life = self.trigger.lifecycle();
        if life.ctx().now() >= self.deadline {
            self.timed_out.set(true);
            life.complete();
        }
        Ok(())
    }
}

impl Container for TimedTrigger {
    fn as_group(&self) -> &Group {
        self.trigger.as_group()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::units::Unit;

    fn ctx() -> Ctx {
        Ctx::new(&Config::default())
    }

    #[test]
    fn test_first_completion_fires() {
        let c = ctx();
        let trigger = Trigger::new(&c);
        let a = Unit::new(&c);
        let b = Unit::new(&c);
        trigger.add(a.clone());
        trigger.add(b.clone());
        trigger.step().unwrap();
        assert!(trigger.is_active());

        b.complete();
        trigger.step().unwrap();
        assert!(!trigger.is_active());
        let fired = trigger.fired().expect("a member fired");
        assert_eq!(fired.id(), b.id());
    }

    #[test]
    fn test_timed_trigger_expires_empty_handed() {
        let c = ctx();
        let trigger = TimedTrigger::new(&c, Duration::from_millis(50));
        trigger.add(Unit::new(&c));

        trigger.step().unwrap();
        c.advance(Duration::from_millis(50));
        trigger.step().unwrap();

        assert!(!trigger.is_active());
        assert!(trigger.timed_out());
        assert!(trigger.fired().is_none());
    }

    #[test]
    fn test_member_beats_deadline() {
        let c = ctx();
        let trigger = TimedTrigger::new(&c, Duration::from_secs(5));
        let member = Unit::new(&c);
        trigger.add(member.clone());
        trigger.step().unwrap();

        member.complete();
        trigger.step().unwrap();
        assert!(!trigger.is_active());
        assert!(!trigger.timed_out());
        assert!(trigger.fired().is_some());
    }

    #[test]
    fn test_completion_on_the_deadline_tick_fires() {
        let c = ctx();
        let trigger = TimedTrigger::new(&c, Duration::from_millis(50));
        let member = Unit::new(&c);
        trigger.add(member.clone());
        trigger.step().unwrap();

        member.complete();
        c.advance(Duration::from_millis(50));
        trigger.step().unwrap();
        assert!(!trigger.is_active());
        assert!(!trigger.timed_out(), "the fired member must win the tie");
        assert_eq!(trigger.fired().map(|m| m.id()), Some(member.id()));
    }
}
