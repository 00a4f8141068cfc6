//! # The steppable capability and the suspend/resume coupling protocol.
//!
//! [`Steppable`] is the single trait every scheduled object implements:
//! expose your [`Lifecycle`] and a `step()`. Everything else — identity,
//! activity queries, suspend/resume, and the completion-linking helpers —
//! is provided on top of the lifecycle.
//!
//! ## Linking protocol
//! [`Steppable::suspend_after`] and [`Steppable::resume_after`] couple one
//! unit's running state to another unit's completion:
//!
//! - the *immediate* branch (linked object absent or already inactive)
//!   applies the final effect synchronously and registers **nothing**;
//! - the *deferred* branch applies the opposite effect now and registers a
//!   one-shot completion hook holding only a [`Weak`] reference back to
//!   this unit's lifecycle.
//!
//! The hook is a `FnOnce` consumed by the single completion firing, so the
//! link is removed exactly once in every path — there is no persistent
//! callback registration to leak, and the link never extends either
//! object's lifetime.
//!
//! The duration overloads ([`Steppable::suspend_after_delay`],
//! [`Steppable::resume_after_delay`]) build an internal one-shot timer,
//! hand it to the kernel's hidden system node for stepping, and delegate to
//! the reference form.

use std::rc::Rc;
use std::time::Duration;

use crate::error::StepError;
use crate::timers::OneShotTimer;
use crate::units::lifecycle::Lifecycle;

/// A lifecycle object that can be advanced one logical tick.
///
/// `step()` must be a no-op when the object is inactive; implementations
/// get that by routing through [`Lifecycle::mark_step`].
pub trait Steppable {
    /// The shared lifecycle core of this object.
    fn lifecycle(&self) -> &Rc<Lifecycle>;

    /// Advances the object by one logical tick.
    fn step(&self) -> Result<(), StepError>;

    /// Opaque id, unique within the owning kernel.
    fn id(&self) -> u64 {
        self.lifecycle().id()
    }

    /// Optional name, for logs.
    fn name(&self) -> Option<Rc<str>> {
        self.lifecycle().name()
    }

    /// Assigns a name used in logs and error labels.
    fn set_name(&self, name: &str) {
        self.lifecycle().set_name(name);
    }

    /// `true` from creation until completion.
    fn is_active(&self) -> bool {
        self.lifecycle().is_active()
    }

    /// `true` when the object will be stepped by its parent's traversal.
    fn is_running(&self) -> bool {
        self.lifecycle().is_running()
    }

    /// Number of effective steps taken so far.
    fn step_count(&self) -> u64 {
        self.lifecycle().step_count()
    }

    /// Completes the object (idempotent). `dispose` and `complete` are the
    /// same operation in this design.
    fn complete(&self) {
        self.lifecycle().complete();
    }

    /// Parks the object; it is skipped by traversal until resumed.
    fn suspend(&self) {
        self.lifecycle().suspend();
    }

    /// Unparks the object. No-op when already running or inactive.
    fn resume(&self) {
        self.lifecycle().resume();
    }

    /// Runs now; suspends when `other` completes.
    ///
    /// If `other` is absent or already inactive, suspends immediately and
    /// registers nothing.
    fn suspend_after(&self, other: Option<&dyn Steppable>) {
        match other.filter(|o| o.is_active()) {
            None => self.suspend(),
            Some(other) => {
                self.resume();
                let me = Rc::downgrade(self.lifecycle());
                other.lifecycle().when_completed(move || {
                    if let Some(life) = me.upgrade() {
                        life.suspend();
                    }
                });
            }
        }
    }

    /// Suspends now; resumes when `other` completes.
    ///
    /// If `other` is absent or already inactive, resumes immediately and
    /// registers nothing.
    fn resume_after(&self, other: Option<&dyn Steppable>) {
        match other.filter(|o| o.is_active()) {
            None => self.resume(),
            Some(other) => {
                self.suspend();
                let me = Rc::downgrade(self.lifecycle());
                other.lifecycle().when_completed(move || {
                    if let Some(life) = me.upgrade() {
                        life.resume();
                    }
                });
            }
        }
    }

    /// Runs for `span` of logical time, then suspends.
    ///
    /// No-op when already inactive. The internal timer is stepped by the
    /// kernel's hidden system node starting next tick.
    fn suspend_after_delay(&self, span: Duration) {
        if !self.is_active() {
            return;
        }
        let timer = schedule_system_timer(self.lifecycle(), span);
        self.suspend_after(Some(&*timer));
    }

    /// Suspends for `span` of logical time, then resumes.
    ///
    /// No-op when already inactive.
    fn resume_after_delay(&self, span: Duration) {
        if !self.is_active() {
            return;
        }
        let timer = schedule_system_timer(self.lifecycle(), span);
        self.resume_after(Some(&*timer));
    }
}

/// Builds a one-shot timer on the caller's kernel and queues it for the
/// hidden system node.
fn schedule_system_timer(life: &Rc<Lifecycle>, span: Duration) -> Rc<OneShotTimer> {
    let timer = OneShotTimer::new(life.ctx(), span);
    life.ctx().defer_system(timer.clone());
    timer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, Ctx};
    use crate::units::Unit;

    fn ctx() -> Ctx {
        Ctx::new(&Config::default())
    }

    #[test]
    fn test_resume_after_none_resumes_immediately() {
        let c = ctx();
        let unit = Unit::new(&c);
        unit.suspend();
        unit.resume_after(None);
        assert!(unit.is_running(), "absent link must resume synchronously");
    }

    #[test]
    fn test_resume_after_inactive_resumes_immediately() {
        let c = ctx();
        let unit = Unit::new(&c);
        let done = Unit::new(&c);
        done.complete();

        unit.suspend();
        unit.resume_after(Some(&*done));
        assert!(unit.is_running(), "inactive link must resume synchronously");
    }

    #[test]
    fn test_resume_after_fires_on_completion() {
        let c = ctx();
        let unit = Unit::new(&c);
        let gate = Unit::new(&c);

        unit.resume_after(Some(&*gate));
        assert!(!unit.is_running(), "linked unit must be suspended first");

        gate.complete();
        assert!(unit.is_running(), "completion must resume the linked unit");
    }

    #[test]
    fn test_suspend_after_fires_on_completion() {
        let c = ctx();
        let unit = Unit::new(&c);
        let gate = Unit::new(&c);

        unit.suspend();
        unit.suspend_after(Some(&*gate));
        assert!(unit.is_running(), "deferred branch resumes the unit first");

        gate.complete();
        assert!(!unit.is_running(), "completion must suspend the linked unit");
    }

    #[test]
    fn test_suspend_after_none_suspends_immediately() {
        let c = ctx();
        let unit = Unit::new(&c);
        unit.suspend_after(None);
        assert!(!unit.is_running());
    }

    #[test]
    fn test_link_does_not_extend_lifetime() {
        let c = ctx();
        let gate = Unit::new(&c);
        {
            let unit = Unit::new(&c);
            unit.resume_after(Some(&*gate));
            // unit dropped here; only a Weak remains inside the hook
        }
        // Must not panic or resurrect anything.
        gate.complete();
        assert!(!gate.is_active());
    }

    #[test]
    fn test_link_fires_at_most_once() {
        let c = ctx();
        let unit = Unit::new(&c);
        let gate = Unit::new(&c);

        unit.resume_after(Some(&*gate));
        gate.complete();
        assert!(unit.is_running());

        // Re-suspending and completing again must not re-fire the link.
        unit.suspend();
        gate.complete();
        assert!(!unit.is_running(), "one-shot link must not re-fire");
    }
}
