//! # Lifecycle core shared by every schedulable object.
//!
//! [`Lifecycle`] is the one piece of state all primitives embed (behind an
//! `Rc`): identity, optional name, the `active` flag, the `running` flag,
//! the step counter, and the completion/stepped hook lists. There is no
//! specialization hierarchy — timers, promises, channels and containers
//! are all plain structs composed over an `Rc<Lifecycle>`.
//!
//! ## Rules
//! - `active` is `true` from creation until [`Lifecycle::complete`] fires,
//!   then permanently `false`.
//! - Completion hooks fire at most once, on the single transition to
//!   inactive, and are consumed by that firing ([`FnOnce`] boxes drained
//!   from the list). There is nothing to unsubscribe afterwards — a fired
//!   or dropped hook cannot leak a link to another object.
//! - Registering a completion hook on an already-inactive object drops the
//!   hook silently; completion never re-fires. Callers that need the
//!   immediate-effect behavior check `is_active()` first (the linking
//!   helpers in [`Steppable`](crate::Steppable) do exactly that).
//! - `running` is distinct from `active`: an inactive object is never
//!   running, an active one may be running or suspended.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::Ctx;

/// Completion hooks are one-shot by construction.
type CompletionHook = Box<dyn FnOnce()>;

/// Stepped hooks recur; they receive the new step count.
type SteppedHook = Box<dyn Fn(u64)>;

/// Identity, activity and notification state of one schedulable object.
pub struct Lifecycle {
    id: u64,
    ctx: Ctx,
    name: RefCell<Option<Rc<str>>>,
    active: Cell<bool>,
    running: Cell<bool>,
    steps: Cell<u64>,
    on_completed: RefCell<Vec<CompletionHook>>,
    on_stepped: RefCell<Vec<SteppedHook>>,
}

impl Lifecycle {
    /// Creates a fresh lifecycle: active, running, zero steps.
    pub fn new(ctx: &Ctx) -> Rc<Self> {
        Rc::new(Self {
            id: ctx.next_id(),
            ctx: ctx.clone(),
            name: RefCell::new(None),
            active: Cell::new(true),
            running: Cell::new(true),
            steps: Cell::new(0),
            on_completed: RefCell::new(Vec::new()),
            on_stepped: RefCell::new(Vec::new()),
        })
    }

    /// Opaque id, unique within this lifecycle's kernel.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Context handle of the owning kernel.
    pub fn ctx(&self) -> &Ctx {
        &self.ctx
    }

    /// Optional human-readable name.
    pub fn name(&self) -> Option<Rc<str>> {
        self.name.borrow().clone()
    }

    /// Assigns a name (used in logs and error labels).
    pub fn set_name(&self, name: &str) {
        *self.name.borrow_mut() = Some(Rc::from(name));
    }

    /// Name if set, otherwise `#<id>`. Used for logs and error fields.
    pub fn label(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => format!("#{}", self.id),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Number of effective steps taken so far.
    pub fn step_count(&self) -> u64 {
        self.steps.get()
    }

    /// Parks the object: it stays in its container but is skipped by its
    /// parent's traversal until resumed.
    pub fn suspend(&self) {
        self.running.set(false);
    }

    /// Unparks the object. No-op if already running or inactive.
    pub fn resume(&self) {
        if self.running.get() || !self.active.get() {
            return;
        }
        self.running.set(true);
    }

    /// Completes the object: idempotent, fires the completion hooks exactly
    /// once, then leaves the object permanently inactive and suspended.
    pub fn complete(&self) {
        if !self.active.get() {
            return;
        }
        self.active.set(false);
        self.running.set(false);

        // Drain before invoking: a hook may re-enter complete() (no-op by
        // the guard above). when_completed rejects registrations from this
        // point on, so the list stays empty.
        let hooks = self.on_completed.take();
        for hook in hooks {
            hook();
        }
    }

    /// Registers a one-shot completion hook. Dropped silently if the object
    /// is already inactive.
    pub fn when_completed(&self, hook: impl FnOnce() + 'static) {
        if !self.active.get() {
            return;
        }
        self.on_completed.borrow_mut().push(Box::new(hook));
    }

    /// Registers a recurring hook invoked after each effective step with
    /// the new step count.
    pub fn when_stepped(&self, hook: impl Fn(u64) + 'static) {
        self.on_stepped.borrow_mut().push(Box::new(hook));
    }

    /// Records one step: no-op returning `false` when inactive, otherwise
    /// increments the counter, fires the stepped hooks and returns `true`.
    pub fn mark_step(&self) -> bool {
        if !self.active.get() {
            return false;
        }
        let n = self.steps.get() + 1;
        self.steps.set(n);

        if !self.on_stepped.borrow().is_empty() {
            // Take/restore so a hook may register further stepped hooks
            // without hitting an outstanding borrow.
            let hooks = self.on_stepped.take();
            for hook in &hooks {
                hook(n);
            }
            let mut current = self.on_stepped.borrow_mut();
            let added = std::mem::take(&mut *current);
            *current = hooks;
            current.extend(added);
        }
        true
    }
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("id", &self.id)
            .field("name", &self.name.borrow())
            .field("active", &self.active.get())
            .field("running", &self.running.get())
            .field("steps", &self.steps.get())
            .finish()
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
    fn test_completion_fires_exactly_once() {
        let life = Lifecycle::new(&ctx());
        let fired = Rc::new(Cell::new(0));

        let f = fired.clone();
        life.when_completed(move || f.set(f.get() + 1));

        assert!(life.is_active());
        life.complete();
        life.complete();
        life.complete();
        assert_eq!(fired.get(), 1, "completion hook must fire exactly once");
        assert!(!life.is_active());
        assert!(!life.is_running(), "completion must also suspend");
    }

    #[test]
    fn test_hook_on_inactive_object_is_dropped() {
        let life = Lifecycle::new(&ctx());
        life.complete();

        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        life.when_completed(move || f.set(true));
        life.complete();
        assert!(!fired.get(), "late hooks must never fire");
    }

    #[test]
    fn test_reentrant_complete_from_hook_is_noop() {
        let life = Lifecycle::new(&ctx());
        let fired = Rc::new(Cell::new(0));

        let f = fired.clone();
        let weak = Rc::downgrade(&life);
        life.when_completed(move || {
            f.set(f.get() + 1);
            if let Some(l) = weak.upgrade() {
                l.complete();
            }
        });

        life.complete();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_step_noop_when_inactive() {
        let life = Lifecycle::new(&ctx());
        assert!(life.mark_step());
        assert!(life.mark_step());
        assert_eq!(life.step_count(), 2);

        life.complete();
        assert!(!life.mark_step(), "stepping an inactive object is a no-op");
        assert_eq!(life.step_count(), 2);
    }

    #[test]
    fn test_stepped_hook_sees_counter() {
        let life = Lifecycle::new(&ctx());
        let last = Rc::new(Cell::new(0));
        let l = last.clone();
        life.when_stepped(move |n| l.set(n));

        life.mark_step();
        life.mark_step();
        assert_eq!(last.get(), 2);
    }

    #[test]
    fn test_resume_after_complete_is_noop() {
        let life = Lifecycle::new(&ctx());
        life.complete();
        life.resume();
        assert!(!life.is_running(), "inactive objects never run again");
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let c = ctx();
        let a = Lifecycle::new(&c);
        let b = Lifecycle::new(&c);
        b.set_name("worker");
        assert_eq!(a.label(), format!("#{}", a.id()));
        assert_eq!(b.label(), "worker");
    }
}
