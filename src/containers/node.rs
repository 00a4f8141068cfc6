//! # Ordered stepping container.
//!
//! [`Node`] steps its running members in contents order once per tick,
//! under a re-entrancy guard and with per-child failure containment.
//!
//! ## Stepping algorithm
//! ```text
//! step():
//!   pre hook
//!   guard: already mid-traversal?  → Err(Reentrant), children untouched
//!   mark own step
//!   snapshot contents; for each child:
//!     kernel break flag set?       → stop traversal
//!     child inactive?              → remove, skip
//!     child running?               → child.step()
//!       child returned Err?        → log, remember, stop traversal
//!     step-one flag set?           → stop after first child
//!   clear guard
//!   on remembered failure: complete *this node* (containment)
//!   merge pending insertions       (the tick's single merge point)
//!   post hook
//!   Err(ChildFailed) only when Config::propagate_failures is on
//! ```
//!
//! Containment policy: a child failure is isolated to the smallest
//! enclosing node. The node logs it and completes itself; its parent and
//! the kernel keep ticking.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::{Ctx, DebugLevel};
use crate::error::StepError;
use crate::units::{Lifecycle, Steppable};

use super::group::{Container, Group};

type Hook = Box<dyn Fn()>;

/// Ordered, re-entrancy-guarded stepping container.
pub struct Node {
    group: Group,
    stepping: Cell<bool>,
    step_one: Cell<bool>,
    pre: RefCell<Option<Hook>>,
    post: RefCell<Option<Hook>>,
}

impl Node {
    pub fn new(ctx: &Ctx) -> Rc<Self> {
        Rc::new(Self {
            group: Group::new_inner(ctx),
            stepping: Cell::new(false),
            step_one: Cell::new(false),
            pre: RefCell::new(None),
            post: RefCell::new(None),
        })
    }

    /// When set, traversal stops after the first child regardless of how
    /// many members the node holds.
    pub fn set_step_one(&self, step_one: bool) {
        self.step_one.set(step_one);
    }

    /// Installs a hook invoked at the very start of every `step()`.
    pub fn set_pre_hook(&self, hook: impl Fn() + 'static) {
        *self.pre.borrow_mut() = Some(Box::new(hook));
    }

    /// Installs a hook invoked at the very end of every `step()`.
    pub fn set_post_hook(&self, hook: impl Fn() + 'static) {
        *self.post.borrow_mut() = Some(Box::new(hook));
    }

    fn run_hook(&self, slot: &RefCell<Option<Hook>>) {
        // Take the hook out for the call so it may install a replacement
        // into the freed slot; the replacement wins, otherwise restore.
        let taken = slot.borrow_mut().take();
        if let Some(hook) = taken {
            hook();
            let mut current = slot.borrow_mut();
            if current.is_none() {
                *current = Some(hook);
            }
        }
    }

    fn ctx(&self) -> &Ctx {
        self.group.lifecycle_ref().ctx()
    }

    fn traverse(&self) -> Option<StepError> {
        let ctx = self.ctx().clone();
        let trace = ctx.debug() >= DebugLevel::High;

        for child in self.group.snapshot() {
            if ctx.break_requested() {
                break;
            }
            if !child.is_active() {
                self.group.drop_member(&child);
                continue;
            }
            if child.is_running() {
                if trace {
                    log::trace!(
                        "node {}: stepping child {}",
                        self.group.lifecycle_ref().label(),
                        child.lifecycle().label()
                    );
                }
                if let Err(err) = child.step() {
                    let failure = StepError::ChildFailed {
                        node: self.group.lifecycle_ref().label(),
                        child: child.lifecycle().label(),
                        reason: err.to_string(),
                    };
                    log::error!("{failure}; completing this node");
                    return Some(failure);
                }
            }
            if self.step_one.get() {
                break;
            }
        }
        None
    }
}

impl Steppable for Node {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        self.group.lifecycle_ref()
    }

    fn step(&self) -> Result<(), StepError> {
        self.run_hook(&self.pre);

        if self.stepping.get() {
            // Reject before touching any state: the outer traversal's
            // guard and child list stay intact.
            let node = self.group.lifecycle_ref().label();
            log::error!(
                "node {node} is re-entrant; nodes cannot directly or indirectly \
                 invoke their step while stepping"
            );
            return Err(StepError::Reentrant { node });
        }

        if !self.group.lifecycle_ref().mark_step() {
            self.run_hook(&self.post);
            return Ok(());
        }

        if self.ctx().debug() >= DebugLevel::Medium {
            log::trace!("stepping node {}", self.group.lifecycle_ref().label());
        }

        self.stepping.set(true);
        let failure = self.traverse();
        self.stepping.set(false);

        if failure.is_some() {
            // Containment: the failure stops here unless configured to
            // climb the tree.
            self.group.lifecycle_ref().complete();
        }

        self.group.merge();
        self.run_hook(&self.post);

        match failure {
            Some(err) if self.ctx().propagate_failures() => Err(err),
            _ => Ok(()),
        }
    }
}

impl Container for Node {
    fn as_group(&self) -> &Group {
        &self.group
    }
}
