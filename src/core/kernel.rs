//! # The root of a scheduling tree.
//!
//! [`Kernel`] owns a [`Ctx`] and two top-level nodes:
//!
//! ```text
//! Kernel
//! ├── detail   hidden system node (runtime-created timers)
//! └── root     the host's tree of scheduled objects
//! ```
//!
//! ## Tick protocol
//! One [`Kernel::tick`] is one unit of host time:
//! 1. bump the tick counter, clear the break flag;
//! 2. adopt runtime-created system units into `detail`;
//! 3. step `detail`, then step `root`.
//!
//! The host drives the kernel explicitly — usually via [`Kernel::advance`],
//! which moves the logical clock and then ticks. The kernel never spawns
//! threads and never blocks.

use std::rc::Rc;
use std::time::Duration;

use crate::containers::{Container, Node};
use crate::core::config::{Config, DebugLevel};
use crate::core::context::Ctx;
use crate::error::StepError;
use crate::factory::Factory;
use crate::units::Steppable;

/// Root scheduler: a context plus the top-level node pair.
pub struct Kernel {
    ctx: Ctx,
    root: Rc<Node>,
    detail: Rc<Node>,
}

impl Kernel {
    pub fn new(cfg: Config) -> Self {
        let ctx = Ctx::new(&cfg);
        let root = Node::new(&ctx);
        root.set_name("root");
        let detail = Node::new(&ctx);
        detail.set_name("detail");
        Self { ctx, root, detail }
    }

    /// The kernel's shared context handle.
    pub fn ctx(&self) -> &Ctx {
        &self.ctx
    }

    /// The top-level node hosting the caller's objects.
    pub fn root(&self) -> &Rc<Node> {
        &self.root
    }

    /// A factory building objects on this kernel.
    pub fn factory(&self) -> Factory {
        Factory::new(&self.ctx)
    }

    /// Shorthand for adding to the root node.
    pub fn add(&self, item: Rc<dyn Steppable>) {
        self.root.add(item);
    }

    /// Whether the kernel still has a live tree.
    pub fn is_running(&self) -> bool {
        self.root.is_active()
    }

    /// Executes one tick without moving the clock.
    pub fn tick(&self) -> Result<(), StepError> {
        self.ctx.begin_tick();
        if self.ctx.debug() >= DebugLevel::Low {
            log::trace!(
                "kernel tick {} (t = {:?})",
                self.ctx.step_number(),
                self.ctx.now()
            );
        }

        for unit in self.ctx.drain_system() {
            self.detail.add(unit);
        }
        self.detail.step()?;
        self.root.step()?;
        Ok(())
    }

    /// Moves the logical clock forward by `dt`, then ticks.
    pub fn advance(&self, dt: Duration) -> Result<(), StepError> {
        self.ctx.advance(dt);
        self.tick()
    }

    /// Completes both top-level nodes. Further ticks are no-ops.
    pub fn shutdown(&self) {
        self.root.complete();
        self.detail.complete();
    }
}
