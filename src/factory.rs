//! # Object factory.
//!
//! [`Factory`] is a cloneable handle that builds every kind of scheduled
//! object on one kernel. It exists for convenience and for uniformity: code
//! that receives a factory can create objects without knowing which kernel
//! it is working for, and everything it builds shares that kernel's id
//! space, clock and configuration.
//!
//! Objects come out of the factory created, not scheduled: hand them to a
//! container (usually via [`Kernel::add`](crate::Kernel::add)) to have them
//! stepped.

use std::rc::Rc;
use std::time::Duration;

use crate::containers::{Barrier, Container, Group, Node, TimedBarrier, TimedTrigger, Trigger};
use crate::core::Ctx;
use crate::error::StepError;
use crate::timers::{OneShotTimer, PeriodicTimer};
use crate::units::{Act, Nop, Steppable, Unit};
use crate::values::{Channel, Expr, Iterate, Producer, Promise, TimedPromise};

/// Builds scheduled objects bound to one kernel.
#[derive(Clone)]
pub struct Factory {
    ctx: Ctx,
}

impl Factory {
    pub(crate) fn new(ctx: &Ctx) -> Self {
        Self { ctx: ctx.clone() }
    }

    /// The kernel context everything built here is bound to.
    pub fn ctx(&self) -> &Ctx {
        &self.ctx
    }

    pub fn unit(&self) -> Rc<Unit> {
        Unit::new(&self.ctx)
    }

    /// Unit that completes on its first step.
    pub fn nop(&self) -> Rc<Nop> {
        Nop::new(&self.ctx)
    }

    /// Unit running `action` once, then completing.
    pub fn act(&self, action: impl FnOnce() -> Result<(), StepError> + 'static) -> Rc<Act> {
        Act::new(&self.ctx, action)
    }

    pub fn group(&self) -> Rc<Group> {
        Group::new(&self.ctx)
    }

    pub fn node(&self) -> Rc<Node> {
        Node::new(&self.ctx)
    }

    /// Node pre-populated with `members` (still subject to deferred
    /// insertion: they appear at the node's first merge point).
    pub fn node_with(&self, members: impl IntoIterator<Item = Rc<dyn Steppable>>) -> Rc<Node> {
        let node = Node::new(&self.ctx);
        node.add_all(members);
        node
    }

    pub fn barrier(&self) -> Rc<Barrier> {
        Barrier::new(&self.ctx)
    }

    /// Barrier pre-populated with `members`.
    pub fn barrier_over(
        &self,
        members: impl IntoIterator<Item = Rc<dyn Steppable>>,
    ) -> Rc<Barrier> {
        let barrier = Barrier::new(&self.ctx);
        barrier.add_all(members);
        barrier
    }

    pub fn timed_barrier(&self, span: Duration) -> Rc<TimedBarrier> {
        TimedBarrier::new(&self.ctx, span)
    }

    pub fn trigger(&self) -> Rc<Trigger> {
        Trigger::new(&self.ctx)
    }

    /// Trigger pre-populated with `members`.
    pub fn trigger_over(
        &self,
        members: impl IntoIterator<Item = Rc<dyn Steppable>>,
    ) -> Rc<Trigger> {
        let trigger = Trigger::new(&self.ctx);
        trigger.add_all(members);
        trigger
    }

    pub fn timed_trigger(&self, span: Duration) -> Rc<TimedTrigger> {
        TimedTrigger::new(&self.ctx, span)
    }

    pub fn one_shot_timer(&self, span: Duration) -> Rc<OneShotTimer> {
        OneShotTimer::new(&self.ctx, span)
    }

    pub fn periodic_timer(&self, interval: Duration) -> Rc<PeriodicTimer> {
        PeriodicTimer::new(&self.ctx, interval)
    }

    pub fn promise<T>(&self) -> Rc<Promise<T>> {
        Promise::new(&self.ctx)
    }

    pub fn timed_promise<T>(&self, span: Duration) -> Rc<TimedPromise<T>> {
        TimedPromise::new(&self.ctx, span)
    }

    /// Manually fed channel.
    pub fn channel<T: 'static>(&self) -> Rc<Channel<T>> {
        Channel::new(&self.ctx)
    }

    /// Channel forwarding the values of `producer`.
    pub fn channel_from<T: 'static>(&self, producer: Rc<dyn Producer<T>>) -> Rc<Channel<T>> {
        Channel::from_producer(&self.ctx, producer)
    }

    /// Producer evaluating `eval` each step.
    pub fn expr<T: 'static>(&self, eval: impl FnMut() -> T + 'static) -> Rc<Expr<T>> {
        Expr::new(&self.ctx, eval)
    }

    /// Producer draining `items` one per step.
    pub fn iterate<T, I>(&self, items: I) -> Rc<Iterate<T>>
    where
        T: 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Iterate::new(&self.ctx, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, Kernel};

    #[test]
    fn test_factory_objects_share_the_kernel() {
        let kernel = Kernel::new(Config::default());
        let factory = kernel.factory();
        let unit = factory.unit();
        assert!(unit.lifecycle().ctx().same_kernel(kernel.ctx()));
    }

    #[test]
    fn test_prepopulated_node_steps_members() {
        let kernel = Kernel::new(Config::default());
        let factory = kernel.factory();
        let unit = factory.unit();
        let node = factory.node_with([unit.clone() as Rc<dyn Steppable>]);
        kernel.add(node);

        kernel.tick().unwrap(); // node merges into root
        kernel.tick().unwrap(); // unit merges into node
        kernel.tick().unwrap();
        assert_eq!(unit.step_count(), 1);
    }

    #[test]
    fn test_channel_from_expr() {
        let kernel = Kernel::new(Config::default());
        let factory = kernel.factory();
        let producer: Rc<dyn Producer<u32>> = factory.expr(|| 1u32);
        let chan = factory.channel_from(producer);
        chan.step().unwrap();
        assert_eq!(chan.recv(), Some(1));
    }
}
