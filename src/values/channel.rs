//! # Ordered value-forwarding channel.
//!
//! [`Channel`] forwards the sequence of values yielded by an upstream
//! [`Producer`] in FIFO order. Each step advances the producer and buffers
//! whatever it yielded; once the producer completes, the channel completes
//! too — but only after every buffered value has been received. No value is
//! dropped on shutdown.
//!
//! A channel built without a producer is a plain FIFO fed manually through
//! [`Channel::send`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::core::Ctx;
use crate::error::StepError;
use crate::units::{Lifecycle, Steppable};

use super::source::Producer;

/// Steppable FIFO bound to an optional upstream producer.
pub struct Channel<T: 'static> {
    life: Rc<Lifecycle>,
    producer: Option<Rc<dyn Producer<T>>>,
    queue: RefCell<VecDeque<T>>,
}

impl<T: 'static> Channel<T> {
    /// Channel fed manually via [`Channel::send`].
    pub fn new(ctx: &Ctx) -> Rc<Self> {
        Rc::new(Self {
            life: Lifecycle::new(ctx),
            producer: None,
            queue: RefCell::new(VecDeque::new()),
        })
    }

    /// Channel forwarding the values of `producer`.
    pub fn from_producer(ctx: &Ctx, producer: Rc<dyn Producer<T>>) -> Rc<Self> {
        Rc::new(Self {
            life: Lifecycle::new(ctx),
            producer: Some(producer),
            queue: RefCell::new(VecDeque::new()),
        })
    }

    /// Enqueues a value directly.
    pub fn send(&self, value: T) {
        self.queue.borrow_mut().push_back(value);
    }

    /// Dequeues the oldest forwarded value. Once the producer completed and
    /// the buffer drains, the channel completes.
    pub fn recv(&self) -> Option<T> {
        let value = self.queue.borrow_mut().pop_front();
        self.complete_if_drained();
        value
    }

    /// Number of buffered values.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    fn producer_done(&self) -> bool {
        match &self.producer {
            Some(p) => !p.is_active(),
            None => false,
        }
    }

    fn complete_if_drained(&self) {
        if self.producer_done() && self.queue.borrow().is_empty() {
            self.life.complete();
        }
    }
}

impl<T: 'static> Steppable for Channel<T> {
    fn lifecycle(&self) -> &Rc<Lifecycle> {
        &self.life
    }

    fn step(&self) -> Result<(), StepError> {
        if !self.life.mark_step() {
            return Ok(());
        }
        if let Some(producer) = &self.producer {
            if producer.is_active() {
                producer.step()?;
                if let Some(value) = producer.take_value() {
                    self.queue.borrow_mut().push_back(value);
                }
            }
            self.complete_if_drained();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::values::source::Iterate;

    fn ctx() -> Ctx {
        Ctx::new(&Config::default())
    }

    #[test]
    fn test_forwards_in_fifo_order() {
        let c = ctx();
        let producer: Rc<dyn Producer<i32>> = Iterate::new(&c, vec![1, 2, 3]);
        let chan = Channel::from_producer(&c, producer);

        for _ in 0..3 {
            chan.step().unwrap();
        }
        assert_eq!(chan.recv(), Some(1));
        assert_eq!(chan.recv(), Some(2));
        assert_eq!(chan.recv(), Some(3));
    }

    #[test]
    fn test_no_values_dropped_on_producer_shutdown() {
        let c = ctx();
        let producer: Rc<dyn Producer<i32>> = Iterate::new(&c, vec![7, 8]);
        let chan = Channel::from_producer(&c, producer);

        // Step past producer exhaustion without consuming anything.
        for _ in 0..5 {
            chan.step().unwrap();
        }
        assert!(
            chan.is_active(),
            "channel must stay open while values are buffered"
        );

        assert_eq!(chan.recv(), Some(7));
        assert!(chan.is_active());
        assert_eq!(chan.recv(), Some(8));
        assert!(!chan.is_active(), "drained channel completes");
        assert_eq!(chan.recv(), None);
    }

    #[test]
    fn test_completes_immediately_when_producer_done_and_empty() {
        let c = ctx();
        let producer: Rc<dyn Producer<u32>> = Iterate::new(&c, Vec::<u32>::new());
        let chan = Channel::from_producer(&c, producer);

        chan.step().unwrap(); // producer exhausts
        chan.step().unwrap();
        assert!(!chan.is_active());
    }

    #[test]
    fn test_manual_channel_never_self_completes() {
        let chan: Rc<Channel<u32>> = Channel::new(&ctx());
        chan.send(5);
        chan.step().unwrap();
        assert_eq!(chan.recv(), Some(5));
        assert_eq!(chan.recv(), None);
        assert!(chan.is_active(), "producer-less channels live until disposed");
    }
}
