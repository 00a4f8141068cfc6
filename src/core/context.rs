//! # Per-kernel shared context.
//!
//! [`Ctx`] is the cheap, cloneable handle every scheduled object is created
//! with. It carries the state a whole tree shares — the tick counter, the
//! cooperative break flag, the logical clock, the id allocator and the
//! runtime knobs from [`Config`] — without any process-wide globals: two
//! kernels own two fully independent contexts and never share mutable
//! state.
//!
//! ## Rules
//! - Objects hold a `Ctx` clone as a *non-owning* handle; the context never
//!   owns scheduled objects (the one exception is the short-lived
//!   system-unit queue drained by the kernel each tick).
//! - The clock is logical: it only moves when the host calls
//!   [`Ctx::advance`] / [`Ctx::set_now`] (usually via
//!   [`Kernel::advance`](crate::Kernel::advance)).
//! - The break flag is scoped to one tick; the kernel clears it at every
//!   tick boundary.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::core::config::{Config, DebugLevel};
use crate::units::Steppable;

/// Cloneable handle to one kernel's shared scheduling state.
///
/// ### Properties
/// - **Cloneable**: cheap to clone (internally holds an `Rc`-backed cell).
/// - **Single-threaded**: deliberately `!Send`/`!Sync`, like the rest of
///   the runtime.
#[derive(Clone)]
pub struct Ctx {
    shared: Rc<Shared>,
}

struct Shared {
    next_id: Cell<u64>,
    step: Cell<u64>,
    brk: Cell<bool>,
    now: Cell<Duration>,
    debug: Cell<DebugLevel>,
    propagate_failures: Cell<bool>,
    /// Units created by the runtime itself (timer overloads etc.) waiting
    /// to be handed to the kernel's hidden system node.
    system: RefCell<Vec<Rc<dyn Steppable>>>,
}

impl Ctx {
    pub(crate) fn new(cfg: &Config) -> Self {
        Self {
            shared: Rc::new(Shared {
                next_id: Cell::new(0),
                step: Cell::new(0),
                brk: Cell::new(false),
                now: Cell::new(Duration::ZERO),
                debug: Cell::new(cfg.debug),
                propagate_failures: Cell::new(cfg.propagate_failures),
                system: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Allocates the next object id. Ids are unique per kernel.
    pub(crate) fn next_id(&self) -> u64 {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        id
    }

    /// The number of the tick currently being executed (0 before the first
    /// tick).
    pub fn step_number(&self) -> u64 {
        self.shared.step.get()
    }

    /// Starts a new tick: bumps the counter and clears the break flag.
    pub(crate) fn begin_tick(&self) {
        self.shared.step.set(self.shared.step.get() + 1);
        self.shared.brk.set(false);
    }

    /// Requests cooperative curtailment of the remainder of the current
    /// tick's traversal. Any nested component may call this; nodes check it
    /// before stepping each child.
    pub fn request_break(&self) {
        self.shared.brk.set(true);
    }

    /// Whether a break was requested during the current tick.
    pub fn break_requested(&self) -> bool {
        self.shared.brk.get()
    }

    /// Current logical time.
    pub fn now(&self) -> Duration {
        self.shared.now.get()
    }

    /// Moves the logical clock forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.shared.now.set(self.shared.now.get() + dt);
    }

    /// Sets the logical clock to an absolute value. Timers hold absolute
    /// deadlines, so rewinding the clock postpones them rather than
    /// re-firing anything.
    pub fn set_now(&self, now: Duration) {
        self.shared.now.set(now);
    }

    /// Current step-trace verbosity.
    pub fn debug(&self) -> DebugLevel {
        self.shared.debug.get()
    }

    /// Changes the step-trace verbosity at runtime.
    pub fn set_debug(&self, level: DebugLevel) {
        self.shared.debug.set(level);
    }

    /// Whether contained child failures are also returned to node callers.
    pub fn propagate_failures(&self) -> bool {
        self.shared.propagate_failures.get()
    }

    /// Queues a runtime-created unit for adoption by the kernel's hidden
    /// system node on the next tick.
    pub(crate) fn defer_system(&self, unit: Rc<dyn Steppable>) {
        self.shared.system.borrow_mut().push(unit);
    }

    pub(crate) fn drain_system(&self) -> Vec<Rc<dyn Steppable>> {
        self.shared.system.borrow_mut().drain(..).collect()
    }

    /// True when both handles refer to the same kernel's context.
    pub fn same_kernel(&self, other: &Ctx) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}
