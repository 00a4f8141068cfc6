//! # tickwork
//!
//! **Tickwork** is a cooperative, single-threaded, tick-driven scheduling
//! runtime for Rust.
//!
//! It provides lifecycle objects that are advanced in discrete steps by an
//! explicit host-driven loop: containers that order and gate execution,
//! timers on a logical clock, and value primitives (promises, producers,
//! channels) for moving results between them. The crate is designed as a
//! building block for simulations, game logic and deterministic pipelines.
//!
//! ## Architecture
//! ### Overview
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Kernel (host-driven tick loop)                            │
//! │  - Ctx (ids, tick counter, break flag, logical clock)      │
//! │  - Factory (builds objects bound to this kernel)           │
//! └──────┬──────────────────────────────────┬──────────────────┘
//!        ▼                                  ▼
//! ┌──────────────────┐            ┌──────────────────────────┐
//! │  detail (Node)   │            │  root (Node)             │
//! │  internal timers │            │  the host's tree         │
//! └──────────────────┘            └──────┬───────────────────┘
//!                                        ▼
//!                  ┌─────────────┬───────┴──────┬────────────┐
//!                  ▼             ▼              ▼            ▼
//!              Node/Group     Barrier/      Timers       Promise/
//!              (ordered /     Trigger       (one-shot,   Channel
//!              unordered)     (all-of /     periodic)    (values)
//!                             any-of)
//! ```
//!
//! ### One tick
//! ```text
//! Kernel::tick()
//!   ├─► bump tick counter, clear break flag
//!   ├─► adopt runtime-created timers into detail
//!   ├─► detail.step()
//!   └─► root.step()
//!         │ snapshot contents; for each child:
//!         ├─ break requested?  ─► stop traversal
//!         ├─ child inactive?   ─► remove, skip
//!         ├─ child running?    ─► child.step()
//!         │     └─ Err ─► log, complete this node (containment)
//!         └─ merge pending insertions (the tick's single merge point)
//! ```
//!
//! Mutation is deferred throughout: `add` queues, the merge point applies.
//! An object added during tick *N* is first stepped during tick *N+1*.
//!
//! ## Features
//! | Area           | Description                                                       | Key types / traits                          |
//! |----------------|-------------------------------------------------------------------|---------------------------------------------|
//! | **Lifecycle**  | Steppable objects with suspend/resume and completion hooks.      | [`Steppable`], [`Lifecycle`]                |
//! | **Containers** | Ordered stepping, draining barriers, first-completion triggers.  | [`Node`], [`Group`], [`Barrier`], [`Trigger`] |
//! | **Timers**     | One-shot and periodic deadlines on the logical clock.            | [`OneShotTimer`], [`PeriodicTimer`]         |
//! | **Values**     | Single-assignment promises, producers, forwarding channels.      | [`Promise`], [`Producer`], [`Channel`]      |
//! | **Errors**     | Typed contract violations and step failures.                     | [`StepError`]                               |
//! | **Configuration** | Runtime knobs: trace verbosity, failure propagation.          | [`Config`], [`DebugLevel`]                  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in stdout [`log::Log`] backend
//!   _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickwork::{Config, Kernel, Steppable, StepError};
//!
//! fn main() -> Result<(), StepError> {
//!     let kernel = Kernel::new(Config::default());
//!     let factory = kernel.factory();
//!
//!     // Two actions in strict sequence: `second` sleeps until `first`
//!     // completes.
//!     let first = factory.act(|| {
//!         println!("first");
//!         Ok(())
//!     });
//!     let second = factory.act(|| {
//!         println!("second");
//!         Ok(())
//!     });
//!     second.resume_after(Some(&*first));
//!
//!     kernel.add(first);
//!     kernel.add(second.clone());
//!
//!     // Drive the kernel: 50 ms of logical time per tick.
//!     while second.is_active() && kernel.ctx().step_number() < 100 {
//!         kernel.advance(Duration::from_millis(50))?;
//!     }
//!     Ok(())
//! }
//! ```
mod containers;
mod core;
mod error;
mod factory;
mod timers;
mod units;
mod values;


// ---- Public re-exports ----

pub use containers::{Barrier, Container, Group, Node, TimedBarrier, TimedTrigger, Trigger};
pub use core::{Config, Ctx, DebugLevel, Kernel};
pub use error::StepError;
pub use factory::Factory;
pub use timers::{OneShotTimer, PeriodicTimer};
pub use units::{Act, Lifecycle, Nop, Steppable, Unit};
pub use values::{Channel, Expr, Iterate, Producer, Promise, TimedPromise};

// Optional: expose a simple built-in stdout logger (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub mod logger;
