//! Time-driven primitives: deadlines compared against the kernel's logical
//! clock, never decrementing counters.

mod one_shot;
mod periodic;

pub use one_shot::OneShotTimer;
pub use periodic::PeriodicTimer;
