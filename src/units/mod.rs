//! Lifecycle base and the steppable-unit primitives.

mod lifecycle;
mod steppable;
mod unit;

pub use lifecycle::Lifecycle;
pub use steppable::Steppable;
pub use unit::{Act, Nop, Unit};
