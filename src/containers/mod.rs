//! Container hierarchy: unordered group, ordered stepping node, draining
//! barrier, first-completion trigger.

mod barrier;
mod group;
mod node;
mod trigger;

pub use barrier::{Barrier, TimedBarrier};
pub use group::{Container, Group};
pub use node::Node;
pub use trigger::{TimedTrigger, Trigger};
