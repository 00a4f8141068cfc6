//! Value-bearing primitives: single-assignment promises, producer units and
//! ordered forwarding channels.

mod channel;
mod promise;
pub(crate) mod source;

pub use channel::Channel;
pub use promise::{Promise, TimedPromise};
pub use source::{Expr, Iterate, Producer};
