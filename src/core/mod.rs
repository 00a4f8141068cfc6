//! Kernel core: configuration, the shared per-kernel context and the root
//! tick loop.

mod config;
mod context;
mod kernel;

pub use config::{Config, DebugLevel};
pub use context::Ctx;
pub use kernel::Kernel;
