//! # Global runtime configuration.
//!
//! Provides [`Config`], the settings a [`Kernel`](crate::Kernel) is created
//! with, and [`DebugLevel`], the verbosity gate for per-step trace output.
//!
//! ## Field semantics
//! - `debug`: how chatty the runtime is about stepping (`None` = silent)
//! - `propagate_failures`: opt-in upward propagation of contained child
//!   failures (default `false` — failures stop at the owning node)

/// Verbosity gate for step tracing.
///
/// Nodes and units emit `log::trace!` records about their stepping only
/// when the kernel's debug level is high enough. This is orthogonal to the
/// host's `log` filter: both must let the record through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    /// No step tracing.
    #[default]
    None,
    /// Kernel-level tracing only (tick boundaries).
    Low,
    /// Node traversal tracing.
    Medium,
    /// Per-unit step tracing.
    High,
}

/// Global configuration for a kernel instance.
///
/// ## Notes
/// All fields are public for flexibility; `Config::default()` is the
/// recommended starting point.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Step-trace verbosity. Can be changed later via
    /// [`Ctx::set_debug`](crate::Ctx::set_debug).
    pub debug: DebugLevel,

    /// When `true`, a node that contains a child failure (log + complete
    /// itself) *additionally* returns
    /// [`StepError::ChildFailed`](crate::StepError::ChildFailed) to its own
    /// caller, letting the failure climb the tree. The containment side
    /// effects are identical in both modes.
    pub propagate_failures: bool,
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `debug = DebugLevel::None` (silent stepping)
    /// - `propagate_failures = false` (contain at the owning node)
    fn default() -> Self {
        Self {
            debug: DebugLevel::None,
            propagate_failures: false,
        }
    }
}
