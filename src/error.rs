//! Error types used by the tickwork runtime.
//!
//! All fallible operations in the crate return [`StepError`]. The variants
//! split into two families:
//!
//! - **Contract violations** — misuse of the API surface (`NotSet`,
//!   `AlreadySet`, `Reentrant`). These are surfaced to the immediate caller
//!   and indicate a programming error, not a transient condition.
//! - **Step failures** — errors escaping a unit's `step()` (`Failed`,
//!   `ChildFailed`). By default these are contained at the owning node:
//!   logged, and the node completes itself rather than propagating upward.
//!
//! The type provides [`StepError::as_label`] for stable snake_case labels
//! in logs and metrics.

use thiserror::Error;

/// # Errors produced by the tickwork runtime.
///
/// See the module docs for the containment policy applied to the
/// `Failed`/`ChildFailed` family.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StepError {
    /// A promise was read before any value was set.
    #[error("promise read before a value was set")]
    NotSet,

    /// A promise was assigned twice, or assigned after it already completed.
    #[error("promise {promise:?} already settled")]
    AlreadySet {
        /// Label of the offending promise.
        promise: String,
    },

    /// A node's `step()` was invoked, directly or indirectly, from within
    /// its own traversal.
    #[error("node {node:?} stepped re-entrantly during its own traversal")]
    Reentrant {
        /// Label of the offending node.
        node: String,
    },

    /// A child's `step()` returned an error while its owning node was
    /// traversing. Only observed by callers when
    /// `Config::propagate_failures` is enabled; the default policy contains
    /// the failure at the node.
    #[error("child {child:?} of node {node:?} failed: {reason}")]
    ChildFailed {
        /// Label of the owning node.
        node: String,
        /// Label of the failing child.
        child: String,
        /// Rendered error from the child's step.
        reason: String,
    },

    /// A unit's own step logic failed.
    #[error("step failed: {reason}")]
    Failed {
        /// Human-readable failure message.
        reason: String,
    },
}

impl StepError {
    /// Shorthand for building a [`StepError::Failed`] from any message.
    pub fn failed(reason: impl Into<String>) -> Self {
        StepError::Failed {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tickwork::StepError;
    ///
    /// assert_eq!(StepError::NotSet.as_label(), "value_not_set");
    /// assert_eq!(StepError::failed("boom").as_label(), "step_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StepError::NotSet => "value_not_set",
            StepError::AlreadySet { .. } => "value_already_set",
            StepError::Reentrant { .. } => "node_reentrant",
            StepError::ChildFailed { .. } => "child_failed",
            StepError::Failed { .. } => "step_failed",
        }
    }

    /// Indicates whether the error is a misuse of the API rather than a
    /// runtime failure.
    ///
    /// Contract violations are never contained by a node's failure policy;
    /// they always reach the caller that committed them.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            StepError::NotSet | StepError::AlreadySet { .. } | StepError::Reentrant { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let cases = [
            (StepError::NotSet, "value_not_set"),
            (
                StepError::AlreadySet {
                    promise: "p".into(),
                },
                "value_already_set",
            ),
            (StepError::Reentrant { node: "n".into() }, "node_reentrant"),
            (
                StepError::ChildFailed {
                    node: "n".into(),
                    child: "c".into(),
                    reason: "boom".into(),
                },
                "child_failed",
            ),
            (StepError::failed("boom"), "step_failed"),
        ];
        for (err, label) in cases {
            assert_eq!(err.as_label(), label, "label mismatch for {err:?}");
        }
    }

    #[test]
    fn test_contract_violation_split() {
        assert!(StepError::NotSet.is_contract_violation());
        assert!(StepError::Reentrant { node: "n".into() }.is_contract_violation());
        assert!(!StepError::failed("boom").is_contract_violation());
        assert!(!StepError::ChildFailed {
            node: "n".into(),
            child: "c".into(),
            reason: "r".into(),
        }
        .is_contract_violation());
    }

    #[test]
    fn test_display_includes_reason() {
        let err = StepError::ChildFailed {
            node: "root".into(),
            child: "worker".into(),
            reason: "io broke".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("worker"), "missing child in {rendered}");
        assert!(rendered.contains("io broke"), "missing reason in {rendered}");
    }
}
