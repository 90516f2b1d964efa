//! Evaluation limits imposed by the embedding host.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::EvalError;

/// Nesting limit used when the host does not set one. Low enough that a
/// debug build on a 2 MiB thread stack reports `RecursionLimit` before the
/// native stack runs out.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Host-supplied evaluation budget.
///
/// `max_depth` bounds how many applications may be nested at once;
/// `step_limit`, when set, bounds the total number of applications over the
/// lifetime of a scope tree.
///
/// # Examples
///
/// ```rust
/// use sandlisp::runtime::EvalConfig;
/// let config = EvalConfig::from_json(r#"{ "step_limit": 1000 }"#).unwrap();
/// assert_eq!(config.step_limit, Some(1000));
/// assert_eq!(config.max_depth, EvalConfig::default().max_depth);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub max_depth: usize,
    pub step_limit: Option<u64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            step_limit: None,
        }
    }
}

impl EvalConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = Some(step_limit);
        self
    }
}

/// Live counters for one scope tree.
#[derive(Debug)]
pub(crate) struct Budget {
    config: EvalConfig,
    depth: Cell<usize>,
    steps: Cell<u64>,
}

impl Budget {
    pub(crate) fn new(config: EvalConfig) -> Self {
        Self {
            config,
            depth: Cell::new(0),
            steps: Cell::new(0),
        }
    }

    pub(crate) fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Accounts for one application. The returned guard releases the depth
    /// slot when dropped, so errors unwinding through `?` keep counts exact.
    pub(crate) fn enter(&self) -> Result<DepthGuard<'_>, EvalError> {
        let steps = self.steps.get() + 1;
        if let Some(limit) = self.config.step_limit {
            if steps > limit {
                debug!(limit, "step budget exhausted");
                return Err(EvalError::BudgetExceeded { limit });
            }
        }
        self.steps.set(steps);

        let depth = self.depth.get() + 1;
        if depth > self.config.max_depth {
            debug!(limit = self.config.max_depth, "recursion limit reached");
            return Err(EvalError::RecursionLimit {
                limit: self.config.max_depth,
            });
        }
        self.depth.set(depth);
        Ok(DepthGuard { budget: self })
    }

    pub(crate) fn steps(&self) -> u64 {
        self.steps.get()
    }
}

pub(crate) struct DepthGuard<'a> {
    budget: &'a Budget,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        let depth = self.budget.depth.get();
        self.budget.depth.set(depth.saturating_sub(1));
    }
}
