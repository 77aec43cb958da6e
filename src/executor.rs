use async_trait::async_trait;
use rand::Rng;

use crate::config::{ActionMode, AutomationProfile, SIMULATED_SUCCESS_RATE};

/// Result of one feed action, as reported by the executor.
///
/// Executor-internal failures surface as `Failed`; nothing is allowed to
/// propagate past this boundary as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Success,
    Skipped,
    Failed,
}

/// The browser-driving capability the run loop invokes once per iteration.
///
/// The console never inspects the profile it forwards here; selectors,
/// credentials, and driver paths mean something only to the executor.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn perform(&self, mode: ActionMode, profile: &AutomationProfile) -> ActionOutcome;
}

/// Stand-in executor for running the console without a browser attached.
///
/// Draws a random number per action: below `success_rate` the action
/// succeeds, otherwise it is skipped (the post was already liked or is
/// not available).
pub struct SimulatedExecutor {
    pub success_rate: f64,
}

impl SimulatedExecutor {
    pub fn new() -> Self {
        Self {
            success_rate: SIMULATED_SUCCESS_RATE,
        }
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionExecutor for SimulatedExecutor {
    async fn perform(&self, _mode: ActionMode, _profile: &AutomationProfile) -> ActionOutcome {
        let draw: f64 = rand::thread_rng().gen();
        if draw < self.success_rate {
            ActionOutcome::Success
        } else {
            ActionOutcome::Skipped
        }
    }
}
