use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::time::sleep;
use tracing::info;
use uuid::Uuid;

use crate::config::{
    ActionMode, BotConfig, STARTUP_DWELL_BROWSER_MS, STARTUP_DWELL_LOGIN_MS,
    STARTUP_DWELL_NAVIGATE_MS, STARTUP_DWELL_POPUP_MS,
};
use crate::error::ConsoleError;
use crate::executor::{ActionExecutor, ActionOutcome};
use crate::log_buffer::{LogBuffer, LogLevel};

// --- Status types ---

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Starting,
    NavigatingToSite,
    LoggingIn,
    HandlingPopup,
    Processing,
    Stopped,
}

impl RunPhase {
    /// A run is in flight in every phase except the two resting states.
    pub fn is_active(&self) -> bool {
        !matches!(self, RunPhase::Idle | RunPhase::Stopped)
    }
}

/// Immutable snapshot of the run, republished on every change.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunStatus {
    pub phase: RunPhase,
    pub is_running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    pub total_iterations: u32,
    pub completed_iterations: u32,
    pub progress_percent: f64,
    pub like_count: u32,
    pub comment_count: u32,
    pub error_count: u32,
}

impl RunStatus {
    pub fn idle() -> Self {
        RunStatus {
            phase: RunPhase::Idle,
            is_running: false,
            run_id: None,
            start_time: None,
            total_iterations: 0,
            completed_iterations: 0,
            progress_percent: 0.0,
            like_count: 0,
            comment_count: 0,
            error_count: 0,
        }
    }
}

/// Progress is a function of phase and counters, nothing else.
fn derived_progress(phase: RunPhase, completed: u32, total: u32) -> f64 {
    match phase {
        RunPhase::Stopped => 100.0,
        RunPhase::Processing if total > 0 => f64::from(completed) / f64::from(total) * 100.0,
        _ => 0.0,
    }
}

/// Recompute the derived fields and swap the snapshot in. `watch` gives
/// readers the latest value without ever touching the loop's state.
fn publish(status_tx: &watch::Sender<RunStatus>, status: &mut RunStatus) {
    status.is_running = status.phase.is_active();
    status.progress_percent = derived_progress(
        status.phase,
        status.completed_iterations,
        status.total_iterations,
    );
    status_tx.send_replace(status.clone());
}

// --- Orchestrator ---

/// Drives a bot run: the fixed startup phase walk, then the iteration
/// loop, on a background task. Snapshots go out through a watch channel;
/// log entries through the shared buffer. A watch<bool> stop channel is
/// checked at every phase and tick boundary, so cancellation lands within
/// one dwell/interval plus any in-flight action.
pub struct RunOrchestrator {
    logs: Arc<LogBuffer>,
    executor: Arc<dyn ActionExecutor>,
    status_tx: Arc<watch::Sender<RunStatus>>,
    handle: RwLock<RunHandle>,
}

#[derive(Default)]
struct RunHandle {
    stop_tx: Option<watch::Sender<bool>>,
}

const STARTUP_SEQUENCE: &[(RunPhase, &str, u64)] = &[
    (RunPhase::Starting, "Starting browser", STARTUP_DWELL_BROWSER_MS),
    (
        RunPhase::NavigatingToSite,
        "Navigating to site",
        STARTUP_DWELL_NAVIGATE_MS,
    ),
    (RunPhase::LoggingIn, "Logging in", STARTUP_DWELL_LOGIN_MS),
    (
        RunPhase::HandlingPopup,
        "Handling popup",
        STARTUP_DWELL_POPUP_MS,
    ),
];

impl RunOrchestrator {
    pub fn new(logs: Arc<LogBuffer>, executor: Arc<dyn ActionExecutor>) -> Self {
        let (status_tx, _) = watch::channel(RunStatus::idle());
        Self {
            logs,
            executor,
            status_tx: Arc::new(status_tx),
            handle: RwLock::new(RunHandle::default()),
        }
    }

    /// Begin a run. Rejected while another run is active; the guard and
    /// the spawn happen under one lock, so two racing starts cannot both
    /// pass.
    pub async fn start(&self, config: BotConfig) -> Result<RunStatus, ConsoleError> {
        if config.iterations == 0 {
            return Err(ConsoleError::Validation(
                "iterations must be at least 1".to_string(),
            ));
        }

        let mut handle = self.handle.write().await;
        if self.status_tx.borrow().is_running {
            return Err(ConsoleError::AlreadyRunning);
        }

        let (stop_tx, stop_rx) = watch::channel(false);

        let mut status = RunStatus::idle();
        status.phase = RunPhase::Starting;
        status.run_id = Some(Uuid::new_v4());
        status.start_time = Some(Utc::now());
        status.total_iterations = config.iterations;
        publish(&self.status_tx, &mut status);

        let mode_label = match config.mode {
            ActionMode::Like => "like",
            ActionMode::Comment => "comment",
        };
        self.logs
            .append(
                LogLevel::Info,
                "Run started",
                Some(format!(
                    "Running {} iterations in {} mode",
                    config.iterations, mode_label
                )),
            )
            .await;

        let ctx = LoopCtx {
            logs: self.logs.clone(),
            executor: self.executor.clone(),
            status_tx: self.status_tx.clone(),
            config,
            status,
            stop_rx,
        };
        tokio::spawn(run_loop(ctx));
        handle.stop_tx = Some(stop_tx);

        Ok(self.status())
    }

    /// Request cancellation. No-op when nothing is running; the loop does
    /// the terminal bookkeeping once it sees the signal, finishing any
    /// in-flight action first.
    pub async fn stop(&self) {
        if !self.status_tx.borrow().is_running {
            return;
        }
        let handle = self.handle.read().await;
        if let Some(tx) = &handle.stop_tx {
            let _ = tx.send(true);
        }
    }

    /// Clear counters and logs back to the idle state. Only valid between
    /// runs; the log buffer ends up holding exactly the reset entry.
    pub async fn reset(&self) -> Result<RunStatus, ConsoleError> {
        let _handle = self.handle.write().await;
        if self.status_tx.borrow().is_running {
            return Err(ConsoleError::StillRunning);
        }

        self.logs.clear().await;
        let mut status = RunStatus::idle();
        publish(&self.status_tx, &mut status);
        self.logs
            .append(
                LogLevel::Info,
                "Status reset",
                Some("All counters and logs cleared".to_string()),
            )
            .await;

        Ok(self.status())
    }

    /// Latest published snapshot; never blocks on the run loop.
    pub fn status(&self) -> RunStatus {
        self.status_tx.borrow().clone()
    }

    /// Receiver yielding every snapshot published from here on.
    pub fn subscribe(&self) -> watch::Receiver<RunStatus> {
        self.status_tx.subscribe()
    }
}

// --- Core loop ---

struct LoopCtx {
    logs: Arc<LogBuffer>,
    executor: Arc<dyn ActionExecutor>,
    status_tx: Arc<watch::Sender<RunStatus>>,
    config: BotConfig,
    status: RunStatus,
    stop_rx: watch::Receiver<bool>,
}

async fn run_loop(mut ctx: LoopCtx) {
    // Startup sequence: each phase is logged, published, then held for its
    // dwell. A stop during the dwell goes straight to Stopped.
    for (phase, message, dwell_ms) in STARTUP_SEQUENCE {
        ctx.status.phase = *phase;
        ctx.logs.append(LogLevel::Info, *message, None).await;
        publish(&ctx.status_tx, &mut ctx.status);

        tokio::select! {
            _ = sleep(Duration::from_millis(*dwell_ms)) => {}
            _ = ctx.stop_rx.changed() => {
                finish(&mut ctx, "Run stopped", "Cancelled during startup").await;
                return;
            }
        }
    }

    ctx.status.phase = RunPhase::Processing;
    ctx.logs.append(LogLevel::Info, "Processing feed", None).await;
    publish(&ctx.status_tx, &mut ctx.status);

    let interval = Duration::from_millis(ctx.config.interval_ms);
    loop {
        tokio::select! {
            _ = sleep(interval) => {}
            _ = ctx.stop_rx.changed() => {
                finish(&mut ctx, "Run stopped", "Cancelled by request").await;
                return;
            }
        }

        if ctx.status.completed_iterations >= ctx.status.total_iterations {
            finish(&mut ctx, "Run complete", "All iterations processed").await;
            return;
        }

        // The action is awaited to completion even if a stop arrives
        // meanwhile; its outcome is accounted before the signal is seen at
        // the next boundary.
        let outcome = ctx
            .executor
            .perform(ctx.config.mode, &ctx.config.profile)
            .await;

        ctx.status.completed_iterations += 1;
        let n = ctx.status.completed_iterations;
        let total = ctx.status.total_iterations;

        match outcome {
            ActionOutcome::Success => match ctx.config.mode {
                ActionMode::Like => {
                    ctx.status.like_count += 1;
                    ctx.logs
                        .append(
                            LogLevel::Success,
                            format!("Liked post {}/{}", n, total),
                            Some("Post interaction successful".to_string()),
                        )
                        .await;
                }
                ActionMode::Comment => {
                    ctx.status.comment_count += 1;
                    ctx.logs
                        .append(
                            LogLevel::Success,
                            format!("Commented on post {}/{}", n, total),
                            Some("Post interaction successful".to_string()),
                        )
                        .await;
                }
            },
            ActionOutcome::Skipped => {
                ctx.status.error_count += 1;
                ctx.logs
                    .append(
                        LogLevel::Warning,
                        format!("Skipped post {}/{}", n, total),
                        Some("Post already liked or not available".to_string()),
                    )
                    .await;
            }
            ActionOutcome::Failed => {
                ctx.status.error_count += 1;
                ctx.logs
                    .append(
                        LogLevel::Warning,
                        format!("Action failed on post {}/{}", n, total),
                        Some("Executor reported a failure".to_string()),
                    )
                    .await;
            }
        }

        publish(&ctx.status_tx, &mut ctx.status);

        if ctx.status.completed_iterations >= ctx.status.total_iterations {
            finish(&mut ctx, "Run complete", "All iterations processed").await;
            return;
        }
    }
}

/// Terminal bookkeeping, shared by cancellation and natural completion.
async fn finish(ctx: &mut LoopCtx, message: &str, details: &str) {
    ctx.status.phase = RunPhase::Stopped;
    ctx.logs
        .append(LogLevel::Info, message, Some(details.to_string()))
        .await;
    publish(&ctx.status_tx, &mut ctx.status);
    info!(
        "{} after {}/{} iterations",
        message, ctx.status.completed_iterations, ctx.status.total_iterations
    );
}
