use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::config::{BotConfig, ConsoleConfig};
use crate::executor::ActionExecutor;
use crate::log_buffer::LogBuffer;
use crate::orchestrator::RunOrchestrator;

pub type SharedState = Arc<ConsoleState>;

pub struct ConsoleState {
    pub config: ConsoleConfig,
    /// Persisted bot configuration backing the dashboard form.
    pub settings: RwLock<BotConfig>,
    pub logs: Arc<LogBuffer>,
    pub bot: RunOrchestrator,
    pub shutdown_tx: broadcast::Sender<()>,
}

impl ConsoleState {
    pub fn new(
        config: ConsoleConfig,
        settings: BotConfig,
        executor: Arc<dyn ActionExecutor>,
    ) -> Self {
        let logs = Arc::new(LogBuffer::new());
        let bot = RunOrchestrator::new(logs.clone(), executor);
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            settings: RwLock::new(settings),
            logs,
            bot,
            shutdown_tx,
        }
    }

    pub fn notify_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}
