use std::time::Duration;

use tokio::sync::mpsc;

use super::types::Mark;

/// A deferred bot move. The generation identifies the game it was scheduled
/// for; once a new game starts the task no longer matches and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotMoveTask {
    pub generation: u64,
    pub bot_mark: Mark,
    pub delay: Duration,
}

pub trait BotScheduler {
    fn schedule(&mut self, task: BotMoveTask);
}

/// Sleeps on the tokio runtime, then hands the task back over a channel so the
/// owner of the controller fires it. Must be used from within a runtime.
#[derive(Clone)]
pub struct TokioBotScheduler {
    fired_tx: mpsc::UnboundedSender<BotMoveTask>,
}

impl TokioBotScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BotMoveTask>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        (Self { fired_tx }, fired_rx)
    }
}

impl BotScheduler for TokioBotScheduler {
    fn schedule(&mut self, task: BotMoveTask) {
        let fired_tx = self.fired_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(task.delay).await;
            // receiver gone means the host shut down
            let _ = fired_tx.send(task);
        });
    }
}

/// Queues tasks until the caller decides to fire them. Used by callers that
/// drive time themselves.
#[derive(Debug, Default)]
pub struct ManualBotScheduler {
    pending: Vec<BotMoveTask>,
}

impl ManualBotScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_pending(&mut self) -> Vec<BotMoveTask> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl BotScheduler for ManualBotScheduler {
    fn schedule(&mut self, task: BotMoveTask) {
        self.pending.push(task);
    }
}
