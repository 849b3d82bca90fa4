use std::{future, pin::Pin, sync::Arc, time::Duration};

use chrono::Utc;
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        watch,
    },
    task::{JoinHandle, JoinSet},
    time::Sleep,
};
use tracing::{debug, info, warn};

use crate::{
    error::{ControllerError, FetchError},
    fetch::WordFetcher,
    history::{WordHistory, DEFAULT_HISTORY_CAPACITY},
    state::{WordSnapshot, WordStatus},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_COMMAND_QUEUE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub poll_interval: Duration,
    pub history_capacity: usize,
    pub polling_enabled: bool,
    pub command_queue: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            polling_enabled: true,
            command_queue: DEFAULT_COMMAND_QUEUE,
        }
    }
}

/// Events a rendering surface raises back into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerCommand {
    RefetchNow,
    TogglePolling,
}

impl ControllerCommand {
    fn name(self) -> &'static str {
        match self {
            ControllerCommand::RefetchNow => "refetch_now",
            ControllerCommand::TogglePolling => "toggle_polling",
        }
    }
}

enum Inbox {
    Command(ControllerCommand),
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
enum FetchTrigger {
    Mount,
    Manual,
    Interval,
}

/// The single automatic-refresh timer. Arming always cancels whatever was
/// pending, so at most one deadline exists.
#[derive(Default)]
struct PollTimer {
    sleep: Option<Pin<Box<Sleep>>>,
}

impl PollTimer {
    fn arm(&mut self, after: Duration) {
        self.cancel();
        self.sleep = Some(Box::pin(tokio::time::sleep(after)));
    }

    fn cancel(&mut self) -> bool {
        self.sleep.take().is_some()
    }

    fn is_armed(&self) -> bool {
        self.sleep.is_some()
    }

    /// Resolves when the armed deadline passes; pends forever while disarmed.
    async fn fired(&mut self) {
        match self.sleep.as_mut() {
            Some(sleep) => {
                sleep.as_mut().await;
                self.sleep = None;
            }
            None => future::pending().await,
        }
    }
}

pub struct ControllerHandle {
    commands: mpsc::Sender<Inbox>,
    snapshots: watch::Receiver<WordSnapshot>,
    task: JoinHandle<()>,
}

impl ControllerHandle {
    pub fn send(&self, command: ControllerCommand) -> Result<(), ControllerError> {
        match self.commands.try_send(Inbox::Command(command)) {
            Ok(()) => {
                debug!(command = command.name(), "queued controller command");
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                warn!(command = command.name(), "controller command queue is full");
                Err(ControllerError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(ControllerError::Disconnected),
        }
    }

    pub fn refetch_now(&self) -> Result<(), ControllerError> {
        self.send(ControllerCommand::RefetchNow)
    }

    pub fn toggle_polling(&self) -> Result<(), ControllerError> {
        self.send(ControllerCommand::TogglePolling)
    }

    pub fn snapshot(&self) -> WordSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WordSnapshot> {
        self.snapshots.clone()
    }

    /// Stops the controller, cancelling the timer and any in-flight fetch.
    pub async fn shutdown(self) -> Result<(), ControllerError> {
        if self.commands.send(Inbox::Shutdown).await.is_err() {
            debug!("controller already stopped before shutdown");
        }
        self.task.await.map_err(|_| ControllerError::Disconnected)
    }
}

/// Owns the displayed word, the history, and the polling flag for one
/// session. Runs as a single task; every state change is published as a
/// [`WordSnapshot`].
pub struct WordDisplayController {
    fetcher: Arc<dyn WordFetcher>,
    config: ControllerConfig,
    status: WordStatus,
    history: WordHistory,
    polling_enabled: bool,
    last_updated_at: Option<chrono::DateTime<Utc>>,
    snapshots: watch::Sender<WordSnapshot>,
}

impl WordDisplayController {
    pub fn spawn(fetcher: Arc<dyn WordFetcher>, config: ControllerConfig) -> ControllerHandle {
        let (commands, inbox) = mpsc::channel(config.command_queue.max(1));
        let (snapshots, snapshot_rx) = watch::channel(WordSnapshot::initial(
            config.polling_enabled,
            config.poll_interval,
        ));

        let controller = Self {
            fetcher,
            config,
            status: WordStatus::Loading,
            history: WordHistory::new(config.history_capacity),
            polling_enabled: config.polling_enabled,
            last_updated_at: None,
            snapshots,
        };
        let task = tokio::spawn(controller.run(inbox));

        ControllerHandle {
            commands,
            snapshots: snapshot_rx,
            task,
        }
    }

    async fn run(mut self, mut inbox: mpsc::Receiver<Inbox>) {
        let mut timer = PollTimer::default();
        let mut fetches: JoinSet<Result<String, FetchError>> = JoinSet::new();

        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            polling_enabled = self.polling_enabled,
            "word display controller started"
        );
        self.start_fetch(&mut fetches, FetchTrigger::Mount);

        loop {
            tokio::select! {
                message = inbox.recv() => match message {
                    Some(Inbox::Command(ControllerCommand::RefetchNow)) => {
                        self.start_fetch(&mut fetches, FetchTrigger::Manual);
                    }
                    Some(Inbox::Command(ControllerCommand::TogglePolling)) => {
                        self.toggle_polling(&mut timer, fetches.len());
                    }
                    Some(Inbox::Shutdown) | None => break,
                },
                Some(joined) = fetches.join_next(), if !fetches.is_empty() => {
                    let result = joined.unwrap_or_else(|e| Err(FetchError::Aborted(e.to_string())));
                    self.settle(result, &mut timer, fetches.len());
                }
                () = timer.fired() => {
                    self.start_fetch(&mut fetches, FetchTrigger::Interval);
                }
            }
        }

        timer.cancel();
        fetches.abort_all();
        info!("word display controller stopped");
    }

    fn start_fetch(
        &mut self,
        fetches: &mut JoinSet<Result<String, FetchError>>,
        trigger: FetchTrigger,
    ) {
        let fetcher = Arc::clone(&self.fetcher);
        fetches.spawn(async move { fetcher.fetch_word().await });
        debug!(?trigger, in_flight = fetches.len(), "word fetch started");
        self.publish(fetches.len());
    }

    fn settle(&mut self, result: Result<String, FetchError>, timer: &mut PollTimer, in_flight: usize) {
        match result {
            Ok(word) => {
                let recorded = self.history.record(&word);
                debug!(%word, recorded, "word fetch succeeded");
                self.status = WordStatus::Success { word };
                self.last_updated_at = Some(Utc::now());
            }
            Err(err) => {
                warn!(error = %err, "word fetch failed");
                self.status = WordStatus::Error {
                    message: err.display_message(),
                };
            }
        }

        if self.polling_enabled {
            timer.arm(self.config.poll_interval);
        }
        self.publish(in_flight);
    }

    fn toggle_polling(&mut self, timer: &mut PollTimer, in_flight: usize) {
        self.polling_enabled = !self.polling_enabled;
        let was_armed = timer.cancel();
        if self.polling_enabled {
            timer.arm(self.config.poll_interval);
        }
        info!(
            polling_enabled = self.polling_enabled,
            was_armed,
            armed = timer.is_armed(),
            "auto-refresh toggled"
        );
        self.publish(in_flight);
    }

    fn publish(&self, in_flight: usize) {
        self.snapshots.send_replace(WordSnapshot {
            status: self.status.clone(),
            is_fetching: in_flight > 0,
            history: self.history.to_vec(),
            polling_enabled: self.polling_enabled,
            poll_interval: self.config.poll_interval,
            last_updated_at: self.last_updated_at,
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
