use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use crate::{
    core::validate::ValidationError,
    registry::{Registry, RegistryError},
    voter::{VoterDraft, VoterRecord},
};

use super::events::RegistryEvent;

/// Failure of a runtime call.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The registry rejected or failed the command.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The runtime task is gone.
    #[error("registry runtime has shut down")]
    ChannelClosed,
}

/// Channel sizing for [`spawn_registry`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Pending commands before senders wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before lagging.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable handle to a registry running on its own task.
pub struct RegistryHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<RegistryEvent>,
}

impl Clone for RegistryHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Register {
        draft: VoterDraft,
        resp: oneshot::Sender<Result<VoterRecord, RuntimeError>>,
    },
    Validate {
        draft: VoterDraft,
        resp: oneshot::Sender<Vec<ValidationError>>,
    },
    List {
        resp: oneshot::Sender<Vec<VoterRecord>>,
    },
    Len {
        resp: oneshot::Sender<usize>,
    },
    Export {
        resp: oneshot::Sender<Result<Vec<u8>, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `registry` onto a tokio task; every command runs there in order.
pub fn spawn_registry(registry: Registry, config: RuntimeConfig) -> RegistryHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<RegistryEvent>(config.event_capacity.max(1));

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut registry = registry;

        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut registry, &events_tx_loop) {
                break;
            }
        }
        debug!(total = registry.len(), "registry runtime stopped");
    });

    RegistryHandle { cmd_tx, events_tx }
}

impl RegistryHandle {
    /// Subscribes to registry events.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events_tx.subscribe()
    }

    /// Validates and creates a record.
    pub async fn register(&self, draft: VoterDraft) -> Result<VoterRecord, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Register { draft, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Violations for `draft` against the current store.
    pub async fn validate(&self, draft: VoterDraft) -> Result<Vec<ValidationError>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Validate { draft, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Snapshot of all records in order.
    pub async fn list(&self) -> Result<Vec<VoterRecord>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::List { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Number of registered voters.
    pub async fn len(&self) -> Result<usize, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Len { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Pretty-printed JSON export.
    pub async fn export_snapshot(&self) -> Result<Vec<u8>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Export { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Stops the runtime task after pending commands.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

/// Runs one command; returns true when the loop should stop.
fn handle_command(
    cmd: Command,
    registry: &mut Registry,
    events_tx: &broadcast::Sender<RegistryEvent>,
) -> bool {
    match cmd {
        Command::Register { draft, resp } => {
            let res = registry.register(draft);
            match &res {
                Ok(rec) => {
                    let _ = events_tx.send(RegistryEvent::Registered {
                        voter_id: rec.voter_id.clone(),
                    });
                }
                Err(RegistryError::Validation(errors)) => {
                    let _ = events_tx.send(RegistryEvent::Rejected {
                        errors: errors.len(),
                    });
                }
                Err(RegistryError::Persist(_)) => {}
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::Validate { draft, resp } => {
            let _ = resp.send(registry.validate(&draft));
        }
        Command::List { resp } => {
            let _ = resp.send(registry.list().to_vec());
        }
        Command::Len { resp } => {
            let _ = resp.send(registry.len());
        }
        Command::Export { resp } => {
            let res = registry.export_snapshot();
            if res.is_ok() {
                let _ = events_tx.send(RegistryEvent::Exported {
                    records: registry.len(),
                });
            }
            let _ = resp.send(res.map_err(RuntimeError::from));
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }
    false
}
