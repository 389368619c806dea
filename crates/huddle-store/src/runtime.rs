//! Single-writer runtime.
//!
//! One dedicated OS thread owns the [`DataOperator`] of a server and
//! executes commands strictly in arrival order, so two batches for the same
//! database never interleave. Async callers talk to it through a cloneable
//! [`OperatorHandle`] over a bounded queue and get their result back on a
//! oneshot channel. Successful commits are announced on a broadcast
//! channel.

use std::collections::BTreeSet;

use huddle_shared::raw::RawBatch;
use huddle_shared::types::Table;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::mutation::PreparedMutation;
use crate::operator::{DataOperator, WriteMode};

const EVENT_CAPACITY: usize = 256;

/// Emitted after a batch has been committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Committed {
        server_url: String,
        /// Tables touched by the batch, sorted.
        tables: Vec<Table>,
    },
}

type Job = Box<dyn FnOnce(&mut DataOperator) + Send>;

enum Command {
    HandleRaw {
        batch: RawBatch,
        resp: oneshot::Sender<Result<Vec<PreparedMutation>>>,
    },
    Commit {
        mutations: Vec<PreparedMutation>,
        resp: oneshot::Sender<Result<()>>,
    },
    Run(Job),
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

#[derive(Clone)]
pub struct OperatorHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<StoreEvent>,
}

/// Move `operator` onto its own writer thread.
pub fn spawn_operator(operator: DataOperator, config: &StoreConfig) -> Result<OperatorHandle> {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<StoreEvent>(EVENT_CAPACITY);
    let events_loop = events_tx.clone();

    let server_url = operator.server_url().to_string();
    std::thread::Builder::new()
        .name("huddle-store-writer".to_string())
        .spawn(move || {
            let mut operator = operator;
            while let Some(cmd) = cmd_rx.blocking_recv() {
                if handle_command(cmd, &mut operator, &events_loop) {
                    break;
                }
            }
            tracing::debug!(server = %operator.server_url(), "store writer stopped");
        })?;

    tracing::info!(server = %server_url, "store writer started");

    Ok(OperatorHandle { cmd_tx, events_tx })
}

impl OperatorHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events_tx.subscribe()
    }

    /// Reconcile and commit one tagged raw batch.
    pub async fn handle_raw(&self, batch: RawBatch) -> Result<Vec<PreparedMutation>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::HandleRaw { batch, resp: tx }).await?;
        rx.await.map_err(|_| StoreError::RuntimeClosed)?
    }

    /// Commit mutations prepared elsewhere in one transaction.
    pub async fn commit(&self, mutations: Vec<PreparedMutation>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Commit { mutations, resp: tx }).await?;
        rx.await.map_err(|_| StoreError::RuntimeClosed)?
    }

    /// Run `f` on the writer thread with exclusive access to the operator.
    ///
    /// Commits made inside `f` are not announced on the event stream.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut DataOperator) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move |operator| {
            let _ = tx.send(f(operator));
        });
        self.send(Command::Run(job)).await?;
        rx.await.map_err(|_| StoreError::RuntimeClosed)?
    }

    /// Stop the writer thread once every queued command has run. The
    /// database is closed when the thread exits.
    pub async fn shutdown(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown { resp: tx }).await?;
        rx.await.map_err(|_| StoreError::RuntimeClosed)
    }

    async fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| StoreError::RuntimeClosed)
    }
}

fn handle_command(
    cmd: Command,
    operator: &mut DataOperator,
    events_tx: &broadcast::Sender<StoreEvent>,
) -> bool {
    match cmd {
        Command::HandleRaw { batch, resp } => {
            let res = operator.handle_raw(batch, WriteMode::Commit);
            if let Ok(mutations) = &res {
                announce(operator, events_tx, mutations);
            }
            let _ = resp.send(res);
        }
        Command::Commit { mutations, resp } => {
            let res = operator.batch_records(&mutations);
            if res.is_ok() {
                announce(operator, events_tx, &mutations);
            }
            let _ = resp.send(res);
        }
        Command::Run(job) => job(operator),
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }
    false
}

fn announce(
    operator: &DataOperator,
    events_tx: &broadcast::Sender<StoreEvent>,
    mutations: &[PreparedMutation],
) {
    if mutations.is_empty() {
        return;
    }
    let tables: BTreeSet<Table> = mutations.iter().map(PreparedMutation::table).collect();
    // no subscribers is fine
    let _ = events_tx.send(StoreEvent::Committed {
        server_url: operator.server_url().to_string(),
        tables: tables.into_iter().collect(),
    });
}
