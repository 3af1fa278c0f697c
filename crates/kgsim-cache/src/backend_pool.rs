//! Serialized backend access: crossbeam-channel bounded job queue, one
//! connection per worker thread.
//!
//! Backend connections are only `Send`. Each worker owns one and runs jobs
//! against it one at a time, so a connection is never used concurrently.
//! With one worker this is a single serialized actor. Callers block only for
//! their own job's reply; anything that does not touch the backend (cache
//! hits, scoring) never waits on the pool.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use kgsim_core::config::BackendConfig;
use kgsim_core::errors::{BackendError, BackendResult};
use kgsim_core::traits::IKnowledgeGraph;
use kgsim_core::{EmbeddingKind, EntityId};
use tracing::{debug, warn};

type Job = Box<dyn FnOnce(&dyn IKnowledgeGraph) + Send>;

/// A pool of backend workers that is itself a thread-safe
/// [`IKnowledgeGraph`], usable as a `SharedGraph`.
pub struct BackendPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl BackendPool {
    /// Spawn `config.workers` workers, each with a connection from `connect`
    /// (called with the worker index).
    pub fn new<F>(config: &BackendConfig, mut connect: F) -> BackendResult<Self>
    where
        F: FnMut(usize) -> BackendResult<Box<dyn IKnowledgeGraph>>,
    {
        let worker_count = config.workers.max(1);
        let (sender, receiver) = crossbeam_channel::bounded::<Job>(config.queue_capacity.max(1));
        let mut workers = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let connection = connect(index)?;
            workers.push(spawn_worker(index, connection, receiver.clone())?);
        }
        debug!(workers = worker_count, "backend pool started");
        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// A single-worker pool around one connection.
    pub fn single(connection: Box<dyn IKnowledgeGraph>) -> BackendResult<Self> {
        let mut connection = Some(connection);
        Self::new(&BackendConfig::default(), move |_| {
            connection.take().ok_or_else(|| BackendError::Unavailable {
                reason: "connection already taken".to_string(),
            })
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Run `f` against a worker's connection and wait for its result.
    ///
    /// A panic inside `f` fails this call with `QueryFailed`; the worker and
    /// its connection keep serving later calls.
    pub fn call<T, F>(&self, f: F) -> BackendResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn IKnowledgeGraph) -> BackendResult<T> + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or_else(|| BackendError::WorkerGone {
            reason: "pool is shut down".to_string(),
        })?;
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        let job: Job = Box::new(move |graph| {
            let result = catch_unwind(AssertUnwindSafe(|| f(graph))).unwrap_or_else(|payload| {
                let reason = panic_message(payload.as_ref());
                warn!(%reason, "backend call panicked");
                Err(BackendError::query_failed("backend call", format!("panicked: {reason}")))
            });
            let _ = reply_tx.send(result);
        });
        sender.send(job).map_err(|_| BackendError::WorkerGone {
            reason: "all workers have exited".to_string(),
        })?;
        reply_rx.recv().map_err(|_| BackendError::WorkerGone {
            reason: "worker exited before replying".to_string(),
        })?
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn spawn_worker(
    index: usize,
    connection: Box<dyn IKnowledgeGraph>,
    jobs: Receiver<Job>,
) -> BackendResult<JoinHandle<()>> {
    std::thread::Builder::new()
        .name(format!("kgsim-backend-{index}"))
        .spawn(move || {
            for job in jobs.iter() {
                job(connection.as_ref());
            }
            debug!(worker = index, "backend worker stopped");
        })
        .map_err(|e| BackendError::Unavailable {
            reason: format!("failed to spawn backend worker: {e}"),
        })
}

impl Drop for BackendPool {
    fn drop(&mut self) {
        // Closing the queue ends every worker loop.
        self.sender.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("backend worker panicked");
            }
        }
    }
}

impl IKnowledgeGraph for BackendPool {
    fn label(&self, entity: &str) -> BackendResult<Option<String>> {
        let entity = entity.to_string();
        self.call(move |g| g.label(&entity))
    }

    fn embedding(&self, entity: &str, kind: EmbeddingKind) -> BackendResult<Option<Vec<f32>>> {
        let entity = entity.to_string();
        self.call(move |g| g.embedding(&entity, kind))
    }

    fn embeddings(
        &self,
        entities: &[EntityId],
        kind: EmbeddingKind,
    ) -> BackendResult<Vec<Option<Vec<f32>>>> {
        let entities = entities.to_vec();
        self.call(move |g| g.embeddings(&entities, kind))
    }

    fn class_count(&self, class: &str) -> BackendResult<u64> {
        let class = class.to_string();
        self.call(move |g| g.class_count(&class))
    }

    fn class_counts_compact(&self, entity: &str) -> BackendResult<Option<String>> {
        let entity = entity.to_string();
        self.call(move |g| g.class_counts_compact(&entity))
    }

    fn ancestors(&self, entity: &str) -> BackendResult<HashSet<EntityId>> {
        let entity = entity.to_string();
        self.call(move |g| g.ancestors(&entity))
    }

    fn descendants(&self, entity: &str) -> BackendResult<HashSet<EntityId>> {
        let entity = entity.to_string();
        self.call(move |g| g.descendants(&entity))
    }

    /// One job for the whole resolution, using the connection's own
    /// implementation (native query or local traversal).
    fn most_specific_subsumers(&self, c1: &str, c2: &str) -> BackendResult<HashSet<EntityId>> {
        let (c1, c2) = (c1.to_string(), c2.to_string());
        self.call(move |g| g.most_specific_subsumers(&c1, &c2))
    }
}
