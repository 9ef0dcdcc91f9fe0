//! Debounced, coalescing flush channel for one remote document.
//!
//! A channel is split in two halves. The [`SyncTrigger`] is held by the
//! document and cloned freely; every local mutation calls
//! [`SyncTrigger::mark_dirty`]. The [`SyncWorker`] runs as a task and owns
//! the timer:
//!
//! ```text
//! Idle --mutation--> Armed(deadline) --deadline--> Flushing --ok/err--> Idle
//!                      ^                               |
//!                      +---- mutation during flush ----+
//! ```
//!
//! The deadline is fixed when the channel arms and is not pushed back by
//! later mutations, so a burst of activity produces one write per window.
//! A failed flush is not retried; the next mutation or an explicit
//! [`SyncTrigger::flush_now`] tries again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use deskfs_core::error::AppError;
use deskfs_core::events::{DocumentKind, EventBus, SyncEvent, SyncPhase};
use deskfs_core::result::AppResult;
use deskfs_core::traits::cache::LocalCacheStore;
use deskfs_core::traits::remote::RemoteDirectory;
use deskfs_entity::id::DocumentId;

use super::source::SyncSource;

/// Commands sent from triggers to the worker.
#[derive(Debug)]
enum SyncCommand {
    /// A mutation produced this revision.
    Arm(u64),
    /// Flush immediately and report the outcome.
    FlushNow(oneshot::Sender<AppResult<()>>),
}

/// Mutation counters shared by both halves.
#[derive(Debug, Default)]
struct Revisions {
    /// Bumped by every local mutation.
    current: AtomicU64,
    /// Revision contained in the last successful remote write.
    flushed: AtomicU64,
}

/// Document-side handle of a sync channel.
#[derive(Debug, Clone)]
pub struct SyncTrigger {
    kind: DocumentKind,
    commands: mpsc::UnboundedSender<SyncCommand>,
    revisions: Arc<Revisions>,
    phase: watch::Receiver<SyncPhase>,
}

impl SyncTrigger {
    /// Which document this channel flushes.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Record a local mutation and arm the channel.
    pub fn mark_dirty(&self) {
        let revision = self.revisions.current.fetch_add(1, Ordering::SeqCst) + 1;
        if self.commands.send(SyncCommand::Arm(revision)).is_err() {
            debug!(document = %self.kind, "Sync channel closed, mutation stays local");
        }
    }

    /// Declare the in-memory document equal to the remote one.
    pub fn mark_clean(&self) {
        let current = self.revisions.current.load(Ordering::SeqCst);
        self.revisions.flushed.fetch_max(current, Ordering::SeqCst);
    }

    /// Revision of the latest local mutation.
    ///
    /// Compare two readings to tell whether anything changed in between.
    pub fn revision(&self) -> u64 {
        self.revisions.current.load(Ordering::SeqCst)
    }

    /// Whether there are local mutations not yet written remotely.
    pub fn is_dirty(&self) -> bool {
        self.revisions.current.load(Ordering::SeqCst)
            > self.revisions.flushed.load(Ordering::SeqCst)
    }

    /// Current phase of the channel.
    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    /// Whether a remote write is in flight ("Syncing...").
    pub fn is_syncing(&self) -> bool {
        self.phase() == SyncPhase::Flushing
    }

    /// Watch phase changes.
    pub fn watch_phase(&self) -> watch::Receiver<SyncPhase> {
        self.phase.clone()
    }

    /// Flush now and wait for the remote write to finish.
    ///
    /// Cancels a pending timer. Returns `Ok` without writing when the
    /// document is clean.
    pub async fn flush_now(&self) -> AppResult<()> {
        let (reply, result) = oneshot::channel();
        self.commands
            .send(SyncCommand::FlushNow(reply))
            .map_err(|_| AppError::internal(format!("{} sync channel is closed", self.kind)))?;
        result
            .await
            .map_err(|_| AppError::internal(format!("{} sync channel dropped a flush", self.kind)))?
    }
}

/// A freshly created channel, before its worker is attached to a document.
#[derive(Debug)]
pub struct SyncChannel {
    trigger: SyncTrigger,
    commands: mpsc::UnboundedReceiver<SyncCommand>,
    phase: watch::Sender<SyncPhase>,
    delay: Duration,
    bus: EventBus,
}

impl SyncChannel {
    /// Create a channel that flushes `delay` after the first mutation.
    pub fn new(kind: DocumentKind, delay: Duration, bus: EventBus) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (phase, phase_rx) = watch::channel(SyncPhase::Idle);
        Self {
            trigger: SyncTrigger {
                kind,
                commands: tx,
                revisions: Arc::new(Revisions::default()),
                phase: phase_rx,
            },
            commands: rx,
            phase,
            delay,
            bus,
        }
    }

    /// A trigger for the document to hold.
    pub fn trigger(&self) -> SyncTrigger {
        self.trigger.clone()
    }

    /// Attach the worker to its document and remote target.
    pub fn into_worker<S: SyncSource>(
        self,
        source: Arc<S>,
        remote: Arc<dyn RemoteDirectory>,
        cache: Arc<dyn LocalCacheStore>,
        document_id: DocumentId,
    ) -> SyncWorker<S> {
        SyncWorker {
            kind: self.trigger.kind,
            revisions: self.trigger.revisions,
            commands: self.commands,
            phase: self.phase,
            delay: self.delay,
            bus: self.bus,
            source,
            remote,
            cache,
            document_id,
            deadline: None,
            attempted: 0,
        }
    }
}

/// Task half of a sync channel. Owns the debounce timer and performs the
/// single in-flight flush.
pub struct SyncWorker<S: SyncSource> {
    kind: DocumentKind,
    revisions: Arc<Revisions>,
    commands: mpsc::UnboundedReceiver<SyncCommand>,
    phase: watch::Sender<SyncPhase>,
    delay: Duration,
    bus: EventBus,
    source: Arc<S>,
    remote: Arc<dyn RemoteDirectory>,
    cache: Arc<dyn LocalCacheStore>,
    document_id: DocumentId,
    deadline: Option<Instant>,
    /// Highest revision a flush has already been attempted for.
    attempted: u64,
}

impl<S: SyncSource> SyncWorker<S> {
    /// Run until the cancel signal is received or every trigger is dropped.
    pub async fn run(mut self, mut cancel: watch::Receiver<bool>) {
        info!(
            document = %self.kind,
            document_id = %self.document_id,
            delay_ms = self.delay.as_millis() as u64,
            "Sync channel started"
        );

        loop {
            let deadline = self.deadline;
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!(document = %self.kind, "Sync channel received shutdown signal");
                        break;
                    }
                }
                command = self.commands.recv() => match command {
                    Some(SyncCommand::Arm(revision)) => self.arm(revision),
                    Some(SyncCommand::FlushNow(reply)) => {
                        let result = self.flush().await;
                        let _ = reply.send(result);
                    }
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    let _ = self.flush().await;
                }
            }
        }

        if self.revisions.current.load(Ordering::SeqCst)
            > self.revisions.flushed.load(Ordering::SeqCst)
        {
            warn!(document = %self.kind, "Sync channel stopped with unflushed changes");
        }
    }

    fn arm(&mut self, revision: u64) {
        if revision <= self.attempted
            || revision <= self.revisions.flushed.load(Ordering::SeqCst)
        {
            return;
        }
        if self.deadline.is_none() {
            self.deadline = Some(Instant::now() + self.delay);
            self.set_phase(SyncPhase::Armed);
        }
    }

    async fn flush(&mut self) -> AppResult<()> {
        self.deadline = None;
        let revision = self.revisions.current.load(Ordering::SeqCst);
        if revision <= self.revisions.flushed.load(Ordering::SeqCst) {
            debug!(document = %self.kind, "Nothing to flush");
            self.set_phase(SyncPhase::Idle);
            return Ok(());
        }

        self.attempted = revision;
        self.set_phase(SyncPhase::Flushing);

        let snapshot = self.source.snapshot().await;
        let result = self.write(&snapshot).await;

        match &result {
            Ok(()) => {
                self.revisions.flushed.fetch_max(revision, Ordering::SeqCst);
                if let Err(e) = self
                    .source
                    .write_through(self.cache.as_ref(), &snapshot)
                    .await
                {
                    warn!(document = %self.kind, error = %e, "Failed to write flushed snapshot to cache");
                }
                debug!(document = %self.kind, revision, "Document flushed");
            }
            Err(e) => {
                warn!(document = %self.kind, error = %e, "Document flush failed");
                self.bus.sync(SyncEvent::FlushFailed {
                    document: self.kind,
                    message: e.message.clone(),
                });
            }
        }

        if result.is_ok() && self.revisions.current.load(Ordering::SeqCst) > revision {
            self.deadline = Some(Instant::now() + self.delay);
            self.set_phase(SyncPhase::Armed);
        } else {
            self.set_phase(SyncPhase::Idle);
        }
        result
    }

    async fn write(&self, snapshot: &S::Snapshot) -> AppResult<()> {
        let content = serde_json::to_string(snapshot)?;
        self.remote
            .write_document(&self.document_id, &content)
            .await
    }

    fn set_phase(&self, phase: SyncPhase) {
        if *self.phase.borrow() == phase {
            return;
        }
        self.phase.send_replace(phase);
        debug!(document = %self.kind, phase = ?phase, "Sync phase changed");
        self.bus.sync(SyncEvent::PhaseChanged {
            document: self.kind,
            phase,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::BTreeMap;
    use tokio::sync::RwLock;

    use deskfs_cache::memory::MemoryCacheStore;
    use deskfs_entity::id::ItemId;
    use deskfs_remote::{MemoryRemoteDirectory, RemoteOp};

    #[derive(Default)]
    struct Counter {
        values: RwLock<BTreeMap<String, u32>>,
        trigger: std::sync::OnceLock<SyncTrigger>,
    }

    impl Counter {
        async fn bump(&self, key: &str) {
            *self.values.write().await.entry(key.to_string()).or_insert(0) += 1;
            if let Some(trigger) = self.trigger.get() {
                trigger.mark_dirty();
            }
        }
    }

    #[async_trait]
    impl SyncSource for Counter {
        type Snapshot = BTreeMap<String, u32>;

        fn kind(&self) -> DocumentKind {
            DocumentKind::Comments
        }

        async fn snapshot(&self) -> Self::Snapshot {
            self.values.read().await.clone()
        }

        async fn write_through(
            &self,
            _cache: &dyn LocalCacheStore,
            _snapshot: &Self::Snapshot,
        ) -> AppResult<()> {
            Ok(())
        }
    }

    struct Fixture {
        remote: MemoryRemoteDirectory,
        doc: DocumentId,
        counter: Arc<Counter>,
        trigger: SyncTrigger,
        _cancel: watch::Sender<bool>,
    }

    async fn fixture(delay: Duration) -> Fixture {
        let remote = MemoryRemoteDirectory::new();
        let file = remote
            .upload_file(Bytes::from_static(b"{}"), "doc.json", "application/json", &ItemId::root())
            .await
            .unwrap();
        let doc = DocumentId::from(file.id.as_str());

        let channel = SyncChannel::new(DocumentKind::Comments, delay, EventBus::default());
        let trigger = channel.trigger();
        let counter = Arc::new(Counter::default());
        let _ = counter.trigger.set(trigger.clone());

        let worker = channel.into_worker(
            counter.clone(),
            Arc::new(remote.clone()),
            Arc::new(MemoryCacheStore::default()),
            doc.clone(),
        );
        let (cancel, cancel_rx) = watch::channel(false);
        tokio::spawn(worker.run(cancel_rx));

        Fixture {
            remote,
            doc,
            counter,
            trigger,
            _cancel: cancel,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_into_one_write() {
        let f = fixture(Duration::from_secs(5)).await;
        for key in ["a", "b", "c", "a"] {
            f.counter.bump(key).await;
        }
        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(f.remote.document_writes(&f.doc).await, 0);
        assert_eq!(f.trigger.phase(), SyncPhase::Armed);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(f.remote.document_writes(&f.doc).await, 1);
        let written = f.remote.document_content(&f.doc).await.unwrap();
        assert_eq!(written, r#"{"a":2,"b":1,"c":1}"#);
        assert!(!f.trigger.is_dirty());
        assert_eq!(f.trigger.phase(), SyncPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_is_not_extended_by_later_mutations() {
        let f = fixture(Duration::from_secs(5)).await;
        f.counter.bump("a").await;
        tokio::time::sleep(Duration::from_secs(4)).await;
        f.counter.bump("b").await;
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(f.remote.document_writes(&f.doc).await, 1);
        let written = f.remote.document_content(&f.doc).await.unwrap();
        assert_eq!(written, r#"{"a":1,"b":1}"#);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_flush_is_not_retried() {
        let f = fixture(Duration::from_secs(1)).await;
        f.remote.fail(RemoteOp::WriteDocument).await;
        f.counter.bump("a").await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        f.remote.recover(RemoteOp::WriteDocument).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(f.remote.document_writes(&f.doc).await, 0);
        assert!(f.trigger.is_dirty());
        assert_eq!(f.trigger.phase(), SyncPhase::Idle);

        f.counter.bump("b").await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(f.remote.document_writes(&f.doc).await, 1);
        assert!(!f.trigger.is_dirty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_now_skips_timer() {
        let f = fixture(Duration::from_secs(60)).await;
        f.counter.bump("a").await;
        f.trigger.flush_now().await.unwrap();
        assert_eq!(f.remote.document_writes(&f.doc).await, 1);

        // Clean documents are not rewritten.
        f.trigger.flush_now().await.unwrap();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(f.remote.document_writes(&f.doc).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_now_reports_failure() {
        let f = fixture(Duration::from_secs(60)).await;
        f.remote.fail(RemoteOp::WriteDocument).await;
        f.counter.bump("a").await;
        let err = f.trigger.flush_now().await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mutation_during_flush_arms_new_timer() {
        let f = fixture(Duration::from_secs(1)).await;
        f.remote.set_latency(Duration::from_secs(3)).await;
        f.counter.bump("a").await;

        // Timer fires at 1s, the write is in flight until 4s.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(f.trigger.is_syncing());
        f.counter.bump("b").await;

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(f.remote.document_writes(&f.doc).await, 1);
        assert!(f.trigger.is_dirty());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(f.remote.document_writes(&f.doc).await, 2);
        let written = f.remote.document_content(&f.doc).await.unwrap();
        assert_eq!(written, r#"{"a":1,"b":1}"#);
    }
}
