//! Bring-up controller.
//!
//! Orchestrates the startup sequence: the native-dependency extraction task
//! is launched at construction, the first instance is built eagerly while
//! the splash is visible, and control is handed to that instance only after
//! extraction has completed — native search paths must be valid before any
//! native-dependent application code runs. Failures anywhere in the sequence
//! surface as one human-readable message on the progress UI; the UI stays
//! visible and the process is not exited.

use crate::config::BootstrapConfig;
use crate::error::{Error, Result};
use crate::extract::{NativeExtractor, publish_native_search_path};
use crate::instance::InstanceFactory;
use crate::platform::Platform;
use crate::pool::{InstancePool, WorkerPool};
use crate::splash::ProgressUi;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Controller state, broadcast to observers over a watch channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BringUpState {
    /// Extraction and the first warm-up are in flight.
    Preparing,
    /// The eager instance is pooled; waiting on extraction completion.
    AwaitingFirstInstance,
    /// Hand-off in progress.
    Starting,
    /// The first instance has control.
    Running,
    /// Bring-up failed; the message was reported to the progress UI.
    Failed(String),
}

struct Inner {
    config: BootstrapConfig,
    worker: WorkerPool,
    pool: InstancePool,
    factory: InstanceFactory,
    extraction_done: watch::Receiver<bool>,
    state: watch::Sender<BringUpState>,
    canonical_entry: AtomicBool,
}

/// The bring-up controller.
///
/// Cloning is cheap; clones share one controller.
#[derive(Clone)]
pub struct Bootstrap {
    inner: Arc<Inner>,
}

impl Bootstrap {
    /// Creates a bootstrap with the production dynamic-library factory and
    /// launches the extraction task.
    pub fn new(config: BootstrapConfig) -> Result<Self> {
        let factory = InstanceFactory::new(
            config.code_search_path.clone(),
            config.app_library.clone(),
        );
        Self::with_factory(config, factory)
    }

    /// Creates a bootstrap around a custom factory and launches the
    /// extraction task.
    ///
    /// An unrecognized platform is fatal here, before any background work
    /// starts.
    pub fn with_factory(config: BootstrapConfig, factory: InstanceFactory) -> Result<Self> {
        let platform = Platform::current()?;
        debug!("bring-up on {}", platform);

        let worker = WorkerPool::new();
        let (extract_tx, extraction_done) = watch::channel(false);
        let (state, _) = watch::channel(BringUpState::Preparing);

        let extractor = NativeExtractor::new(config.resource_root.clone());
        // Extraction runs exactly once, submitted before anything else so it
        // is first in the worker's queue.
        worker.submit(async move {
            match extractor.extract() {
                Ok(result) => publish_native_search_path(&result),
                Err(e) => error!("failed to extract native libraries: {}", e),
            }
            // Completion, not per-file success, is what hand-off waits on.
            let _ = extract_tx.send(true);
        })?;

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                worker,
                pool: InstancePool::new(),
                factory,
                extraction_done,
                state,
                canonical_entry: AtomicBool::new(false),
            }),
        })
    }

    /// Marks this bootstrap as created from the canonical process entry
    /// point. [`open_app`](Self::open_app) refuses to run until this has
    /// been called.
    pub fn mark_canonical_entry(&self) {
        self.inner.canonical_entry.store(true, Ordering::Release);
    }

    /// Returns a back-reference handle suitable for passing to application
    /// instances.
    pub fn handle(&self) -> BootstrapHandle {
        BootstrapHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Subscribes to controller state changes.
    pub fn state(&self) -> watch::Receiver<BringUpState> {
        self.inner.state.subscribe()
    }

    /// Waits until the extraction task has completed (successfully or not).
    pub async fn wait_for_extraction(&self) {
        let mut done = self.inner.extraction_done.clone();
        let _ = done.wait_for(|done| *done).await;
    }

    /// Submits a background warm-up for the next instance.
    ///
    /// The job sleeps `delay` first — a deliberate throttle so construction
    /// does not compete with the currently-starting instance for CPU — then
    /// builds an instance and parks it in the pool. Construction failures
    /// are logged here and leave the slot empty.
    pub fn schedule_warmup(&self, delay: Duration) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        let handle = self.handle();
        self.inner.worker.submit(async move {
            tokio::time::sleep(delay).await;
            match inner.factory.make_instance(handle) {
                Ok(instance) => {
                    debug!("warm instance {} ready", instance.id());
                    if inner.pool.put(instance).await.is_err() {
                        warn!("instance pool closed, dropping warm instance");
                    }
                }
                Err(e) => warn!("instance warm-up failed: {}", e),
            }
        })
    }

    /// Dequeues the next ready instance and hands it control.
    ///
    /// Schedules a delayed warm-up for the instance after this one, then
    /// blocks on the pool. Must only ever be reached from the canonical
    /// entry sequence; any other trigger means a duplicate or incorrectly
    /// loaded bootstrap and fails fast.
    pub async fn open_app(&self, args: &[String]) -> Result<()> {
        if !self.inner.canonical_entry.load(Ordering::Acquire) {
            return Err(Error::GuardViolation);
        }
        self.schedule_warmup(self.inner.config.warmup_delay())?;
        self.set_state(BringUpState::Starting);
        let mut instance = self.inner.pool.take_next().await?;
        info!("handing off to instance {}", instance.id());
        self.set_state(BringUpState::Running);
        instance.run(args)
    }

    /// Runs the bring-up sequence behind the given progress UI.
    ///
    /// The eager first instance is built on the worker; once it is pooled,
    /// the completion path runs off the worker (leaving it free for the
    /// scheduled warm-up): wait for extraction, hand off, dismiss the
    /// splash. On failure the splash receives the innermost cause's message
    /// and is left visible.
    pub fn start(&self, splash: Arc<dyn ProgressUi>, args: Vec<String>) -> Result<()> {
        let this = self.clone();
        self.inner.worker.submit(async move {
            match this.inner.factory.make_instance(this.handle()) {
                Ok(instance) => {
                    let id = instance.id();
                    if this.inner.pool.put(instance).await.is_err() {
                        this.fail(splash.as_ref(), "instance pool closed during bring-up");
                        return;
                    }
                    debug!("eager instance {} pooled", id);
                    this.set_state(BringUpState::AwaitingFirstInstance);
                    let completion = this.clone();
                    tokio::spawn(async move {
                        completion.wait_for_extraction().await;
                        match completion.open_app(&args).await {
                            Ok(()) => splash.close(),
                            Err(e) => completion.fail(splash.as_ref(), &e.user_message()),
                        }
                    });
                }
                Err(e) => this.fail(splash.as_ref(), &e.user_message()),
            }
        })
    }

    fn fail(&self, splash: &dyn ProgressUi, message: &str) {
        error!("bring-up failed: {}", message);
        splash.report_error(message);
        self.set_state(BringUpState::Failed(message.to_string()));
    }

    fn set_state(&self, state: BringUpState) {
        self.inner.state.send_replace(state);
    }
}

/// Weak back-reference to the bootstrap, handed to application instances.
///
/// The application uses it to re-enter the hand-off path on restart; it
/// never keeps the bootstrap alive on its own.
#[derive(Clone)]
pub struct BootstrapHandle {
    inner: Weak<Inner>,
}

impl BootstrapHandle {
    /// A handle attached to nothing. Restart requests through it fail with
    /// [`Error::BootstrapGone`]; useful for driving a factory standalone.
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    /// Re-runs the hand-off path with fresh arguments: schedules a warm-up
    /// and takes the next pooled instance. The canonical-entry guard still
    /// applies.
    pub fn request_restart(&self, args: Vec<String>) -> Result<()> {
        let inner = self.inner.upgrade().ok_or(Error::BootstrapGone)?;
        let bootstrap = Bootstrap { inner };
        tokio::spawn(async move {
            if let Err(e) = bootstrap.open_app(&args).await {
                error!("restart failed: {}", e.user_message());
            }
        });
        Ok(())
    }
}

impl std::fmt::Debug for BootstrapHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapHandle")
            .field("attached", &(self.inner.strong_count() > 0))
            .finish()
    }
}
