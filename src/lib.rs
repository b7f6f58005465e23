//! # warmstart
//!
//! **Pre-warming application bootstrap**
//!
//! Prepares a heavyweight GUI-capable process for fast perceived startup:
//! native dependencies are unpacked in the background, application instances
//! are constructed inside isolated code-loading contexts, and a warm instance
//! is always kept one step ahead of the user.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           warmstart                              │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────────────────────────────────────────┐    │
//! │  │                        Bootstrap                         │    │
//! │  │  start(splash, args) → wait extraction → hand-off → run  │    │
//! │  └───────────┬─────────────────────────────┬────────────────┘    │
//! │              │                             │                     │
//! │  ┌───────────┴───────────┐     ┌───────────┴────────────┐        │
//! │  │    NativeExtractor    │     │  InstancePool (cap 1)  │        │
//! │  │  lib/{pair}/{name} →  │     │  put ⇄ take_next       │        │
//! │  │  temp dir, published  │     └───────────┬────────────┘        │
//! │  └───────────────────────┘                 │                     │
//! │                                ┌───────────┴────────────┐        │
//! │                                │    InstanceFactory     │        │
//! │                                │  IsolatedContext per   │        │
//! │                                │  instance, DylibLoader │        │
//! │                                └────────────────────────┘        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │        WorkerPool: one serialized background task at a time      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Bring-up Sequence
//!
//! 1. [`Bootstrap::new`] launches the extraction task and resolves the
//!    platform; an unrecognized platform aborts here.
//! 2. [`Bootstrap::start`] builds the first instance eagerly on the worker
//!    and pools it, then waits for extraction before handing off — native
//!    search paths are always valid before native-dependent code runs.
//! 3. After each hand-off a delayed warm-up builds the *next* instance; the
//!    capacity-1 pool keeps pre-warming at most one instance ahead.
//! 4. Any bring-up failure is reported to the progress UI as the innermost
//!    cause's message; the UI stays visible and the process keeps running.
//!
//! # Isolation Model
//!
//! Every instance lives in its own [`instance::IsolatedContext`]: application
//! code is loaded fresh per context, sharing only the host process runtime.
//! Instances can therefore be rebuilt on restart, or pre-warmed while another
//! instance runs, without collisions between their code.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warmstart::{Bootstrap, BootstrapConfig, LogSplash};
//!
//! #[tokio::main]
//! async fn main() -> warmstart::Result<()> {
//!     let bootstrap = Bootstrap::new(BootstrapConfig::load()?)?;
//!     bootstrap.mark_canonical_entry();
//!     bootstrap.start(Arc::new(LogSplash), std::env::args().skip(1).collect())?;
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod instance;
pub mod platform;
pub mod pool;
pub mod splash;

// Re-exports
pub use bootstrap::{Bootstrap, BootstrapHandle, BringUpState};
pub use config::BootstrapConfig;
pub use constants::*;
pub use error::{Error, Result};
pub use extract::{ExtractionResult, NativeExtractor, native_search_path, native_temp_cache_disabled};
pub use instance::{
    AppConstructor, AppInstance, ContextHandle, InstanceFactory, InstanceLoader, IsolatedContext,
    PooledInstance,
};
pub use platform::Platform;
pub use pool::{InstancePool, WorkerPool};
pub use splash::{LogSplash, ProgressUi};
