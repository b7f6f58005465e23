//! Isolated instance construction.
//!
//! Each application instance lives inside its own [`IsolatedContext`]: a
//! fresh code-resolution namespace built from the configured code search
//! path, sharing only the host process's minimal runtime with other
//! instances. Isolation lets an instance be torn down and rebuilt on restart
//! without leaking loaded code across runs, and lets a second instance be
//! pre-warmed while the first is running.
//!
//! The concrete loading mechanism sits behind the [`InstanceLoader`] seam.
//! Production uses [`DylibLoader`] (dynamic library load + entry-symbol
//! lookup); tests inject in-process stubs.

use crate::bootstrap::BootstrapHandle;
use crate::constants::APP_ENTRY_SYMBOL;
use crate::error::{Error, Result};
use libloading::Library;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

// =============================================================================
// Application Entry Contract
// =============================================================================

/// A constructed application instance.
///
/// The sole capability the launcher relies on: the instance can be invoked
/// with the process's startup arguments to begin running.
pub trait AppInstance: Send {
    /// Hands control to the application with the original process arguments.
    fn run(&mut self, args: &[String]) -> Result<()>;
}

/// Constructor signature the application library exports under
/// [`APP_ENTRY_SYMBOL`].
///
/// Receives a back-reference to the bootstrap and a view of the isolated
/// context the instance lives in.
pub type AppConstructor = fn(BootstrapHandle, ContextHandle) -> Result<Box<dyn AppInstance>>;

// =============================================================================
// Isolated Context
// =============================================================================

/// A per-instance code-resolution namespace.
///
/// Owns the library loaded for the instance; exactly one context exists per
/// pooled instance and it is never shared between instances.
pub struct IsolatedContext {
    id: Uuid,
    code_paths: Arc<[PathBuf]>,
    library: Option<Library>,
}

impl IsolatedContext {
    fn new(code_paths: Arc<[PathBuf]>) -> Self {
        Self {
            id: Uuid::now_v7(),
            code_paths,
            library: None,
        }
    }

    /// Unique identity of this context.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The code-path entries this context resolves application code from.
    pub fn code_paths(&self) -> &[PathBuf] {
        &self.code_paths
    }

    /// A cheap view of this context, safe to hand to the application.
    pub fn handle(&self) -> ContextHandle {
        ContextHandle {
            id: self.id,
            code_paths: Arc::clone(&self.code_paths),
        }
    }

    /// Resolves a file name against the code-path entries, first match wins.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        for entry in self.code_paths.iter() {
            if entry.is_dir() {
                let candidate = entry.join(file_name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            } else if entry.file_name().is_some_and(|n| n == file_name) && entry.is_file() {
                return Some(entry.clone());
            }
        }
        None
    }
}

impl std::fmt::Debug for IsolatedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsolatedContext")
            .field("id", &self.id)
            .field("code_paths", &self.code_paths)
            .field("loaded", &self.library.is_some())
            .finish()
    }
}

/// Clonable view of an [`IsolatedContext`] passed to the application
/// constructor. Carries identity and the code-path list, not ownership.
#[derive(Debug, Clone)]
pub struct ContextHandle {
    id: Uuid,
    code_paths: Arc<[PathBuf]>,
}

impl ContextHandle {
    /// Identity of the context this handle views.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The context's code-path entries.
    pub fn code_paths(&self) -> &[PathBuf] {
        &self.code_paths
    }
}

// =============================================================================
// Loader Seam
// =============================================================================

/// Resolves and constructs an application instance inside a context.
///
/// Implementations must load application code fresh per context; they must
/// not hand out an instance whose code is shared with another context.
pub trait InstanceLoader: Send + Sync {
    /// Constructs one application instance inside `ctx`.
    fn load(
        &self,
        ctx: &mut IsolatedContext,
        bootstrap: BootstrapHandle,
    ) -> Result<Box<dyn AppInstance>>;
}

/// Production loader: loads the application dynamic library into the context
/// and calls its exported constructor.
pub struct DylibLoader {
    library_name: String,
}

impl DylibLoader {
    /// Creates a loader for the given library file name (resolved against the
    /// context's code search path).
    pub fn new(library_name: impl Into<String>) -> Self {
        Self {
            library_name: library_name.into(),
        }
    }
}

impl InstanceLoader for DylibLoader {
    fn load(
        &self,
        ctx: &mut IsolatedContext,
        bootstrap: BootstrapHandle,
    ) -> Result<Box<dyn AppInstance>> {
        let path = ctx
            .resolve(&self.library_name)
            .ok_or_else(|| Error::AppLibraryNotFound {
                name: self.library_name.clone(),
                searched: ctx.code_paths().len(),
            })?;
        debug!("loading application library {}", path.display());

        // SAFETY: the application library is part of this installation and
        // exports the documented constructor symbol; loading it executes its
        // initializers, which is the point of the call.
        let library = unsafe { Library::new(&path) }.map_err(|e| Error::AppLibraryLoad {
            path: path.clone(),
            source: e,
        })?;
        let app = {
            // SAFETY: the symbol type is fixed by the application entry
            // contract; launcher and application are built from one tree.
            let constructor: libloading::Symbol<AppConstructor> =
                unsafe { library.get(APP_ENTRY_SYMBOL) }.map_err(|e| Error::AppLibraryLoad {
                    path: path.clone(),
                    source: e,
                })?;
            constructor(bootstrap, ctx.handle())?
        };
        // The context keeps the library mapped for the instance's lifetime.
        ctx.library = Some(library);
        Ok(app)
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Builds one isolated context and one application instance inside it.
pub struct InstanceFactory {
    code_paths: Arc<[PathBuf]>,
    loader: Box<dyn InstanceLoader>,
}

impl InstanceFactory {
    /// Creates a factory using the production [`DylibLoader`].
    pub fn new(code_paths: Vec<PathBuf>, library_name: impl Into<String>) -> Self {
        Self::with_loader(code_paths, Box::new(DylibLoader::new(library_name)))
    }

    /// Creates a factory with a custom loader (used by tests and embedders).
    pub fn with_loader(code_paths: Vec<PathBuf>, loader: Box<dyn InstanceLoader>) -> Self {
        Self {
            code_paths: code_paths.into(),
            loader,
        }
    }

    /// Constructs one instance in a fresh isolated context.
    ///
    /// Construction failures propagate to the caller; only the warm-up
    /// scheduling layer converts them into logged, non-fatal events.
    pub fn make_instance(&self, bootstrap: BootstrapHandle) -> Result<PooledInstance> {
        let mut context = IsolatedContext::new(Arc::clone(&self.code_paths));
        debug!("building instance in context {}", context.id());
        let app = self.loader.load(&mut context, bootstrap)?;
        Ok(PooledInstance {
            id: context.id(),
            app,
            context,
        })
    }
}

// =============================================================================
// Pooled Instance
// =============================================================================

/// A ready-to-run application instance and the context that owns its code.
///
/// Ownership moves from the pool to the controller on dequeue.
pub struct PooledInstance {
    id: Uuid,
    // Field order matters: the app must drop before the library mapped in
    // its context is unloaded.
    app: Box<dyn AppInstance>,
    context: IsolatedContext,
}

impl PooledInstance {
    /// Identity of the instance (same as its context's).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The isolated context this instance lives in.
    pub fn context(&self) -> &IsolatedContext {
        &self.context
    }

    /// Invokes the instance's run entry point with the process arguments.
    pub fn run(&mut self, args: &[String]) -> Result<()> {
        self.app.run(args)
    }
}

impl std::fmt::Debug for PooledInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledInstance")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
