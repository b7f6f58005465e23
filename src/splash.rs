//! Progress UI contract.
//!
//! The splash widget itself is an external collaborator; the bootstrap only
//! ever calls these two operations. Implementations are responsible for
//! marshaling onto their own UI thread.

use tracing::{error, info};

/// Sink for bring-up progress and failure signals.
pub trait ProgressUi: Send + Sync {
    /// Dismisses the progress UI after a successful hand-off.
    fn close(&self);

    /// Reports a fatal bring-up failure. The UI stays visible afterwards;
    /// the process is not exited on the bootstrap's behalf.
    fn report_error(&self, message: &str);
}

/// Console splash used by the launcher binary: progress goes to the log.
#[derive(Debug, Default)]
pub struct LogSplash;

impl ProgressUi for LogSplash {
    fn close(&self) {
        info!("splash dismissed");
    }

    fn report_error(&self, message: &str) {
        error!("bring-up failed: {}", message);
    }
}
