//! The narrow contract between the session and a decode/render backend.

use crate::error::BackendError;

use super::messages::BackendSignals;

/// Creates decode handles. Lives on the session thread, so it need not be `Send`.
pub trait Backend {
    type Handle: DecodeHandle;

    /// Bind a new handle to `locator` and begin preparing it without blocking.
    ///
    /// Readiness, completion and failures are reported later through `signals`.
    /// An `Err` here means the handle could not be created at all.
    fn open(&mut self, locator: &str, signals: BackendSignals)
    -> Result<Self::Handle, BackendError>;
}

/// One backend-side decoding instance for exactly one track.
pub trait DecodeHandle {
    fn start(&mut self) -> Result<(), BackendError>;

    fn pause(&mut self) -> Result<(), BackendError>;

    fn seek(&mut self, position_ms: u64) -> Result<(), BackendError>;

    fn position_ms(&self) -> u64;

    /// `None` while the duration is unknown.
    fn duration_ms(&self) -> Option<u64>;

    /// Free backend resources. The handle is never used again afterwards; signals
    /// still in flight for it are dropped by the session.
    fn release(&mut self);
}
