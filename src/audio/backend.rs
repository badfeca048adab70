use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, trace};

use crate::error::BackendError;
use crate::library::is_remote_locator;
use crate::playback::{Backend, BackendSignals, DecodeHandle};

use super::sink::{decode_file, paused_sink};

/// How often a prepared handle checks whether its sink drained.
const DRAIN_POLL: Duration = Duration::from_millis(200);

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Local-file backend on the default output device.
///
/// Each handle gets its own paused `Sink`. Decoding happens on a short-lived
/// prepare thread that reports `Ready` once the source is queued, then watches
/// the sink and reports `Completed` when it runs dry.
pub struct RodioBackend {
    stream: OutputStream,
}

impl RodioBackend {
    pub fn open_default() -> Result<Self, BackendError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| BackendError::Device(e.to_string()))?;
        // rodio prints to stderr when the stream is dropped, which garbles the terminal.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl Backend for RodioBackend {
    type Handle = RodioHandle;

    fn open(
        &mut self,
        locator: &str,
        signals: BackendSignals,
    ) -> Result<Self::Handle, BackendError> {
        if is_remote_locator(locator) {
            return Err(BackendError::Unsupported(format!(
                "remote streams are not supported: {locator}"
            )));
        }

        let handle = RodioHandle {
            sink: Arc::new(paused_sink(self.stream.mixer())),
            released: Arc::new(AtomicBool::new(false)),
            duration_ms: Arc::new(AtomicU64::new(0)),
        };

        let path = PathBuf::from(locator);
        let sink = Arc::clone(&handle.sink);
        let released = Arc::clone(&handle.released);
        let duration_ms = Arc::clone(&handle.duration_ms);
        let generation = signals.generation();

        thread::Builder::new()
            .name(format!("segue-prepare-{generation}"))
            .spawn(move || {
                let (source, total) = match decode_file(&path) {
                    Ok(decoded) => decoded,
                    Err(e) => {
                        signals.error(format!("prepare failed: {e}"));
                        return;
                    }
                };
                if released.load(Ordering::Acquire) {
                    return;
                }

                let total_ms = total.map_or(0, millis);
                duration_ms.store(total_ms, Ordering::Release);
                sink.append(source);
                debug!(generation, total_ms, path = %path.display(), "prepared");
                signals.ready(total_ms);

                while !released.load(Ordering::Acquire) {
                    if sink.empty() {
                        signals.completed();
                        break;
                    }
                    thread::sleep(DRAIN_POLL);
                }
                trace!(generation, "prepare thread exited");
            })?;

        Ok(handle)
    }
}

/// A rodio sink bound to one file.
pub struct RodioHandle {
    sink: Arc<Sink>,
    released: Arc<AtomicBool>,
    duration_ms: Arc<AtomicU64>,
}

impl DecodeHandle for RodioHandle {
    fn start(&mut self) -> Result<(), BackendError> {
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) -> Result<(), BackendError> {
        self.sink.pause();
        Ok(())
    }

    fn seek(&mut self, position_ms: u64) -> Result<(), BackendError> {
        self.sink
            .try_seek(Duration::from_millis(position_ms))
            .map_err(|e| {
                debug!(position_ms, error = %e, "sink refused seek");
                BackendError::Seek(e.to_string())
            })
    }

    fn position_ms(&self) -> u64 {
        millis(self.sink.get_pos())
    }

    fn duration_ms(&self) -> Option<u64> {
        match self.duration_ms.load(Ordering::Acquire) {
            0 => None,
            d => Some(d),
        }
    }

    fn release(&mut self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.sink.stop();
        }
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_truncates_and_saturates() {
        assert_eq!(millis(Duration::from_micros(1_999)), 1);
        assert_eq!(millis(Duration::from_secs(200)), 200_000);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
