use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{trace, warn};

use super::messages::{Generation, SessionMsg};

/// How often a playing session refreshes its position.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

struct Running {
    generation: Generation,
    stop: Sender<()>,
    join: JoinHandle<()>,
}

/// Periodic position tick, active only while a track plays.
///
/// Each tick is posted onto the session channel tagged with the generation of
/// the handle it was started for; the session answers it by querying that
/// handle. At most one tick thread runs at a time.
pub struct ProgressTicker {
    interval: Duration,
    running: Option<Running>,
}

impl Default for ProgressTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTicker {
    pub fn new() -> Self {
        Self {
            interval: TICK_INTERVAL,
            running: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            running: None,
        }
    }

    /// Start ticking for `generation`, cancelling any tick thread already running.
    pub(crate) fn start(&mut self, generation: Generation, tx: Sender<SessionMsg>) {
        self.stop();

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let interval = self.interval;
        let spawned = thread::Builder::new()
            .name("segue-ticker".into())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if tx.send(SessionMsg::Tick { generation }).is_err() {
                                break;
                            }
                        }
                        // Explicit stop or the ticker was dropped.
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                trace!(generation, "ticker exited");
            });

        match spawned {
            Ok(join) => {
                self.running = Some(Running {
                    generation,
                    stop: stop_tx,
                    join,
                })
            }
            Err(e) => warn!(error = %e, "could not start progress ticker"),
        }
    }

    /// Stop ticking. Returns once the tick thread has exited.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.stop.send(());
            if running.join.join().is_err() {
                warn!(generation = running.generation, "ticker thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Generation the running ticker was started for.
    pub fn generation(&self) -> Option<Generation> {
        self.running.as_ref().map(|r| r.generation)
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn next_tick(rx: &mpsc::Receiver<SessionMsg>) -> Option<Generation> {
        match rx.recv_timeout(Duration::from_secs(2)) {
            Ok(SessionMsg::Tick { generation }) => Some(generation),
            _ => None,
        }
    }

    #[test]
    fn default_interval_is_half_a_second() {
        assert_eq!(ProgressTicker::new().interval, Duration::from_millis(500));
    }

    #[test]
    fn ticks_carry_the_generation() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = ProgressTicker::with_interval(Duration::from_millis(5));
        ticker.start(7, tx);

        assert_eq!(next_tick(&rx), Some(7));
        assert_eq!(next_tick(&rx), Some(7));
        assert_eq!(ticker.generation(), Some(7));
    }

    #[test]
    fn restart_replaces_the_running_ticker() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = ProgressTicker::with_interval(Duration::from_millis(5));
        ticker.start(1, tx.clone());
        ticker.start(2, tx);

        // Anything generation 1 queued before the restart is already in the channel.
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut saw_two = false;
        while Instant::now() < deadline {
            match next_tick(&rx) {
                Some(2) => {
                    saw_two = true;
                    break;
                }
                Some(_) => continue,
                None => break,
            }
        }
        assert!(saw_two);
        assert_eq!(ticker.generation(), Some(2));
    }

    #[test]
    fn stop_ends_ticks() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = ProgressTicker::with_interval(Duration::from_millis(5));
        ticker.start(3, tx);
        assert_eq!(next_tick(&rx), Some(3));

        ticker.stop();
        assert!(!ticker.is_running());
        // Drain what was sent before the stop, then nothing more arrives.
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
