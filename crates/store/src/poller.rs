//! Background polling
//!
//! The [`Poller`] owns one thread that runs [`Ingestor::sync`] immediately
//! and then once per interval. A forced reload can be requested at any time
//! and runs on the same thread, so syncs never overlap. Sync errors are
//! logged and the loop keeps going.
//!
//! Dropping the poller stops the thread and waits for it to exit.

use crate::ingest::Ingestor;
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

enum Signal {
    ForceReload,
    Shutdown,
}

/// Handle to a running background sync thread
pub struct Poller {
    tx: Sender<Signal>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl Poller {
    /// Spawn the polling thread
    ///
    /// Fails only if the OS refuses to create the thread.
    pub fn spawn(ingestor: Ingestor, interval: Duration) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("timeline-poller".to_string())
            .spawn(move || {
                info!("Poller started (interval {:?})", interval);
                run_sync(&ingestor, false);

                let mut next = Instant::now() + interval;
                loop {
                    let wait = next.saturating_duration_since(Instant::now());
                    match rx.recv_timeout(wait) {
                        Ok(Signal::ForceReload) => {
                            debug!("Forced reload requested");
                            run_sync(&ingestor, true);
                        }
                        Err(RecvTimeoutError::Timeout) => {
                            run_sync(&ingestor, false);
                            next = Instant::now() + interval;
                        }
                        Ok(Signal::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("Poller stopped");
            })?;

        Ok(Poller {
            tx,
            handle: Some(handle),
            interval,
        })
    }

    /// Polling interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ask the thread to re-fetch the whole timeline
    ///
    /// Returns `false` if the thread is no longer running.
    pub fn force_reload(&self) -> bool {
        self.tx.send(Signal::ForceReload).is_ok()
    }

    /// Stop the thread and wait for it to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.tx.send(Signal::Shutdown);
            if handle.join().is_err() {
                warn!("Poller thread panicked");
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("interval", &self.interval)
            .field("running", &self.handle.is_some())
            .finish()
    }
}

fn run_sync(ingestor: &Ingestor, force: bool) {
    if let Err(e) = ingestor.sync(force) {
        warn!("Sync failed: {}", e);
    }
}
