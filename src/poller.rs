//! Background liveness polling
//!
//! A dedicated thread re-evaluates process liveness on a fixed period and
//! ships a snapshot to the UI thread over a channel, which rebuilds the tray
//! menu from it. Shutdown is an explicit atomic flag set by `shutdown()` and
//! observed within one sleep step, after which the thread is joined.

use crate::supervisor::{ProcessSupervisor, ServiceStatus};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Sleep granularity inside one poll period, so shutdown stays prompt
const SLEEP_STEP: Duration = Duration::from_millis(50);

/// Periodic liveness poller running on its own thread
pub struct StatusPoller {
    event_rx: Receiver<Vec<ServiceStatus>>,
    shutdown: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl StatusPoller {
    /// Start polling the supervisor on the given period
    pub fn start(supervisor: Arc<ProcessSupervisor>, interval: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);

        let thread_handle = thread::spawn(move || {
            poll_loop(supervisor, event_tx, flag, interval);
        });

        Self {
            event_rx,
            shutdown,
            thread_handle: Some(thread_handle),
        }
    }

    /// Try to receive a liveness snapshot (non-blocking)
    pub fn try_recv_status(&self) -> Option<Vec<ServiceStatus>> {
        self.event_rx.try_recv().ok()
    }

    /// Signal the poll loop to stop and wait for it to finish
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn poll_loop(
    supervisor: Arc<ProcessSupervisor>,
    event_tx: Sender<Vec<ServiceStatus>>,
    shutdown: Arc<AtomicBool>,
    interval: Duration,
) {
    info!("Status poller started (period {:?})", interval);

    while !shutdown.load(Ordering::SeqCst) {
        // Detect unexpected exits, then publish the fresh snapshot
        supervisor.reap();
        if event_tx.send(supervisor.statuses()).is_err() {
            // Receiver gone, UI is shutting down
            break;
        }

        let mut slept = Duration::ZERO;
        while slept < interval && !shutdown.load(Ordering::SeqCst) {
            thread::sleep(SLEEP_STEP);
            slept += SLEEP_STEP;
        }
    }

    info!("Status poller stopped");
}
