//! Shutdown Coordination
//!
//! Turns process signals into a single shutdown notification and closes
//! the pipeline queues when it fires, so blocked producers and consumers
//! return `Closed` instead of hanging.

use crate::queue::MultiQueue;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Coordinates graceful shutdown across the pipeline
pub struct ShutdownCoordinator {
    pub shutdown_tx: broadcast::Sender<()>,
    pub shutdown_requested: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(8);
        let shutdown_requested = Arc::new(AtomicBool::new(false));

        let coordinator = Self {
            shutdown_tx,
            shutdown_requested,
        };

        (coordinator, shutdown_rx)
    }

    /// Subscribe to shutdown notifications
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Trigger shutdown
    pub fn trigger_shutdown(&self) {
        // Release pairs with the Acquire load in is_shutdown_requested
        self.shutdown_requested.store(true, Ordering::Release);
        let _ = self.shutdown_tx.send(());
    }

    /// Check if shutdown has been requested
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::Acquire)
    }

    /// Install SIGINT/SIGTERM handlers that trigger this coordinator
    ///
    /// Must be called from within a tokio runtime.
    pub fn install_signal_handlers(&self) {
        setup_signal_handlers(self.shutdown_tx.clone(), self.shutdown_requested.clone());
    }

    /// Close `queue` as soon as shutdown is triggered
    ///
    /// The returned task also finishes if every sender is dropped.
    pub fn close_on_shutdown<T>(&self, queue: Arc<MultiQueue<T>>) -> JoinHandle<()>
    where
        T: Send + 'static,
    {
        let mut shutdown_rx = self.subscribe();
        let requested = self.shutdown_requested.clone();
        tokio::spawn(async move {
            if !requested.load(Ordering::Acquire) {
                let _ = shutdown_rx.recv().await;
            }
            log::info!("shutdown requested, closing queue '{}'", queue.name());
            queue.close();
        })
    }
}

/// Set up signal handlers for graceful shutdown
///
/// The first signal requests shutdown; a second one exits immediately.
fn setup_signal_handlers(shutdown_tx: broadcast::Sender<()>, shutdown_requested: Arc<AtomicBool>) {
    let signal_count = Arc::new(AtomicUsize::new(0));

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        for kind in [SignalKind::terminate(), SignalKind::hangup()] {
            let tx = shutdown_tx.clone();
            let requested = shutdown_requested.clone();
            let sig_ctr = signal_count.clone();

            tokio::spawn(async move {
                if let Ok(mut sig) = signal(kind) {
                    if sig.recv().await.is_some() {
                        on_signal(&sig_ctr, &requested, &tx);
                    }
                }
            });
        }
    }

    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            on_signal(&signal_count, &shutdown_requested, &shutdown_tx);
        }
    });
}

fn on_signal(counter: &AtomicUsize, requested: &AtomicBool, tx: &broadcast::Sender<()>) {
    let prev = counter.fetch_add(1, Ordering::AcqRel);
    requested.store(true, Ordering::Release);
    let _ = tx.send(());
    if prev >= 1 {
        log::warn!("Second shutdown signal received; exiting");
        std::process::exit(130);
    }
    log::info!("Shutdown signal received; draining queues (repeat to force exit)");
}
