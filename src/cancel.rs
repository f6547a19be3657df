use std::io;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Creates a linked cancel handle and token. Cloned tokens observe the same flag.
pub fn channel() -> (CancelHandle, Cancellation) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Arc::new(tx) }, Cancellation { rx })
}

#[derive(Clone, Debug)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

#[derive(Clone, Debug)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

impl Cancellation {
    /// A token nobody can cancel.
    pub fn never() -> Self {
        channel().1
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Pends forever if every handle was dropped first.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Cancels `handle` on Ctrl+C, or SIGTERM where the platform has it.
///
/// Handlers are installed before this returns, so a signal that arrives
/// while the caller is still busy (e.g. mid-sample) is queued, not fatal.
pub fn spawn_signal_listener(handle: CancelHandle) -> io::Result<JoinHandle<()>> {
    let mut termination = Termination::register()?;
    Ok(tokio::spawn(async move {
        match termination.recv().await {
            Some(signal) => {
                tracing::info!(signal, "termination requested");
                handle.cancel();
            }
            None => tracing::warn!("termination signal streams closed"),
        }
    }))
}

#[cfg(unix)]
struct Termination {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Termination {
    fn register() -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Termination {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(&mut self) -> Option<&'static str> {
        tokio::select! {
            Some(()) = self.interrupt.recv() => Some("interrupt"),
            Some(()) = self.terminate.recv() => Some("terminate"),
            else => None,
        }
    }
}

#[cfg(windows)]
struct Termination {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(windows)]
impl Termination {
    fn register() -> io::Result<Self> {
        Ok(Termination {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    async fn recv(&mut self) -> Option<&'static str> {
        self.ctrl_c.recv().await.map(|()| "interrupt")
    }
}
