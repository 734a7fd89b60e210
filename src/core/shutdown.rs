use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;

/// How long runtime teardown waits for blocking tasks (an open desktop alert).
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Trigger side, held by whoever decides to stop (e.g. the Ctrl-C task).
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

/// Observer side, checked by the engine at each suspension point.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

pub fn shutdown_channel() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, ShutdownSignal { rx })
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        // 沒有接收者時 send 會失敗，忽略即可
        let _ = self.tx.send(true);
    }
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown is triggered. Never resolves if the handle is
    /// dropped without triggering.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Runs `future` on a fresh multi-threaded runtime, then tears the runtime
/// down without waiting more than `grace` for leftover blocking tasks.
pub fn block_on_with_grace<F: Future>(future: F, grace: Duration) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(future);
    runtime.shutdown_timeout(grace);
    Ok(output)
}
