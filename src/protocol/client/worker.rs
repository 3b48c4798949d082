//! Threaded bus client: one worker thread per client, owning the bus, the
//! session and the state machine. The only object shared with the caller is
//! the [`StopSignal`].
use core::fmt::Debug;
use core::future::Future;

use std::string::ToString;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use super::{ClientExit, ClientRunner, StopSignal};
use crate::error::WorkerError;
use crate::infra::board::Board;
use crate::protocol::session::ProtocolSession;
use crate::protocol::state::HealthMonitor;
use crate::protocol::transport::traits::can_bus::CanBus;

const WORKER_THREAD_NAME: &str = "can-worker";

type WorkerResult<E> = Result<ClientExit, WorkerError<E>>;

/// Handle on a running worker.
///
/// Dropping the handle stops and joins the worker as [`stop`](Self::stop) does.
pub struct BusClient<E: Debug + Send + 'static> {
    stop: Arc<StopSignal>,
    worker: Option<JoinHandle<WorkerResult<E>>>,
}

impl<E: Debug + Send + 'static> BusClient<E> {
    /// Start the worker.
    ///
    /// `connect` runs on the worker thread, inside its runtime. When it fails
    /// the error is returned here and no loop is started.
    pub fn spawn<C, F, Fut, B, H>(
        connect: F,
        session: ProtocolSession<B, H>,
    ) -> Result<Self, WorkerError<E>>
    where
        C: CanBus<Error = E> + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<C, E>>,
        B: Board + Send + 'static,
        H: HealthMonitor + Send + 'static,
    {
        let stop = Arc::new(StopSignal::new());
        let worker_stop = stop.clone();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<()>(1);

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || -> WorkerResult<E> {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_io()
                    .build()
                    .map_err(WorkerError::Runtime)?;

                runtime.block_on(async move {
                    let bus = connect().await.map_err(WorkerError::Connect)?;
                    // The caller may already be gone; the loop still honours the signal.
                    let _ = ready_tx.send(());

                    let mut runner = ClientRunner::new(bus, session);
                    let exit = runner.run_until_signalled(&worker_stop).await?;
                    Ok::<_, WorkerError<E>>(exit)
                })
            })
            .map_err(WorkerError::Runtime)?;

        match ready_rx.recv() {
            Ok(()) => Ok(Self {
                stop,
                worker: Some(worker),
            }),
            // The worker ended before the loop started: report why.
            Err(_) => match worker.join() {
                Ok(Err(e)) => Err(e),
                Ok(Ok(_)) | Err(_) => Err(WorkerError::Panicked),
            },
        }
    }

    /// `true` once the loop has ended on its own (disconnect or error).
    pub fn is_finished(&self) -> bool {
        self.worker
            .as_ref()
            .map_or(true, |worker| worker.is_finished())
    }

    /// Signal the worker and wait until it has fully exited.
    pub fn stop(mut self) -> WorkerResult<E> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> WorkerResult<E> {
        self.stop.signal(());
        match self.worker.take() {
            Some(worker) => worker.join().unwrap_or(Err(WorkerError::Panicked)),
            None => Ok(ClientExit::Stopped),
        }
    }
}

impl<E: Debug + Send + 'static> Drop for BusClient<E> {
    fn drop(&mut self) {
        if self.worker.is_some() {
            if let Err(e) = self.shutdown() {
                warn!(
                    "Bus client ended with an error: {:?}",
                    crate::fmt::Debug2Format(&e)
                );
            }
        }
    }
}

#[cfg(feature = "socketcan")]
impl BusClient<crate::platform::socketcan::SocketCanError> {
    /// Open the SocketCAN interface `device` (e.g. `can0`) on the worker and
    /// run `session` on it.
    pub fn start<B, H>(
        device: &str,
        session: ProtocolSession<B, H>,
    ) -> Result<Self, WorkerError<crate::platform::socketcan::SocketCanError>>
    where
        B: Board + Send + 'static,
        H: HealthMonitor + Send + 'static,
    {
        use crate::platform::socketcan::SocketCanBus;

        let device = device.to_string();
        Self::spawn(move || async move { SocketCanBus::open(&device) }, session)
    }
}
