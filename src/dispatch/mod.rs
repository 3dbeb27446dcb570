//! Fill dispatch: inline or on a background worker.
//!
//! [`FillDispatcher`] runs fills off the calling thread when it can and on
//! it when it cannot. Callers always get a future; whether it was resolved
//! before `submit` returned is an implementation detail.
//!
//! # Architecture
//!
//! ```text
//! submit ──► FillDispatcher ──► WorkerRequest ──► worker thread
//!               │    ▲                                  │
//!               │    └──── pending table ◄── listener ◄─┘ WorkerResponse
//!               └──► inline flood_fill (no channel / send failed)
//! ```
//!
//! The channel is created lazily on the first submission. Once it fails,
//! by refusing to start or by reporting an error, the dispatcher fills
//! inline for the rest of its life.

pub mod config;
pub mod messages;
pub mod worker;

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::DispatchError;
use crate::selection::magic_wand::{flood_fill, validate};
use crate::selection::source::{check_channels, PixelSource};
use crate::selection::types::{FillParams, FillResult};

pub use config::DispatchConfig;
pub use messages::{FillJob, WorkerRequest, WorkerResponse};
pub use worker::{run_worker, run_worker_with, JobRunner, ThreadSpawner, WorkerEndpoint, WorkerSpawner};

/// Future returned by [`FillDispatcher::submit`].
pub type FillFuture = BoxFuture<'static, Result<FillResult, DispatchError>>;

type Completion = oneshot::Sender<Result<FillResult, DispatchError>>;

/// Lifecycle of the background channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No channel exists; one is created on the next submission.
    Idle,
    /// A worker is running and accepting jobs.
    Ready,
    /// The channel failed. Terminal: all fills run inline.
    Failed,
}

struct Channel {
    generation: u64,
    requests: UnboundedSender<WorkerRequest>,
}

struct Shared {
    state: ChannelState,
    channel: Option<Channel>,
    pending: HashMap<u64, Completion>,
    next_id: u64,
    generation: u64,
}

impl Shared {
    fn reject_all(&mut self, error: DispatchError) {
        for (_, completion) in self.pending.drain() {
            let _ = completion.send(Err(error.clone()));
        }
    }
}

enum Dispatched {
    Ready(Result<FillResult, DispatchError>),
    Pending(oneshot::Receiver<Result<FillResult, DispatchError>>),
}

/// Runs fill jobs on a background worker, falling back to the caller's
/// thread whenever the worker is unavailable.
///
/// Callers' buffers are only read. Jobs sent to the worker carry their own
/// copies.
pub struct FillDispatcher {
    config: DispatchConfig,
    spawner: Box<dyn WorkerSpawner>,
    shared: Arc<Mutex<Shared>>,
}

impl FillDispatcher {
    /// Dispatcher whose workers are OS threads.
    pub fn new(config: DispatchConfig) -> Self {
        let spawner = ThreadSpawner::from_config(&config);
        Self::with_spawner(config, spawner)
    }

    /// Dispatcher that never starts a worker.
    pub fn inline() -> Self {
        Self::new(DispatchConfig::inline())
    }

    /// Dispatcher with a custom execution context for its worker.
    pub fn with_spawner(config: DispatchConfig, spawner: impl WorkerSpawner + 'static) -> Self {
        Self {
            config,
            spawner: Box::new(spawner),
            shared: Arc::new(Mutex::new(Shared {
                state: ChannelState::Idle,
                channel: None,
                pending: HashMap::new(),
                next_id: 1,
                generation: 0,
            })),
        }
    }

    /// Fill synchronously on the calling thread.
    pub fn fill(
        &self,
        pixels: &[u8],
        constraint: Option<&[u8]>,
        params: &FillParams,
    ) -> Result<FillResult, DispatchError> {
        Ok(flood_fill(pixels, constraint, params)?)
    }

    /// Submit a fill job.
    ///
    /// Invalid input resolves to [`DispatchError::Fill`] without touching the
    /// worker. The returned future borrows nothing from the caller.
    /// Concurrent submissions may complete in any order.
    pub fn submit(&self, pixels: &[u8], constraint: Option<&[u8]>, params: FillParams) -> FillFuture {
        let dispatched = self.dispatch(pixels, constraint, params);
        async move {
            match dispatched {
                Dispatched::Ready(result) => result,
                Dispatched::Pending(reply) => reply.await.unwrap_or(Err(DispatchError::Abandoned)),
            }
        }
        .boxed()
    }

    /// Submit a fill sampled from `source`; its dimensions override `params`.
    pub fn submit_source(
        &self,
        source: &dyn PixelSource,
        constraint: Option<&[u8]>,
        params: FillParams,
    ) -> FillFuture {
        if let Err(err) = check_channels(source) {
            return future::ready(Err(err.into())).boxed();
        }
        let (width, height) = source.dimensions();
        let pixels = source.read_all();
        self.submit(&pixels, constraint, FillParams { width, height, ..params })
    }

    /// Whether the background worker is currently usable.
    ///
    /// Diagnostic only; the answer can change before the next submission.
    pub fn is_background_available(&self) -> bool {
        self.shared.lock().state == ChannelState::Ready
    }

    pub fn state(&self) -> ChannelState {
        self.shared.lock().state
    }

    /// Number of jobs awaiting a worker reply.
    pub fn pending_count(&self) -> usize {
        self.shared.lock().pending.len()
    }

    /// Close the worker channel and reject every pending job.
    ///
    /// Safe to call repeatedly or when no channel was ever opened. A failed
    /// dispatcher stays failed; otherwise the next submission may start a
    /// fresh worker.
    pub fn teardown(&self) {
        let mut shared = self.shared.lock();
        if shared.channel.take().is_some() {
            info!(pending = shared.pending.len(), "closing background fill channel");
        }
        if shared.state == ChannelState::Ready {
            shared.state = ChannelState::Idle;
        }
        shared.reject_all(DispatchError::TornDown);
    }

    fn dispatch(&self, pixels: &[u8], constraint: Option<&[u8]>, params: FillParams) -> Dispatched {
        if let Err(err) = validate(pixels, constraint, &params) {
            return Dispatched::Ready(Err(err.into()));
        }

        let mut shared = self.shared.lock();
        if shared.state == ChannelState::Idle && self.config.background {
            self.open_channel(&mut shared);
        }

        if shared.state == ChannelState::Ready {
            let id = shared.next_id;
            shared.next_id += 1;

            let (completion, reply) = oneshot::channel();
            shared.pending.insert(id, completion);

            let job = FillJob {
                id,
                pixels: pixels.to_vec(),
                constraint: constraint.map(<[u8]>::to_vec),
                params,
            };
            let sent = shared
                .channel
                .as_ref()
                .is_some_and(|channel| channel.requests.send(WorkerRequest::Fill(job)).is_ok());

            if sent {
                debug!(id, width = params.width, height = params.height, "fill sent to worker");
                return Dispatched::Pending(reply);
            }

            shared.pending.remove(&id);
            warn!(id, "send to fill worker failed, filling inline");
        }
        drop(shared);

        Dispatched::Ready(self.fill(pixels, constraint, &params))
    }

    fn open_channel(&self, shared: &mut Shared) {
        shared.generation += 1;
        let generation = shared.generation;

        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();

        let endpoint = WorkerEndpoint {
            requests: request_rx,
            responses: response_tx,
        };
        if let Err(err) = self.spawner.spawn(endpoint) {
            warn!(error = %err, "background fill worker unavailable, filling inline");
            shared.state = ChannelState::Failed;
            return;
        }

        let listener_shared = Arc::clone(&self.shared);
        let listener = thread::Builder::new()
            .name(format!("{}-replies", self.config.worker_name))
            .spawn(move || listen(listener_shared, response_rx, generation));
        if let Err(err) = listener {
            // Dropping request_tx stops the worker.
            warn!(error = %err, "fill reply listener unavailable, filling inline");
            shared.state = ChannelState::Failed;
            return;
        }

        shared.channel = Some(Channel {
            generation,
            requests: request_tx,
        });
        shared.state = ChannelState::Ready;
        info!(generation, worker = %self.config.worker_name, "background fill worker started");
    }
}

impl Drop for FillDispatcher {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Route worker replies to their pending requests until the channel ends.
fn listen(shared: Arc<Mutex<Shared>>, mut responses: UnboundedReceiver<WorkerResponse>, generation: u64) {
    while let Some(response) = responses.blocking_recv() {
        match response {
            WorkerResponse::Done { id, result } => {
                let completion = shared.lock().pending.remove(&id);
                match completion {
                    Some(completion) => {
                        let _ = completion.send(result.map_err(DispatchError::from));
                    }
                    None => debug!(id, "discarding fill reply with no pending request"),
                }
            }
            WorkerResponse::Failed { message } => {
                fail_channel(&shared, generation, message);
                return;
            }
        }
    }
    fail_channel(&shared, generation, "fill worker exited".to_string());
}

/// Fail the channel if it is still the live one.
fn fail_channel(shared: &Mutex<Shared>, generation: u64, reason: String) {
    let mut shared = shared.lock();
    let live = shared.state == ChannelState::Ready
        && shared
            .channel
            .as_ref()
            .is_some_and(|channel| channel.generation == generation);
    if !live {
        return;
    }

    warn!(%reason, pending = shared.pending.len(), "background fill channel failed, filling inline from now on");
    shared.channel = None;
    shared.state = ChannelState::Failed;
    shared.reject_all(DispatchError::ChannelFailed(reason));
}
