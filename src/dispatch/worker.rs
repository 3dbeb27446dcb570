//! Background fill worker.
//!
//! The worker owns nothing between jobs: it takes one request off its
//! queue, runs the fill, and posts one response. Input checks are the
//! dispatcher's job; the worker relies on the kernel alone.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

use crate::dispatch::config::DispatchConfig;
use crate::dispatch::messages::{FillJob, WorkerRequest, WorkerResponse};
use crate::error::FillError;
use crate::selection::magic_wand::flood_fill;
use crate::selection::types::FillResult;

/// Worker side of a background channel.
pub struct WorkerEndpoint {
    pub requests: UnboundedReceiver<WorkerRequest>,
    pub responses: UnboundedSender<WorkerResponse>,
}

/// Creates the execution context a worker runs in.
///
/// Returning an error marks background execution as unavailable for the
/// dispatcher that asked.
pub trait WorkerSpawner: Send + Sync {
    fn spawn(&self, endpoint: WorkerEndpoint) -> io::Result<()>;
}

/// Executes one job on the worker.
pub type JobRunner = fn(FillJob) -> Result<FillResult, FillError>;

/// Runs each worker on a dedicated OS thread.
#[derive(Debug, Clone)]
pub struct ThreadSpawner {
    name: String,
    stack_size: Option<usize>,
    runner: JobRunner,
}

impl ThreadSpawner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stack_size: None,
            runner: run_job,
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self {
            stack_size: config.stack_size,
            ..Self::new(config.worker_name.clone())
        }
    }

    #[cfg(test)]
    pub(crate) fn with_runner(mut self, runner: JobRunner) -> Self {
        self.runner = runner;
        self
    }
}

impl WorkerSpawner for ThreadSpawner {
    fn spawn(&self, endpoint: WorkerEndpoint) -> io::Result<()> {
        let mut builder = thread::Builder::new().name(self.name.clone());
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        let runner = self.runner;
        builder.spawn(move || run_worker_with(endpoint, runner))?;
        Ok(())
    }
}

/// Worker loop. Returns when the request channel closes or a job panics.
pub fn run_worker(endpoint: WorkerEndpoint) {
    run_worker_with(endpoint, run_job)
}

/// Worker loop with a custom job runner.
///
/// A panic in `runner` is reported as [`WorkerResponse::Failed`] and ends
/// the loop.
pub fn run_worker_with(mut endpoint: WorkerEndpoint, runner: JobRunner) {
    while let Some(request) = endpoint.requests.blocking_recv() {
        let WorkerRequest::Fill(job) = request;
        let id = job.id;

        let response = match panic::catch_unwind(AssertUnwindSafe(|| runner(job))) {
            Ok(result) => WorkerResponse::Done { id, result },
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(id, %message, "fill worker panicked");
                WorkerResponse::Failed { message }
            }
        };

        let fatal = matches!(response, WorkerResponse::Failed { .. });
        if endpoint.responses.send(response).is_err() || fatal {
            break;
        }
    }
    debug!("fill worker exiting");
}

/// Execute a single job.
pub fn run_job(job: FillJob) -> Result<FillResult, FillError> {
    flood_fill(&job.pixels, job.constraint.as_deref(), &job.params)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "fill worker panicked".to_string()
    }
}
