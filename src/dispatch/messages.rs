//! Messages exchanged with the background fill worker.
//!
//! The protocol is process-internal. Buffers travel by value, so ownership
//! of the copied pixels moves into the channel with the request.

use crate::error::FillError;
use crate::selection::types::{FillParams, FillResult};

/// One fill job as shipped to the worker.
#[derive(Debug, Clone)]
pub struct FillJob {
    /// Correlation id assigned by the dispatcher.
    pub id: u64,
    /// Copy of the caller's RGBA pixels.
    pub pixels: Vec<u8>,
    /// Copy of the caller's constraint mask, if any.
    pub constraint: Option<Vec<u8>>,
    pub params: FillParams,
}

/// Message from dispatcher to worker
#[derive(Debug, Clone)]
pub enum WorkerRequest {
    Fill(FillJob),
}

/// Message from worker to dispatcher
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    /// A job finished; job-level errors travel back to their caller.
    Done {
        id: u64,
        result: Result<FillResult, FillError>,
    },

    /// The worker hit an unrecoverable error and is exiting.
    Failed { message: String },
}
