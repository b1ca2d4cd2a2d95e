// src/exec/client.rs

//! Pluggable execution client abstraction.
//!
//! The launcher hands each batch of claimed nodes to an `ExecutionClient`
//! and waits until every job in the batch has a return code. Tests swap in
//! a fake client that records batches instead of spawning processes.

use std::future::Future;
use std::pin::Pin;

use crate::dag::ScheduledJob;
use crate::errors::Result;

/// Trait abstracting how a batch of jobs is executed.
pub trait ExecutionClient: Send {
    /// Run every job in `batch` and set its `return_code`.
    ///
    /// The returned future resolves once the whole batch has finished. A
    /// non-zero return code is a job failure, not an error; `Err` is reserved
    /// for the client itself breaking down and aborts the launcher run.
    fn launch_batch<'a>(
        &'a mut self,
        batch: &'a mut [ScheduledJob],
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}
