//! Completion bridge for detached print submissions.
//!
//! This module provides [`PrintJobHandle`], the single-resolution future
//! a caller holds after [`Printer::submit`](crate::Printer::submit). It
//! settles exactly once: successfully as soon as the print UI has been
//! presented, or with the error that stopped the pipeline before any UI
//! appeared. It never reports what the user did inside the dialog - the
//! platform owns that flow.

use tokio::sync::oneshot;

use crate::error::{PrintError, Result};

/// Awaitable outcome of one submitted print request.
///
/// # Example
///
/// ```rust,ignore
/// let handle = printer.submit(PrintRequest::markup("<h1>Hi</h1>", "Note"));
/// println!("Submitted job: {}", handle.job_name());
///
/// match handle.settled().await {
///     Ok(()) => println!("Print dialog presented"),
///     Err(e) => eprintln!("Print failed: {}", e),
/// }
/// ```
#[derive(Debug)]
pub struct PrintJobHandle {
    job_name: String,
    outcome: oneshot::Receiver<Result<()>>,
}

impl PrintJobHandle {
    pub(crate) fn new(job_name: String, outcome: oneshot::Receiver<Result<()>>) -> Self {
        Self { job_name, outcome }
    }

    /// The job name this handle tracks.
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// Wait for the single settled outcome.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or [`PrintError::Internal`] if the driving
    /// task ended without reporting (it panicked or was aborted).
    pub async fn settled(self) -> Result<()> {
        match self.outcome.await {
            Ok(outcome) => outcome,
            Err(_) => Err(PrintError::Internal),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
