// src/utils.rs

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::SolveError;

/// Race a future against the caller's cancellation token. The losing future
/// is dropped, which aborts any in-flight request it owns.
pub(crate) async fn with_cancel<F>(cancel: &CancellationToken, fut: F) -> Result<F::Output, SolveError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SolveError::Cancelled),
        out = fut => Ok(out),
    }
}
