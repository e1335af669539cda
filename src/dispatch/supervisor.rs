//! Fault-isolation boundary around each resolver task
//!
//! Every task ends here. Errors and panics, whether from the resolver or from
//! the sink, are logged and swallowed so nothing reaches sibling tasks or the
//! message handler.

use crate::output::{ChatTarget, ResultSink};
use crate::resolver::ResolvedResult;
use crate::ResolveResult;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Work produced by one resolver for one candidate
pub(crate) type ResolveTask = BoxFuture<'static, ResolveResult<Option<ResolvedResult>>>;

/// Runs `work` to completion and delivers its result, if any
pub(crate) async fn supervise(work: ResolveTask, sink: &dyn ResultSink, target: &ChatTarget) {
    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(Ok(Some(result))) => deliver(sink, target, &result.to_string()),
        Ok(Ok(None)) => debug!("Finished without output"),
        Ok(Err(e)) => error!(error = %e, "Resolver failed"),
        Err(payload) => error!(panic = %panic_message(&*payload), "Resolver panicked"),
    }
}

fn deliver(sink: &dyn ResultSink, target: &ChatTarget, text: &str) {
    let delivered = panic::catch_unwind(AssertUnwindSafe(|| sink.message(target, text)));
    match delivered {
        Ok(()) => debug!(text, "Delivered result"),
        Err(payload) => error!(panic = %panic_message(&*payload), "Result sink panicked"),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
