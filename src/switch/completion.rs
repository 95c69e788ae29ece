//! Single-resolution completion for switch requests.
//!
//! A request produces a [`Completion`] (kept by the switcher) and a
//! [`CompletionHandle`] (returned to the caller). The completion is consumed
//! exactly once: either resolved, when the module reaches the screen, or
//! discarded, when a newer request supersedes it. A discarded completion is
//! silent: its handle stays pending forever.

use crate::core::RequestId;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Where a request stands, as seen by its caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionStatus {
    /// Not displayed yet. Superseded requests stay here.
    Pending,
    /// The requested module reached the screen.
    Displayed,
}

/// Switcher-side half of a request's completion.
#[derive(Debug)]
pub(crate) struct Completion {
    request: RequestId,
    sender: oneshot::Sender<()>,
}

impl Completion {
    pub(crate) fn request(&self) -> RequestId {
        self.request
    }

    /// The requested module is on screen.
    pub(crate) fn resolve(self) {
        // A caller that dropped its handle is not an error.
        let _ = self.sender.send(());
    }

    /// A newer request won. The caller is never told.
    pub(crate) fn discard(self) {
        tracing::trace!(request = %self.request, "discarding superseded completion");
        drop(self.sender);
    }
}

/// Caller-side half of a request's completion.
///
/// Poll it with [`status`](Self::status) from a synchronous loop, or
/// `.await` it. The future completes once the module is displayed and
/// never completes if the request was superseded.
#[derive(Debug)]
#[must_use = "dropping the handle does not cancel the switch, but loses its outcome"]
pub struct CompletionHandle {
    request: RequestId,
    receiver: oneshot::Receiver<()>,
    displayed: bool,
}

impl CompletionHandle {
    pub fn request_id(&self) -> RequestId {
        self.request
    }

    /// Non-blocking look at the request's status.
    pub fn status(&mut self) -> CompletionStatus {
        // A closed channel means the request was discarded: still pending.
        if !self.displayed && self.receiver.try_recv().is_ok() {
            self.displayed = true;
        }
        if self.displayed {
            CompletionStatus::Displayed
        } else {
            CompletionStatus::Pending
        }
    }

    pub fn is_displayed(&mut self) -> bool {
        self.status() == CompletionStatus::Displayed
    }
}

impl Future for CompletionHandle {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.displayed {
            return Poll::Ready(());
        }
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(())) => {
                self.displayed = true;
                Poll::Ready(())
            }
            // Discarded: the sender is gone, so no wakeup will ever come.
            Poll::Ready(Err(_)) | Poll::Pending => Poll::Pending,
        }
    }
}

/// Create the two halves of a new request's completion.
pub(crate) fn completion() -> (Completion, CompletionHandle) {
    let request = RequestId::new();
    let (sender, receiver) = oneshot::channel();
    (
        Completion { request, sender },
        CompletionHandle {
            request,
            receiver,
            displayed: false,
        },
    )
}
