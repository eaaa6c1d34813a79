//! One-shot "authentication loaded" signal.

use oidc_store::Selection;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_stream::{Stream, StreamExt};

/// Emits `false` once, the first time the loading selection reports it,
/// then ends. Ends without emitting if the store goes away first.
pub struct AuthenticationLoaded {
    loading: Selection<bool>,
    done: bool,
}

impl AuthenticationLoaded {
    pub(crate) fn new(loading: Selection<bool>) -> Self {
        Self {
            loading,
            done: false,
        }
    }

    /// Wait for the signal. `None` means the store was dropped first.
    pub async fn wait(mut self) -> Option<bool> {
        self.next().await
    }
}

impl Stream for AuthenticationLoaded {
    type Item = bool;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        loop {
            match Pin::new(&mut this.loading).poll_next(cx) {
                Poll::Ready(Some(true)) => continue,
                Poll::Ready(Some(false)) => {
                    this.done = true;
                    return Poll::Ready(Some(false));
                }
                Poll::Ready(None) => {
                    this.done = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
