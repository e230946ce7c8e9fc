//! services/client/src/debounce.rs
//!
//! Coalesces bursts of input into a single value. A pushed value is emitted only once
//! `delay` has passed without a newer value arriving; intermediate values are dropped.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    output: mpsc::UnboundedReceiver<T>,
    cancellation_token: CancellationToken,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Starts the debouncing task. Must be called from within a Tokio runtime.
    pub fn new(delay: Duration) -> Self {
        let (input, mut pending_rx) = mpsc::unbounded_channel::<T>();
        let (settled_tx, output) = mpsc::unbounded_channel::<T>();
        let cancellation_token = CancellationToken::new();
        let token = cancellation_token.clone();

        tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                match pending.take() {
                    None => tokio::select! {
                        _ = token.cancelled() => break,
                        received = pending_rx.recv() => match received {
                            Some(value) => pending = Some(value),
                            None => break,
                        },
                    },
                    Some(value) => tokio::select! {
                        _ = token.cancelled() => break,
                        received = pending_rx.recv() => match received {
                            Some(newer) => {
                                trace!("Debounced value superseded");
                                pending = Some(newer);
                            }
                            None => {
                                let _ = settled_tx.send(value);
                                break;
                            }
                        },
                        _ = tokio::time::sleep(delay) => {
                            if settled_tx.send(value).is_err() {
                                break;
                            }
                        }
                    },
                }
            }
        });

        Self {
            input,
            output,
            cancellation_token,
        }
    }

    /// Queues a value, restarting the quiet period.
    pub fn push(&self, value: T) {
        if self.input.send(value).is_err() {
            trace!("Debouncer task has stopped; value dropped");
        }
    }
}

impl<T> Stream for Debouncer<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.output.poll_recv(cx)
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_value_of_a_burst_is_emitted() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.push("r");
        debouncer.push("ru");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("rust");

        assert_eq!(debouncer.next().await, Some("rust"));
        let nothing_more =
            tokio::time::timeout(Duration::from_secs(5), debouncer.next()).await;
        assert!(nothing_more.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn values_wait_for_the_quiet_period() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.push(1);

        let early = tokio::time::timeout(Duration::from_millis(250), debouncer.next()).await;
        assert!(early.is_err());
        assert_eq!(debouncer.next().await, Some(1));

        debouncer.push(2);
        assert_eq!(debouncer.next().await, Some(2));
    }
}
