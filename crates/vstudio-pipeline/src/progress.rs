//! Progress channel between the dispatcher and the HTTP stream.
//!
//! A bounded FIFO. Events are delivered in the order they are sent; nothing is
//! dropped or coalesced. Dropping the sender closes the stream.

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;
use vstudio_models::{ProgressEvent, ResultMetadata, ResultPayload};

/// Default channel capacity.
pub const DEFAULT_BUFFER: usize = 32;

/// Sending half, owned by the dispatcher for one request.
#[derive(Debug)]
pub struct ProgressSender {
    tx: mpsc::Sender<ProgressEvent>,
    last_progress: u8,
}

impl ProgressSender {
    /// Send a status update.
    ///
    /// Percentages never go backwards: a value below the last one sent is
    /// raised to it. Values above 100 are clamped.
    pub async fn status(&mut self, message: impl Into<String>, progress: u8) {
        let progress = progress.clamp(self.last_progress, 100);
        self.last_progress = progress;
        self.send(ProgressEvent::status(message, progress)).await;
    }

    /// Send the terminal success event.
    pub async fn result(&self, payload: ResultPayload, metadata: ResultMetadata) {
        self.send(ProgressEvent::result(payload, metadata)).await;
    }

    /// Send the terminal failure event.
    pub async fn error(&self, message: impl Into<String>) {
        self.send(ProgressEvent::error(message)).await;
    }

    pub fn last_progress(&self) -> u8 {
        self.last_progress
    }

    /// Whether the receiving side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn send(&self, event: ProgressEvent) {
        let kind = event.kind();
        if self.tx.send(event).await.is_err() {
            // Client disconnected; the unit of work still runs to completion.
            debug!(kind, "Progress receiver dropped, event discarded");
        }
    }
}

/// Receiving half.
#[derive(Debug)]
pub struct ProgressReceiver {
    rx: mpsc::Receiver<ProgressEvent>,
}

impl ProgressReceiver {
    /// Receive the next progress event.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        self.rx.recv().await
    }

    /// Drain every event until the sender is dropped.
    pub async fn collect(mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.rx.recv().await {
            events.push(event);
        }
        events
    }

    pub fn into_stream(self) -> ReceiverStream<ProgressEvent> {
        ReceiverStream::new(self.rx)
    }
}

/// Create a progress channel pair.
pub fn channel(buffer: usize) -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (
        ProgressSender { tx, last_progress: 0 },
        ProgressReceiver { rx },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fifo_and_close() {
        let (mut sender, receiver) = channel(4);
        sender.status("one", 5).await;
        sender.status("two", 10).await;
        sender.error("boom").await;
        drop(sender);

        let events = receiver.collect().await;
        let kinds: Vec<_> = events.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["status", "status", "error"]);
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_clamped() {
        let (mut sender, receiver) = channel(8);
        sender.status("a", 40).await;
        sender.status("b", 25).await;
        sender.status("c", 200).await;
        assert_eq!(sender.last_progress(), 100);
        drop(sender);

        let progress: Vec<_> = receiver
            .collect()
            .await
            .iter()
            .filter_map(|e| e.progress())
            .collect();
        assert_eq!(progress, vec![40, 40, 100]);
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped() {
        let (mut sender, receiver) = channel(1);
        drop(receiver);
        assert!(sender.is_closed());
        sender.status("ignored", 50).await;
        sender.error("ignored").await;
    }
}
