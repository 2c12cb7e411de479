use crate::bus::Event;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::warn;

/// An extension trait for event receivers to provide a more ergonomic API.
///
/// Broadcast receivers that lag behind skip to the fresh tail of the buffer
/// instead of surfacing the lag error to every caller.
pub trait EventReceiverExt<T> {
    /// Receive the next event, returning `None` when the channel is closed.
    fn recv(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;
}

impl<T: Event> EventReceiverExt<T> for broadcast::Receiver<Arc<T>> {
    async fn recv(&mut self) -> Option<Arc<T>> {
        loop {
            match broadcast::Receiver::recv(self).await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        event = std::any::type_name::<T>(),
                        skipped, "EventBus receiver lagged; continuing from latest message"
                    );
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl<T: Event> EventReceiverExt<T> for mpsc::Receiver<Arc<T>> {
    async fn recv(&mut self) -> Option<Arc<T>> {
        mpsc::Receiver::recv(self).await
    }
}
