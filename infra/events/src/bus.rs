use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::trace;

/// A safe default for channel buffers.
/// 128 is usually enough for domain events in a vertical slice.
const DEFAULT_CAPACITY: usize = 128;

/// Marker trait for types that can be sent across the [`EventBus`].
///
/// Any type that is `Send + Sync + 'static` automatically implements this trait.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

/// Fan-out channel state: every subscriber sees every event.
#[derive(Debug)]
struct BroadcastChannel<T> {
    sender: broadcast::Sender<Arc<T>>,
}

/// Queue channel state: bounded, exactly one consumer drains it.
///
/// The receiver is parked here when the channel is created by a publisher
/// before any consumer exists, and handed out once via
/// [`EventBus::subscribe_queue`].
#[derive(Debug)]
struct QueueChannel<T> {
    sender: mpsc::Sender<Arc<T>>,
    receiver: Option<mpsc::Receiver<Arc<T>>>,
}

#[derive(Debug)]
enum Channel {
    Broadcast(Box<dyn Any + Send + Sync>),
    Queue(Box<dyn Any + Send + Sync>),
}

/// A thread-safe in-process event bus.
///
/// Channels are indexed by the [`TypeId`] of the event. Two kinds exist:
/// * **broadcast**: fan-out, late subscribers miss earlier events;
/// * **queue**: bounded mpsc with a single consumer, used for work handoff
///   (e.g. registration events feeding the mail dispatcher).
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, Channel>>>,
}

impl EventBus {
    /// Creates a new, empty `EventBus`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to an event of type `T` using broadcast with default capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if `T` is already
    /// registered as a queue channel.
    ///
    /// # Examples
    /// ```rust
    /// use cpark_events::{EventBus, EventReceiverExt};
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct AccountCreated(u64);
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), cpark_events::EventBusError> {
    /// let bus = EventBus::new();
    /// let mut rx = bus.subscribe::<AccountCreated>()?;
    /// bus.publish(AccountCreated(1))?;
    /// assert_eq!(rx.recv().await.unwrap().0, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to an event of type `T` with a specific broadcast buffer capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if `T` is already
    /// registered as a queue channel, or [`EventBusError::InvalidCapacity`]
    /// if `capacity` is zero.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        validate_capacity(capacity)?;
        Ok(self.broadcast_sender::<T>(capacity)?.subscribe())
    }

    /// Publishes a shared event instance via broadcast.
    ///
    /// Returns the number of subscribers the event reached; an event with no
    /// active subscribers is dropped silently.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelKindMismatch`] if `T` is already
    /// registered as a queue channel.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        let sender = self.broadcast_sender::<T>(DEFAULT_CAPACITY)?;
        Ok(sender.send(Arc::new(event)).map_or_else(
            |_| {
                trace!(event = std::any::type_name::<T>(), "Event dropped: no active subscribers");
                0
            },
            |count| count,
        ))
    }

    /// Takes the single consumer end of the bounded queue for `T`.
    ///
    /// # Errors
    /// Returns [`EventBusError::ReceiverTaken`] on a second call,
    /// [`EventBusError::ChannelKindMismatch`] if `T` is a broadcast channel,
    /// or [`EventBusError::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    /// ```rust
    /// use cpark_events::EventBus;
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct Job(u64);
    ///
    /// # fn main() -> Result<(), cpark_events::EventBusError> {
    /// let bus = EventBus::new();
    /// let _rx = bus.subscribe_queue::<Job>(8)?;
    /// bus.publish_queue(Job(1))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe_queue<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<mpsc::Receiver<Arc<T>>, EventBusError> {
        validate_capacity(capacity)?;

        let mut channels = self.channels.write();
        match channels.entry(TypeId::of::<T>()) {
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                let queue = downcast_queue_mut::<T>(entry.get_mut())?;
                queue.receiver.take().ok_or_else(|| EventBusError::ReceiverTaken {
                    message: std::any::type_name::<T>().into(),
                })
            },
            std::collections::hash_map::Entry::Vacant(entry) => {
                trace!(event = std::any::type_name::<T>(), capacity, "Initializing queue channel");
                let (tx, rx) = mpsc::channel::<Arc<T>>(capacity);
                entry.insert(Channel::Queue(Box::new(QueueChannel { sender: tx, receiver: None })));
                Ok(rx)
            },
        }
    }

    /// Publishes to the bounded queue for `T`, creating it if missing.
    ///
    /// The message is buffered until the consumer (see
    /// [`EventBus::subscribe_queue`]) drains it; if the queue is created here,
    /// the receiver is parked until a consumer claims it.
    ///
    /// # Errors
    /// Returns [`EventBusError::ChannelFull`] when the bounded buffer is at
    /// capacity, or [`EventBusError::ChannelKindMismatch`] if `T` is a
    /// broadcast channel.
    pub fn publish_queue<T: Event>(&self, event: T) -> Result<(), EventBusError> {
        let sender = {
            let mut channels = self.channels.write();
            match channels.entry(TypeId::of::<T>()) {
                std::collections::hash_map::Entry::Occupied(mut entry) => {
                    downcast_queue_mut::<T>(entry.get_mut())?.sender.clone()
                },
                std::collections::hash_map::Entry::Vacant(entry) => {
                    trace!(
                        event = std::any::type_name::<T>(),
                        capacity = DEFAULT_CAPACITY,
                        "Initializing queue channel"
                    );
                    let (tx, rx) = mpsc::channel::<Arc<T>>(DEFAULT_CAPACITY);
                    entry.insert(Channel::Queue(Box::new(QueueChannel {
                        sender: tx.clone(),
                        receiver: Some(rx),
                    })));
                    tx
                },
            }
        };

        sender.try_send(Arc::new(event)).map_err(|e| EventBusError::ChannelFull {
            message: format!("{}: {e}", std::any::type_name::<T>()).into(),
        })
    }

    /// Gracefully shuts down the bus by dropping all underlying channels.
    ///
    /// Returns the number of event channels that were closed.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    fn broadcast_sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let mut channels = self.channels.write();
        match channels.entry(TypeId::of::<T>()) {
            std::collections::hash_map::Entry::Occupied(entry) => match entry.get() {
                Channel::Broadcast(boxed) => boxed
                    .downcast_ref::<BroadcastChannel<T>>()
                    .map(|chan| chan.sender.clone())
                    .ok_or_else(|| EventBusError::TypeMismatch {
                        message: std::any::type_name::<T>().into(),
                    }),
                Channel::Queue(_) => Err(EventBusError::ChannelKindMismatch {
                    message: format!("Expected broadcast for {}", std::any::type_name::<T>())
                        .into(),
                }),
            },
            std::collections::hash_map::Entry::Vacant(entry) => {
                trace!(
                    event = std::any::type_name::<T>(),
                    capacity,
                    "Initializing broadcast channel"
                );
                let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
                entry.insert(Channel::Broadcast(Box::new(BroadcastChannel { sender: tx.clone() })));
                Ok(tx)
            },
        }
    }
}

fn downcast_queue_mut<'a, T: Event>(
    channel: &'a mut Channel,
) -> Result<&'a mut QueueChannel<T>, EventBusError> {
    match channel {
        Channel::Queue(boxed) => {
            boxed.downcast_mut::<QueueChannel<T>>().ok_or_else(|| EventBusError::TypeMismatch {
                message: std::any::type_name::<T>().into(),
            })
        },
        Channel::Broadcast(_) => Err(EventBusError::ChannelKindMismatch {
            message: format!("Expected queue for {}", std::any::type_name::<T>()).into(),
        }),
    }
}

fn validate_capacity(capacity: usize) -> Result<(), EventBusError> {
    if capacity == 0 {
        return Err(EventBusError::InvalidCapacity {
            message: "capacity must be greater than zero".into(),
        });
    }
    Ok(())
}
