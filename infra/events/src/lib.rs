//! # Event Bus
//!
//! A typed in-process event bus for inter-slice communication.
//!
//! Channels are indexed by event type. Broadcast channels fan events out to
//! every subscriber; queue channels are bounded mpsc buffers drained by a
//! single consumer (used for fire-and-forget work like mail dispatch).
//!
//! ## Example
//!
//! ```rust
//! use cpark_events::{EventBus, EventReceiverExt};
//!
//! #[derive(Clone, Debug)]
//! struct Ping(u32);
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), cpark_events::EventBusError> {
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe::<Ping>()?;
//! bus.publish(Ping(7))?;
//! assert_eq!(rx.recv().await.unwrap().0, 7);
//! # Ok(())
//! # }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{Event, EventBus};
pub use error::EventBusError;
pub use receiver::EventReceiverExt;
