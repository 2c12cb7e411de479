use cpark_events::{EventBus, EventBusError, EventReceiverExt};

#[derive(Clone, Debug, PartialEq, Eq)]
struct TestEvent(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
struct QueueJob(u64);

#[tokio::test]
async fn broadcast_event_flow() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<TestEvent>().unwrap();

    let reached = bus.publish(TestEvent(42)).unwrap();
    assert_eq!(reached, 1);

    let received = rx.recv().await.unwrap();
    assert_eq!(*received, TestEvent(42));
}

#[tokio::test]
async fn broadcast_without_subscribers_is_dropped() {
    let bus = EventBus::new();
    let reached = bus.publish(TestEvent(1)).unwrap();
    assert_eq!(reached, 0);
}

#[tokio::test]
async fn queue_preserves_order_and_buffers_before_consumer() {
    let bus = EventBus::new();

    // Publish before any consumer exists; the receiver is parked in the bus.
    bus.publish_queue(QueueJob(1)).unwrap();
    bus.publish_queue(QueueJob(2)).unwrap();

    let mut rx = bus.subscribe_queue::<QueueJob>(8).unwrap();
    assert_eq!(*rx.recv().await.unwrap(), QueueJob(1));

    bus.publish_queue(QueueJob(3)).unwrap();
    assert_eq!(*rx.recv().await.unwrap(), QueueJob(2));
    assert_eq!(*rx.recv().await.unwrap(), QueueJob(3));
}

#[tokio::test]
async fn queue_receiver_can_only_be_taken_once() {
    let bus = EventBus::new();
    let _rx = bus.subscribe_queue::<QueueJob>(8).unwrap();

    let err = bus.subscribe_queue::<QueueJob>(8).unwrap_err();
    assert!(matches!(err, EventBusError::ReceiverTaken { .. }));
}

#[tokio::test]
async fn queue_rejects_when_full() {
    let bus = EventBus::new();
    let _rx = bus.subscribe_queue::<QueueJob>(1).unwrap();

    bus.publish_queue(QueueJob(1)).unwrap();
    let err = bus.publish_queue(QueueJob(2)).unwrap_err();
    assert!(matches!(err, EventBusError::ChannelFull { .. }));
}

#[tokio::test]
async fn channel_kinds_do_not_mix() {
    let bus = EventBus::new();
    let _rx = bus.subscribe::<TestEvent>().unwrap();

    let err = bus.publish_queue(TestEvent(1)).unwrap_err();
    assert!(matches!(err, EventBusError::ChannelKindMismatch { .. }));

    let _queue = bus.subscribe_queue::<QueueJob>(4).unwrap();
    let err = bus.subscribe::<QueueJob>().unwrap_err();
    assert!(matches!(err, EventBusError::ChannelKindMismatch { .. }));
}

#[tokio::test]
async fn zero_capacity_is_rejected() {
    let bus = EventBus::new();
    let err = bus.subscribe_queue::<QueueJob>(0).unwrap_err();
    assert!(matches!(err, EventBusError::InvalidCapacity { .. }));
}

#[tokio::test]
async fn lagged_broadcast_receiver_recovers() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe_with_capacity::<TestEvent>(2).unwrap();

    for i in 0..100 {
        bus.publish(TestEvent(i)).unwrap();
    }

    // The extension trait swallows the lag and resumes at the buffer tail.
    let received = EventReceiverExt::recv(&mut rx).await.expect("channel still open");
    assert!(received.0 >= 98, "expected an event from the fresh tail, got {}", received.0);
}

#[tokio::test]
async fn shutdown_closes_all_channels() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<TestEvent>().unwrap();
    let _queue = bus.subscribe_queue::<QueueJob>(4).unwrap();

    assert_eq!(bus.shutdown(), 2);
    assert!(EventReceiverExt::recv(&mut rx).await.is_none());
}
