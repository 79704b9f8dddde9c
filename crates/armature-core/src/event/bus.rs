// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::{Mutex, PoisonError};

/// A generic, thread-safe fan-out event channel.
///
/// Every subscriber gets its own unbounded flume channel and receives a clone of
/// every event published after it subscribed. Subscribers that dropped their
/// receiver are pruned on the next publish.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + 'static> {
    subscribers: Mutex<Vec<flume::Sender<T>>>,
}

impl<T: Clone + Send + 'static> EventBus<T> {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Registers a new subscriber and returns its receiving end.
    pub fn subscribe(&self) -> flume::Receiver<T> {
        let (sender, receiver) = flume::unbounded();
        self.lock().push(sender);
        receiver
    }

    /// Sends `event` to every live subscriber.
    pub fn publish(&self, event: T) {
        log::trace!("Publishing an event.");
        let mut subscribers = self.lock();
        subscribers.retain(|s| s.send(event.clone()).is_ok());
    }

    /// Number of live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<flume::Sender<T>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flume::TryRecvError;
    use std::{thread, time::Duration};

    #[derive(Debug, Clone, PartialEq)]
    enum TestEvent {
        Loaded { name: String },
        Failed,
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::<TestEvent>::new();
        bus.publish(TestEvent::Failed);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn every_subscriber_receives_every_event() {
        let bus = EventBus::<TestEvent>::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        let loaded = TestEvent::Loaded {
            name: "avatar".to_string(),
        };
        bus.publish(loaded.clone());
        bus.publish(TestEvent::Failed);

        for receiver in [&first, &second] {
            assert_eq!(receiver.try_recv(), Ok(loaded.clone()));
            assert_eq!(receiver.try_recv(), Ok(TestEvent::Failed));
            assert_eq!(receiver.try_recv(), Err(TryRecvError::Empty));
        }
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = EventBus::<TestEvent>::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(TestEvent::Failed);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(kept.try_recv(), Ok(TestEvent::Failed));
    }

    #[test]
    fn publish_from_thread() {
        let bus = std::sync::Arc::new(EventBus::<TestEvent>::new());
        let receiver = bus.subscribe();

        let publisher = bus.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            publisher.publish(TestEvent::Failed);
        });

        match receiver.recv_timeout(Duration::from_secs(1)) {
            Ok(event) => assert_eq!(event, TestEvent::Failed),
            Err(e) => panic!("Failed to receive event from thread: {e:?}"),
        }

        handle.join().expect("Thread join failed");
    }
}
