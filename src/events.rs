//! Navigation event bus shared between controllers and the presentation layer.

use tokio::sync::broadcast;

use crate::config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ShowList,
    ShowDetails(String),
    NavigateBack,
    /// Published by the list controller when a card is picked.
    CardSelected(String),
}

/// Publish/subscribe channel for [`AppEvent`]s.
///
/// Cloning the bus yields another handle to the same channel, so one bus is
/// created up front and handed to every producer and consumer.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(config::EVENT_BUS_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Send `event` to every current subscriber.
    ///
    /// Returns the number of subscribers reached; an event published with no
    /// subscribers is dropped.
    pub fn publish(&self, event: AppEvent) -> usize {
        match self.sender.send(event) {
            Ok(n) => n,
            Err(broadcast::error::SendError(event)) => {
                log::debug!("No subscribers for {:?}", event);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Subscribe with a receiver that tolerates falling behind.
    pub fn stream(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Receiving end of an [`EventBus`] that skips over events it lagged past
/// instead of ending.
#[derive(Debug)]
pub struct EventStream {
    receiver: broadcast::Receiver<AppEvent>,
}

impl EventStream {
    /// Next event, or `None` once every bus handle has been dropped.
    pub async fn next(&mut self) -> Option<AppEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Event subscriber fell behind, skipped {} event(s)", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
